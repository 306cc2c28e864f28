//! Interactive shell.
//!
//! Every plain line is fed to the search debouncer as the full current search
//! text, so quickly typed lines coalesce into one search. Lines starting with
//! `:` are commands:
//!
//! - `:add <product-id>` - add one unit to the cart
//! - `:qty <product-id> <quantity>` - set a quantity (0 removes)
//! - `:cart` - show the cart
//! - `:products` - show the current catalog
//! - `:quit` - exit

use qkart_core::{Notification, ProductId};
use qkart_storefront::{HttpGateway, Storefront};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::CliError;
use crate::output;

enum Input<'a> {
    Search(&'a str),
    Add(ProductId),
    SetQuantity(ProductId, u32),
    Cart,
    Products,
    Quit,
    Invalid(&'a str),
}

fn parse(line: &str) -> Input<'_> {
    let Some(command) = line.strip_prefix(':') else {
        return Input::Search(line);
    };

    let mut words = command.split_whitespace();
    match (words.next(), words.next(), words.next(), words.next()) {
        (Some("add"), Some(id), None, None) => Input::Add(ProductId::new(id)),
        (Some("qty"), Some(id), Some(quantity), None) => quantity
            .parse()
            .map_or(Input::Invalid(line), |q| Input::SetQuantity(ProductId::new(id), q)),
        (Some("cart"), None, None, None) => Input::Cart,
        (Some("products"), None, None, None) => Input::Products,
        (Some("quit" | "q"), None, None, None) => Input::Quit,
        _ => Input::Invalid(line),
    }
}

/// Run the interactive session until `:quit` or end of input.
///
/// # Errors
///
/// Returns an error if reading standard input fails.
pub async fn run(
    storefront: &Storefront<HttpGateway>,
    mut notifications: UnboundedReceiver<Notification>,
) -> Result<(), CliError> {
    storefront.mount().await;
    output::drain(&mut notifications);
    output::products(&storefront.snapshot().catalog);

    let mut updates = storefront.subscribe();
    updates.mark_unchanged();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown_catalog = storefront.snapshot().catalog;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse(line.trim()) {
                    Input::Search(text) => storefront.search_input(text),
                    Input::Add(product_id) => {
                        if storefront.add_to_cart(&product_id).await.is_updated() {
                            output::cart(&storefront.snapshot());
                        }
                    }
                    Input::SetQuantity(product_id, quantity) => {
                        if storefront.set_quantity(&product_id, quantity).await.is_updated() {
                            output::cart(&storefront.snapshot());
                        }
                    }
                    Input::Cart => output::cart(&storefront.snapshot()),
                    Input::Products => output::products(&storefront.snapshot().catalog),
                    Input::Quit => break,
                    Input::Invalid(line) => output::usage(line),
                }
            }
            Ok(()) = updates.changed() => {
                let state = updates.borrow_and_update().clone();
                if !state.is_loading && state.catalog != shown_catalog {
                    output::products(&state.catalog);
                    shown_catalog = state.catalog;
                }
            }
            Some(notification) = notifications.recv() => output::notification(&notification),
        }
    }

    Ok(())
}
