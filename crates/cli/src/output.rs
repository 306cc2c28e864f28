//! Terminal rendering of catalog, cart and notifications.
//!
//! Results go to stdout; notifications and usage hints go to stderr.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use qkart_core::{Notification, Product};
use qkart_storefront::SessionState;
use tokio::sync::mpsc::UnboundedReceiver;

pub fn products(products: &[Product]) {
    if products.is_empty() {
        println!("No products found");
        return;
    }

    for product in products {
        println!(
            "{:<18} {:<32} {:<14} {:>10}  {}",
            product.id.as_str(),
            product.name,
            product.category,
            product.cost.display(),
            product.rating,
        );
    }
}

pub fn cart(state: &SessionState) {
    if !state.cart_visible() {
        println!("Log in to view your cart");
        return;
    }

    if state.cart.is_empty() {
        println!("Cart is empty");
        return;
    }

    for line in &state.cart {
        let total = line
            .line_total()
            .map_or_else(|| "overflow".to_string(), |p| p.display());
        println!(
            "{:<18} {:<32} {:>4} x {:>10} = {:>10}",
            line.id().as_str(),
            line.product.name,
            line.quantity,
            line.product.cost.display(),
            total,
        );
    }

    let total = state
        .cart_total()
        .map_or_else(|| "overflow".to_string(), |p| p.display());
    println!("{} item(s), order total {total}", state.cart_item_count());
}

pub fn notification(notification: &Notification) {
    eprintln!("{notification}");
}

/// Print every pending notification.
pub fn drain(notifications: &mut UnboundedReceiver<Notification>) {
    while let Ok(n) = notifications.try_recv() {
        notification(&n);
    }
}

pub fn usage(line: &str) {
    eprintln!("Unrecognized command: {line}");
    eprintln!("Commands: :add <id>, :qty <id> <quantity>, :cart, :products, :quit");
}
