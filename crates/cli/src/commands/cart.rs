//! Cart commands.

use rust_decimal::Decimal;

use echoppe_client::models::Product;
use echoppe_core::ProductId;

use super::{CliError, load};

/// Add one unit of a product.
pub async fn add(id: i32, title: String, price: Decimal, image: String) -> Result<(), CliError> {
    let (mut state, _backend) = load().await?;

    state.cart.add_item(&Product {
        id: ProductId::new(id),
        title,
        price,
        image,
    });

    tracing::info!("Cart now holds {} article(s)", state.cart.count());
    Ok(())
}

/// Remove a product's line entirely.
pub async fn remove(id: i32) -> Result<(), CliError> {
    let (mut state, _backend) = load().await?;
    state.cart.remove_item(ProductId::new(id));
    tracing::info!("Cart now holds {} article(s)", state.cart.count());
    Ok(())
}

/// Set a line's quantity. Zero removes the line.
pub async fn set_quantity(id: i32, quantity: u32) -> Result<(), CliError> {
    let (mut state, _backend) = load().await?;
    state.cart.update_quantity(ProductId::new(id), quantity);
    tracing::info!("Cart now holds {} article(s)", state.cart.count());
    Ok(())
}

/// Show the cart with subtotal, shipping, and total.
pub async fn show() -> Result<(), CliError> {
    let (state, _backend) = load().await?;

    if state.cart.is_empty() {
        tracing::info!("Cart is empty");
        return Ok(());
    }

    for line in state.cart.lines() {
        tracing::info!(
            "{} x{} @ {} = {}",
            line.title,
            line.quantity,
            line.price,
            line.line_total()
        );
    }
    tracing::info!(
        "Subtotal {}  Shipping {}  Total {}",
        state.cart.subtotal(),
        state.cart.shipping_cost(&state.auth),
        state.cart.total(&state.auth)
    );
    Ok(())
}

/// Empty the cart.
pub async fn clear() -> Result<(), CliError> {
    let (mut state, _backend) = load().await?;
    state.cart.clear();
    tracing::info!("Cart emptied");
    Ok(())
}
