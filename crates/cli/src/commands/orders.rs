//! Checkout and order-history commands.

use echoppe_client::stores::CheckoutOutcome;
use echoppe_core::{OrderId, OrderStatus};

use super::{CliError, load};

/// Place an order from the current cart.
pub async fn checkout() -> Result<(), CliError> {
    let (mut state, _backend) = load().await?;

    match state.checkout() {
        CheckoutOutcome::EmptyCart => Err(CliError::Rejected("the cart is empty".to_owned())),
        CheckoutOutcome::AuthRequired => {
            Err(CliError::Rejected("sign in before checking out".to_owned()))
        }
        CheckoutOutcome::Placed(order) => {
            tracing::info!(
                "Order {} placed: subtotal {}, shipping {}, total {}",
                order.id,
                order.subtotal,
                order.shipping,
                order.total
            );
            Ok(())
        }
    }
}

/// List the current user's orders, newest first.
pub async fn list() -> Result<(), CliError> {
    let (state, _backend) = load().await?;

    if !state.auth.is_authenticated() {
        return Err(CliError::Rejected("sign in to see your orders".to_owned()));
    }

    let orders = state.orders.user_orders(&state.auth);
    if orders.is_empty() {
        tracing::info!("No orders yet");
        return Ok(());
    }

    for order in &orders {
        tracing::info!(
            "{}  {}  {} article(s)  total {}  [{}]",
            order.id,
            order.date.format("%Y-%m-%d %H:%M"),
            order.products.iter().map(|l| l.quantity).sum::<u32>(),
            order.total,
            order.status
        );
    }
    Ok(())
}

/// Change an order's status.
pub async fn set_status(id: &str, status: OrderStatus) -> Result<(), CliError> {
    let (mut state, _backend) = load().await?;

    let order_id = OrderId::from(id);
    if !state.orders.update_order_status(&order_id, status) {
        return Err(CliError::Rejected(format!("no order with id {id}")));
    }

    tracing::info!("Order {id} is now {status}");
    Ok(())
}
