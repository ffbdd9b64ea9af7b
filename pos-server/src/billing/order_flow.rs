//! Delivery order lifecycle guards
//!
//! received → preparing → en_route → delivered, forward only.
//! `delivered` is terminal; voided orders are frozen.

use shared::error::{AppError, ErrorCode};
use shared::models::{Client, DeliveryOrder, OrderStatus, PaymentMethod};

/// Orders that can no longer be modified
fn ensure_mutable(order: &DeliveryOrder) -> Result<(), AppError> {
    if order.is_voided {
        return Err(AppError::with_message(
            ErrorCode::OrderAlreadyVoided,
            format!("Order {} has been voided", order.id),
        ));
    }
    if order.status.is_terminal() {
        return Err(AppError::with_message(
            ErrorCode::OrderAlreadyDelivered,
            format!("Order {} has already been delivered", order.id),
        ));
    }
    Ok(())
}

/// Status change must move forward (skipping is allowed)
pub fn check_transition(order: &DeliveryOrder, next: OrderStatus) -> Result<(), AppError> {
    ensure_mutable(order)?;
    if next.rank() <= order.status.rank() {
        return Err(AppError::with_message(
            ErrorCode::OrderInvalidTransition,
            format!("Cannot move order from {} to {}", order.status, next),
        )
        .with_detail("from", order.status.as_str())
        .with_detail("to", next.as_str()));
    }
    Ok(())
}

pub fn check_payment_change(order: &DeliveryOrder) -> Result<(), AppError> {
    ensure_mutable(order)
}

/// Delivered orders stay on the books; only open orders can be voided
pub fn check_void(order: &DeliveryOrder) -> Result<(), AppError> {
    ensure_mutable(order)
}

/// Credit orders need a registered, credit-enabled client
pub fn check_credit_client(
    method: PaymentMethod,
    client: Option<&Client>,
) -> Result<(), AppError> {
    if method != PaymentMethod::Credit {
        return Ok(());
    }
    match client {
        None => Err(AppError::new(ErrorCode::OrderCreditRequiresClient)),
        Some(c) if !c.credit_enabled => Err(AppError::with_message(
            ErrorCode::CreditNotEnabled,
            format!("Client {} is not enabled for credit", c.name),
        )),
        Some(_) => Ok(()),
    }
}

/// Delivering a credit order produces a conduce
pub fn needs_conduce(order: &DeliveryOrder, next: OrderStatus) -> bool {
    next == OrderStatus::Delivered
        && order.payment_method == PaymentMethod::Credit
        && order.conduce_id.is_none()
}

/// Description used for the auto-generated conduce line
pub fn conduce_description(order: &DeliveryOrder) -> String {
    order
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or("Orden de delivery")
        .to_string()
}
