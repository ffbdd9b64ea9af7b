//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to
//! `f64` for storage/serialization.

use rust_decimal::prelude::*;
use shared::error::{AppError, ErrorCode};
use shared::models::{LineItem, LineItemInput};

use crate::utils::validation::{
    MAX_AMOUNT, MAX_ITEMS, MAX_NOTE_LEN, validate_amount, validate_required_text,
};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// ITBIS rate (18 %)
pub const ITBIS_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// Subtotal / tax / total of a document
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DocumentTotals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

pub fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_default()
}

/// Round an f64 amount to cents
pub fn round2(value: f64) -> f64 {
    to_f64(to_decimal(value))
}

/// Validate submitted lines and compute each `amount = round2(quantity * unit_price)`
pub fn build_line_items(inputs: &[LineItemInput]) -> Result<Vec<LineItem>, AppError> {
    if inputs.is_empty() {
        return Err(AppError::new(ErrorCode::DocumentEmpty));
    }
    if inputs.len() > MAX_ITEMS {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("Too many items ({}, max {MAX_ITEMS})", inputs.len()),
        ));
    }

    inputs
        .iter()
        .enumerate()
        .map(|(i, input)| {
            validate_required_text(&input.description, &format!("items[{i}].description"), MAX_NOTE_LEN)?;
            validate_amount(input.unit_price, &format!("items[{i}].unit_price"))?;
            if !input.quantity.is_finite() || input.quantity <= 0.0 || input.quantity > MAX_AMOUNT {
                return Err(AppError::with_message(
                    ErrorCode::InvalidAmount,
                    format!("items[{i}].quantity must be greater than zero, got {}", input.quantity),
                ));
            }
            let amount = to_decimal(input.quantity) * to_decimal(input.unit_price);
            Ok(LineItem {
                description: input.description.trim().to_string(),
                quantity: input.quantity,
                unit_price: round2(input.unit_price),
                amount: to_f64(amount),
            })
        })
        .collect()
}

/// Totals of a set of lines
///
/// Fiscal documents: `total = round2(subtotal * 1.18)`, `tax = total - subtotal`.
/// Non-fiscal documents carry no tax.
pub fn compute_totals(items: &[LineItem], is_fiscal: bool) -> DocumentTotals {
    let subtotal = round_money(items.iter().map(|i| to_decimal(i.amount)).sum::<Decimal>());
    if is_fiscal {
        let total = round_money(subtotal * (Decimal::ONE + ITBIS_RATE));
        DocumentTotals {
            subtotal: to_f64(subtotal),
            tax: to_f64(total - subtotal),
            total: to_f64(total),
        }
    } else {
        DocumentTotals {
            subtotal: to_f64(subtotal),
            tax: 0.0,
            total: to_f64(subtotal),
        }
    }
}

/// Sum already-computed totals (settlement invoices)
pub fn sum_totals<I: IntoIterator<Item = DocumentTotals>>(parts: I) -> DocumentTotals {
    let (subtotal, tax, total) = parts.into_iter().fold(
        (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
        |(s, t, g), p| (s + to_decimal(p.subtotal), t + to_decimal(p.tax), g + to_decimal(p.total)),
    );
    DocumentTotals {
        subtotal: to_f64(subtotal),
        tax: to_f64(tax),
        total: to_f64(total),
    }
}

/// `amount + delivery_fee`
pub fn order_total(amount: f64, delivery_fee: f64) -> f64 {
    to_f64(to_decimal(amount) + to_decimal(delivery_fee))
}
