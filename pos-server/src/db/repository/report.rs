//! Report Repository
//!
//! Loads one business day of documents and folds them with
//! [`crate::billing::reconcile`].

use super::conduce::ConduceFilter;
use super::{RepoResult, TimeRange, conduce, delivery_order, expense, invoice, opening_balance, sale};
use crate::billing::{DayDocuments, reconcile};
use shared::models::DailyReconciliation;
use sqlx::SqlitePool;

/// All documents created within `range`, voided ones included
pub async fn load_day(pool: &SqlitePool, range: TimeRange) -> RepoResult<DayDocuments> {
    let conduce_filter = ConduceFilter {
        range: Some(range),
        ..Default::default()
    };
    Ok(DayDocuments {
        sales: sale::find_all(pool, Some(range)).await?,
        orders: delivery_order::find_all(pool, Some(range), None).await?,
        invoices: invoice::find_all(pool, Some(range), None).await?,
        conduces: conduce::find_all(pool, &conduce_filter).await?,
        expenses: expense::find_all(pool, Some(range)).await?,
    })
}

/// Cuadre of `business_date` (`range` is that date in the business timezone)
pub async fn daily_reconciliation(
    pool: &SqlitePool,
    business_date: &str,
    range: TimeRange,
) -> RepoResult<DailyReconciliation> {
    let opening = opening_balance::amount_for(pool, business_date).await?;
    let docs = load_day(pool, range).await?;
    Ok(reconcile(business_date, opening, &docs))
}
