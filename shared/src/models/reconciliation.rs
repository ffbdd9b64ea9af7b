//! Daily Reconciliation Model (cuadre de caja)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Totals per payment method
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentTotals {
    pub cash: f64,
    pub card: f64,
    pub transfer: f64,
    pub credit: f64,
}

/// Income summary of one document source (sales, orders or invoices)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub count: i64,
    pub total: f64,
    pub voided_count: i64,
    pub by_payment_method: PaymentTotals,
}

/// Conduces issued during the day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditSummary {
    pub count: i64,
    pub total: f64,
    pub voided_count: i64,
}

/// Expenses of the day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSummary {
    pub count: i64,
    pub total: f64,
    pub by_category: BTreeMap<String, f64>,
}

/// Result of GET /api/reporte/cuadre
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyReconciliation {
    /// YYYY-MM-DD
    pub date: String,
    pub opening_balance: f64,
    pub sales: SourceSummary,
    pub orders: SourceSummary,
    pub invoices: SourceSummary,
    pub by_payment_method: PaymentTotals,
    pub cash_income: f64,
    pub total_income: f64,
    pub credit_issued: CreditSummary,
    pub expenses: ExpenseSummary,
    /// opening_balance + cash_income - expenses.total
    pub expected_cash: f64,
}
