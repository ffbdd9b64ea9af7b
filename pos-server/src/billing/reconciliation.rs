//! Daily cash reconciliation (cuadre de caja)
//!
//! Pure fold over the documents of one business day. Callers load the
//! documents by `created_at` range; voided documents are passed in too so
//! they can be counted separately.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use shared::models::{
    Conduce, ConduceStatus, CreditSummary, DailyReconciliation, DeliveryOrder, Expense,
    ExpenseSummary, Invoice, PaymentMethod, PaymentTotals, Sale, SourceSummary,
};

use super::money::{to_decimal, to_f64};

/// Everything created during one business day
#[derive(Debug, Clone, Default)]
pub struct DayDocuments {
    pub sales: Vec<Sale>,
    pub orders: Vec<DeliveryOrder>,
    pub invoices: Vec<Invoice>,
    pub conduces: Vec<Conduce>,
    pub expenses: Vec<Expense>,
}

/// Decimal accumulator per payment method
#[derive(Debug, Default, Clone, Copy)]
struct MethodSums {
    cash: Decimal,
    card: Decimal,
    transfer: Decimal,
    credit: Decimal,
}

impl MethodSums {
    fn add(&mut self, method: PaymentMethod, amount: Decimal) {
        match method {
            PaymentMethod::Cash => self.cash += amount,
            PaymentMethod::Card => self.card += amount,
            PaymentMethod::Transfer => self.transfer += amount,
            PaymentMethod::Credit => self.credit += amount,
        }
    }

    fn merge(&mut self, other: &MethodSums) {
        self.cash += other.cash;
        self.card += other.card;
        self.transfer += other.transfer;
        self.credit += other.credit;
    }

    fn total(&self) -> Decimal {
        self.collected() + self.credit
    }

    /// Money actually received; credit is collected later by a settlement invoice
    fn collected(&self) -> Decimal {
        self.cash + self.card + self.transfer
    }

    fn to_totals(self) -> PaymentTotals {
        PaymentTotals {
            cash: to_f64(self.cash),
            card: to_f64(self.card),
            transfer: to_f64(self.transfer),
            credit: to_f64(self.credit),
        }
    }
}

/// One income source folded into a summary
struct SourceFold {
    count: i64,
    voided_count: i64,
    sums: MethodSums,
}

impl SourceFold {
    fn new() -> Self {
        Self {
            count: 0,
            voided_count: 0,
            sums: MethodSums::default(),
        }
    }

    fn push(&mut self, voided: bool, method: PaymentMethod, total: f64) {
        if voided {
            self.voided_count += 1;
        } else {
            self.count += 1;
            self.sums.add(method, to_decimal(total));
        }
    }

    fn summary(&self) -> SourceSummary {
        SourceSummary {
            count: self.count,
            total: to_f64(self.sums.total()),
            voided_count: self.voided_count,
            by_payment_method: self.sums.to_totals(),
        }
    }
}

/// Compute the reconciliation of one day
///
/// `expected_cash = opening_balance + cash_income - expenses`.
/// `total_income` leaves out credit: a credit order reappears as income
/// when its conduce is settled.
pub fn reconcile(date: &str, opening_balance: f64, docs: &DayDocuments) -> DailyReconciliation {
    let mut sales = SourceFold::new();
    for s in &docs.sales {
        sales.push(s.is_voided, s.payment_method, s.total);
    }

    let mut orders = SourceFold::new();
    for o in &docs.orders {
        orders.push(o.is_voided, o.payment_method, o.total);
    }

    // Invoices issued for a delivery order were already counted with the order
    let mut invoices = SourceFold::new();
    for i in docs.invoices.iter().filter(|i| i.order_id.is_none()) {
        invoices.push(i.is_voided, i.payment_method, i.total);
    }

    let mut by_method = MethodSums::default();
    by_method.merge(&sales.sums);
    by_method.merge(&orders.sums);
    by_method.merge(&invoices.sums);

    let mut credit_total = Decimal::ZERO;
    let mut credit_count = 0;
    let mut credit_voided = 0;
    for c in &docs.conduces {
        if c.status == ConduceStatus::Voided {
            credit_voided += 1;
        } else {
            credit_count += 1;
            credit_total += to_decimal(c.total);
        }
    }

    let mut expense_total = Decimal::ZERO;
    let mut by_category: BTreeMap<String, Decimal> = BTreeMap::new();
    for e in &docs.expenses {
        let amount = to_decimal(e.amount);
        expense_total += amount;
        *by_category.entry(e.category.clone()).or_default() += amount;
    }

    let opening = to_decimal(opening_balance);
    let expected_cash = opening + by_method.cash - expense_total;

    DailyReconciliation {
        date: date.to_string(),
        opening_balance: to_f64(opening),
        sales: sales.summary(),
        orders: orders.summary(),
        invoices: invoices.summary(),
        by_payment_method: by_method.to_totals(),
        cash_income: to_f64(by_method.cash),
        total_income: to_f64(by_method.collected()),
        credit_issued: CreditSummary {
            count: credit_count,
            total: to_f64(credit_total),
            voided_count: credit_voided,
        },
        expenses: ExpenseSummary {
            count: docs.expenses.len() as i64,
            total: to_f64(expense_total),
            by_category: by_category
                .into_iter()
                .map(|(k, v)| (k, to_f64(v)))
                .collect(),
        },
        expected_cash: to_f64(expected_cash),
    }
}
