//! Conduce → invoice settlement planning
//!
//! Pure validation over the loaded conduces; the repository applies the
//! plan inside one transaction.

use std::collections::HashSet;

use shared::error::{AppError, ErrorCode};
use shared::models::{Conduce, LineItem};

use super::credit::ensure_pending;
use super::money::{DocumentTotals, sum_totals};

#[derive(Debug, Clone)]
pub struct SettlementPlan {
    pub client_id: i64,
    pub client_name: String,
    pub conduce_ids: Vec<i64>,
    pub items: Vec<LineItem>,
    pub totals: DocumentTotals,
}

/// Every id must resolve to a pending conduce of one single client
pub fn plan_settlement(ids: &[i64], conduces: &[Conduce]) -> Result<SettlementPlan, AppError> {
    if ids.is_empty() {
        return Err(AppError::validation("conduce_ids must not be empty"));
    }

    let mut seen = HashSet::with_capacity(ids.len());
    let mut selected = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.insert(*id) {
            return Err(AppError::validation(format!("Duplicate conduce id {id}")));
        }
        let conduce = conduces.iter().find(|c| c.id == *id).ok_or_else(|| {
            AppError::with_message(ErrorCode::ConduceNotFound, format!("Conduce {id} not found"))
                .with_detail("conduce_id", *id)
        })?;
        ensure_pending(conduce)?;
        selected.push(conduce);
    }

    let first = selected[0];
    if let Some(other) = selected.iter().find(|c| c.client_id != first.client_id) {
        return Err(AppError::with_message(
            ErrorCode::InvoiceMixedClients,
            format!(
                "Conduce {} belongs to a different client than {}",
                other.number, first.number
            ),
        ));
    }

    let items = selected.iter().flat_map(|c| c.items.iter().cloned()).collect();
    let totals = sum_totals(selected.iter().map(|c| DocumentTotals {
        subtotal: c.subtotal,
        tax: c.tax,
        total: c.total,
    }));

    Ok(SettlementPlan {
        client_id: first.client_id,
        client_name: first.client_name.clone(),
        conduce_ids: ids.to_vec(),
        items,
        totals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ConduceStatus;

    fn conduce(id: i64, client_id: i64, total: f64, status: ConduceStatus) -> Conduce {
        Conduce {
            id,
            number: format!("CON-{id:06}"),
            client_id,
            client_name: "Cliente".into(),
            items: vec![LineItem {
                description: format!("Pedido {id}"),
                quantity: 1.0,
                unit_price: total,
                amount: total,
            }],
            subtotal: total,
            tax: 0.0,
            total,
            status,
            is_fiscal: false,
            void_reason: None,
            invoice_id: None,
            order_id: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_plan_sums_and_concatenates() {
        let all = vec![
            conduce(1, 9, 150.0, ConduceStatus::Pending),
            conduce(2, 9, 250.5, ConduceStatus::Pending),
        ];
        let plan = plan_settlement(&[2, 1], &all).unwrap();
        assert_eq!(plan.client_id, 9);
        assert_eq!(plan.totals.total, 400.5);
        assert_eq!(plan.items.len(), 2);
        assert_eq!(plan.items[0].description, "Pedido 2");
    }

    #[test]
    fn test_missing_conduce() {
        let all = vec![conduce(1, 9, 150.0, ConduceStatus::Pending)];
        let err = plan_settlement(&[1, 5], &all).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConduceNotFound);
    }

    #[test]
    fn test_non_pending_rejected() {
        let all = vec![
            conduce(1, 9, 150.0, ConduceStatus::Pending),
            conduce(2, 9, 80.0, ConduceStatus::Paid),
        ];
        let err = plan_settlement(&[1, 2], &all).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConduceNotPending);
    }

    #[test]
    fn test_mixed_clients_rejected() {
        let all = vec![
            conduce(1, 9, 150.0, ConduceStatus::Pending),
            conduce(2, 10, 80.0, ConduceStatus::Pending),
        ];
        let err = plan_settlement(&[1, 2], &all).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvoiceMixedClients);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let all = vec![conduce(1, 9, 150.0, ConduceStatus::Pending)];
        assert!(plan_settlement(&[1, 1], &all).is_err());
        assert!(plan_settlement(&[], &all).is_err());
    }
}
