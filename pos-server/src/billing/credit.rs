//! Client credit rules

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{Client, Conduce, ConduceStatus};

use super::money::to_decimal;

/// `outstanding_balance + amount <= credit_limit`, credit must be enabled
pub fn check_credit(client: &Client, amount: f64) -> Result<(), AppError> {
    if !client.credit_enabled {
        return Err(AppError::with_message(
            ErrorCode::CreditNotEnabled,
            format!("Client {} is not enabled for credit", client.name),
        ));
    }
    let projected = to_decimal(client.outstanding_balance) + to_decimal(amount);
    if projected > to_decimal(client.credit_limit) {
        return Err(AppError::with_message(
            ErrorCode::CreditLimitExceeded,
            format!(
                "Credit limit exceeded for {}: balance {:.2} + {:.2} > limit {:.2}",
                client.name, client.outstanding_balance, amount, client.credit_limit
            ),
        )
        .with_detail("outstanding_balance", client.outstanding_balance)
        .with_detail("credit_limit", client.credit_limit)
        .with_detail("available_credit", client.available_credit()));
    }
    Ok(())
}

/// Only pending conduces can be voided or settled
pub fn ensure_pending(conduce: &Conduce) -> Result<(), AppError> {
    if conduce.status != ConduceStatus::Pending {
        return Err(AppError::with_message(
            ErrorCode::ConduceNotPending,
            format!("Conduce {} is {}", conduce.number, conduce.status),
        )
        .with_detail("conduce_id", conduce.id));
    }
    Ok(())
}

/// Hard delete is reserved for voided conduces
pub fn ensure_deletable(conduce: &Conduce) -> Result<(), AppError> {
    if conduce.status != ConduceStatus::Voided {
        return Err(AppError::with_message(
            ErrorCode::ConduceNotVoided,
            format!("Conduce {} must be voided before deletion", conduce.number),
        ));
    }
    Ok(())
}

/// Client can be deleted once nothing is owed
pub fn ensure_client_deletable(client: &Client, pending_conduces: i64) -> Result<(), AppError> {
    if to_decimal(client.outstanding_balance) > Decimal::ZERO || pending_conduces > 0 {
        return Err(AppError::with_message(
            ErrorCode::ClientHasBalance,
            format!(
                "Client {} still owes {:.2} ({} pending conduces)",
                client.name, client.outstanding_balance, pending_conduces
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(limit: f64, balance: f64) -> Client {
        Client {
            id: 7,
            name: "Colmado Pérez".into(),
            phone: None,
            rnc: None,
            address: None,
            credit_enabled: true,
            credit_limit: limit,
            outstanding_balance: balance,
            credit_days: 30,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_limit_exceeded_example() {
        let c = client(1000.0, 800.0);
        let err = check_credit(&c, 300.0).unwrap_err();
        assert_eq!(err.code, ErrorCode::CreditLimitExceeded);
        assert!(check_credit(&c, 200.0).is_ok());
    }

    #[test]
    fn test_credit_disabled() {
        let mut c = client(1000.0, 0.0);
        c.credit_enabled = false;
        assert_eq!(check_credit(&c, 1.0).unwrap_err().code, ErrorCode::CreditNotEnabled);
    }

    #[test]
    fn test_client_with_balance_not_deletable() {
        assert!(ensure_client_deletable(&client(1000.0, 0.0), 0).is_ok());
        assert_eq!(
            ensure_client_deletable(&client(1000.0, 10.0), 0).unwrap_err().code,
            ErrorCode::ClientHasBalance
        );
        assert!(ensure_client_deletable(&client(1000.0, 0.0), 1).is_err());
    }
}
