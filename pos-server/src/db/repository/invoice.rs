//! Invoice Repository
//!
//! Direct invoices and conduce settlements. A settlement marks its conduces
//! paid and lowers the client balance in the same transaction; voiding it
//! undoes both.

use super::{RepoError, RepoResult, TimeRange, begin_write, client, conduce, delivery_order, sequence, tax_config};
use crate::billing::{DocumentKind, DocumentTotals, money, settlement};
use shared::error::ErrorCode;
use shared::models::{Client, Invoice, InvoiceCreate, LineItem, PaymentMethod};
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

const INVOICE_SELECT: &str = "SELECT id, number, client_id, customer_name, customer_phone, customer_address, customer_rnc, order_id, items, subtotal, tax, total, is_fiscal, requires_rnc, ncf, tax_config_id, payment_method, is_voided, void_reason, conduce_ids, created_at, updated_at FROM invoice";

fn not_found(id: i64) -> RepoError {
    RepoError::not_found(ErrorCode::InvoiceNotFound, format!("Invoice {id} not found"))
}

/// Resolved body of an invoice before insert
struct InvoiceDraft {
    client: Option<Client>,
    items: Vec<LineItem>,
    totals: DocumentTotals,
    conduce_ids: Vec<i64>,
}

pub async fn find_by_id<'e, E>(db: E, id: i64) -> RepoResult<Option<Invoice>>
where
    E: SqliteExecutor<'e>,
{
    let invoice = sqlx::query_as::<_, Invoice>(&format!("{INVOICE_SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(invoice)
}

pub async fn get<'e, E>(db: E, id: i64) -> RepoResult<Invoice>
where
    E: SqliteExecutor<'e>,
{
    find_by_id(db, id).await?.ok_or_else(|| not_found(id))
}

pub async fn find_all(
    pool: &SqlitePool,
    range: Option<TimeRange>,
    client_id: Option<i64>,
) -> RepoResult<Vec<Invoice>> {
    let (start, end) = range
        .map(|r| (Some(r.start), Some(r.end)))
        .unwrap_or((None, None));
    let invoices = sqlx::query_as::<_, Invoice>(&format!(
        "{INVOICE_SELECT} WHERE (?1 IS NULL OR created_at >= ?1) AND (?2 IS NULL OR created_at < ?2) AND (?3 IS NULL OR client_id = ?3) ORDER BY created_at DESC"
    ))
    .bind(start)
    .bind(end)
    .bind(client_id)
    .fetch_all(pool)
    .await?;
    Ok(invoices)
}

/// Load the settled conduces and turn them into the invoice body
async fn settlement_draft(conn: &mut SqliteConnection, data: &InvoiceCreate) -> RepoResult<InvoiceDraft> {
    if data.payment_method == PaymentMethod::Credit {
        return Err(RepoError::Rule(
            ErrorCode::PaymentMethodNotAllowed,
            "A settlement invoice cannot be paid on credit".into(),
        ));
    }
    let conduces = conduce::find_by_ids(&mut *conn, &data.conduce_ids).await?;
    let plan = settlement::plan_settlement(&data.conduce_ids, &conduces)?;
    if data.client_id.is_some_and(|cid| cid != plan.client_id) {
        return Err(RepoError::Rule(
            ErrorCode::InvoiceMixedClients,
            format!("Conduces belong to client {}, not the invoice client", plan.client_name),
        ));
    }
    let client = client::get(&mut *conn, plan.client_id).await?;
    Ok(InvoiceDraft {
        client: Some(client),
        items: plan.items,
        totals: plan.totals,
        conduce_ids: plan.conduce_ids,
    })
}

async fn direct_draft(conn: &mut SqliteConnection, data: &InvoiceCreate) -> RepoResult<InvoiceDraft> {
    let items = money::build_line_items(&data.items)?;
    let totals = money::compute_totals(&items, data.is_fiscal);
    let client = match data.client_id {
        Some(cid) => Some(client::get(&mut *conn, cid).await?),
        None => None,
    };
    if let Some(order_id) = data.order_id {
        delivery_order::get(&mut *conn, order_id).await?;
    }
    Ok(InvoiceDraft {
        client,
        items,
        totals,
        conduce_ids: Vec::new(),
    })
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub async fn create(pool: &SqlitePool, data: InvoiceCreate) -> RepoResult<Invoice> {
    let mut tx = begin_write(pool).await?;
    let draft = if data.conduce_ids.is_empty() {
        direct_draft(&mut tx, &data).await?
    } else {
        settlement_draft(&mut tx, &data).await?
    };

    // Customer snapshot: explicit fields win over the client record
    let client = draft.client.as_ref();
    let customer_name = non_empty(&data.customer_name).or_else(|| client.map(|c| c.name.clone()));
    let customer_phone = non_empty(&data.customer_phone).or_else(|| client.and_then(|c| c.phone.clone()));
    let customer_address =
        non_empty(&data.customer_address).or_else(|| client.and_then(|c| c.address.clone()));
    let customer_rnc = non_empty(&data.customer_rnc).or_else(|| client.and_then(|c| c.rnc.clone()));

    if customer_name.is_none() {
        return Err(RepoError::Rule(
            ErrorCode::InvoiceCustomerRequired,
            "Either client_id or customer_name is required".into(),
        ));
    }
    if data.requires_rnc && customer_rnc.is_none() {
        return Err(RepoError::Rule(
            ErrorCode::InvoiceRncRequired,
            "This invoice requires the customer's RNC".into(),
        ));
    }

    let ncf = match (data.is_fiscal, data.tax_config_id) {
        (true, Some(config_id)) => Some(tax_config::allocate_ncf(&mut tx, config_id).await?),
        _ => None,
    };

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    let number = sequence::next_number(&mut tx, DocumentKind::Invoice).await?;
    let items_json =
        serde_json::to_string(&draft.items).map_err(|e| RepoError::Database(e.to_string()))?;
    let conduce_ids_json =
        serde_json::to_string(&draft.conduce_ids).map_err(|e| RepoError::Database(e.to_string()))?;

    sqlx::query(
        "INSERT INTO invoice (id, number, client_id, customer_name, customer_phone, customer_address, customer_rnc, order_id, items, subtotal, tax, total, is_fiscal, requires_rnc, ncf, tax_config_id, payment_method, is_voided, conduce_ids, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, 0, ?18, ?19, ?19)",
    )
    .bind(id)
    .bind(&number)
    .bind(client.map(|c| c.id))
    .bind(&customer_name)
    .bind(&customer_phone)
    .bind(&customer_address)
    .bind(&customer_rnc)
    .bind(data.order_id)
    .bind(items_json)
    .bind(draft.totals.subtotal)
    .bind(draft.totals.tax)
    .bind(draft.totals.total)
    .bind(data.is_fiscal)
    .bind(data.requires_rnc)
    .bind(&ncf)
    .bind(ncf.as_ref().and(data.tax_config_id))
    .bind(data.payment_method)
    .bind(conduce_ids_json)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    if !draft.conduce_ids.is_empty() {
        for conduce_id in &draft.conduce_ids {
            conduce::mark_paid(&mut tx, *conduce_id, id).await?;
        }
        if let Some(c) = client {
            client::release_credit(&mut tx, c.id, draft.totals.total).await?;
        }
    }

    let invoice = get(&mut *tx, id).await?;
    tx.commit().await?;
    tracing::info!(
        invoice = %invoice.number,
        total = invoice.total,
        settled = invoice.conduce_ids.len(),
        "Invoice created"
    );
    Ok(invoice)
}

/// Void an invoice; a settlement puts its conduces back to pending
pub async fn void(pool: &SqlitePool, id: i64, reason: Option<String>) -> RepoResult<Invoice> {
    let mut tx = begin_write(pool).await?;
    let invoice = get(&mut *tx, id).await?;
    if invoice.is_voided {
        return Err(RepoError::Rule(
            ErrorCode::InvoiceAlreadyVoided,
            format!("Invoice {} is already voided", invoice.number),
        ));
    }

    let now = shared::util::now_millis();
    sqlx::query("UPDATE invoice SET is_voided = 1, void_reason = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(&reason)
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if invoice.is_settlement() {
        let reverted = conduce::revert_paid(&mut tx, id).await?;
        if let Some(client_id) = invoice.client_id {
            client::restore_credit(&mut tx, client_id, invoice.total).await?;
        }
        tracing::info!(invoice = %invoice.number, reverted, "Settlement voided");
    }

    let voided = get(&mut *tx, id).await?;
    tx.commit().await?;
    Ok(voided)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let invoice = get(pool, id).await?;
    if invoice.is_settlement() && !invoice.is_voided {
        return Err(RepoError::Rule(
            ErrorCode::InvoiceSettlementActive,
            format!("Void settlement invoice {} before deleting it", invoice.number),
        ));
    }
    sqlx::query("DELETE FROM invoice WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::{FileDb, credit_client, test_pool};
    use shared::models::{ConduceCreate, ConduceStatus, LineItemInput, TaxConfigCreate};
    use std::collections::HashSet;

    fn line(description: &str, quantity: f64, unit_price: f64) -> LineItemInput {
        LineItemInput {
            description: description.into(),
            quantity,
            unit_price,
        }
    }

    async fn issue(pool: &SqlitePool, client_id: i64, amount: f64) -> shared::models::Conduce {
        conduce::create(
            pool,
            ConduceCreate {
                client_id,
                items: vec![line("Mercancía", 1.0, amount)],
                is_fiscal: false,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_direct_invoice_with_ncf() {
        let pool = test_pool().await;
        let config = tax_config::create(
            &pool,
            TaxConfigCreate {
                name: "Consumidor final".into(),
                rnc: "101000001".into(),
                ncf_prefix: "B02".into(),
                next_sequence: 1,
                is_active: true,
            },
        )
        .await
        .unwrap();

        let invoice = create(
            &pool,
            InvoiceCreate {
                customer_name: Some("Juan".into()),
                items: vec![line("Almuerzo", 2.0, 250.0)],
                is_fiscal: true,
                tax_config_id: Some(config.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(invoice.number, "FAC-000001");
        assert_eq!(invoice.subtotal, 500.0);
        assert_eq!(invoice.tax, 90.0);
        assert_eq!(invoice.total, 590.0);
        assert_eq!(invoice.ncf.as_deref(), Some("B0200000001"));
        assert!(!invoice.is_settlement());
    }

    #[tokio::test]
    async fn test_customer_and_rnc_required() {
        let pool = test_pool().await;
        let err = create(
            &pool,
            InvoiceCreate {
                items: vec![line("Algo", 1.0, 10.0)],
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Rule(ErrorCode::InvoiceCustomerRequired, _)));

        let err = create(
            &pool,
            InvoiceCreate {
                customer_name: Some("Juan".into()),
                items: vec![line("Algo", 1.0, 10.0)],
                requires_rnc: true,
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Rule(ErrorCode::InvoiceRncRequired, _)));

        // Nothing was numbered
        let mut tx = pool.begin().await.unwrap();
        let next = sequence::next_number(&mut tx, DocumentKind::Invoice).await.unwrap();
        assert_eq!(next, "FAC-000001");
    }

    #[tokio::test]
    async fn test_settlement_pays_conduces_and_lowers_balance() {
        let pool = test_pool().await;
        let c = credit_client(&pool, 1000.0).await;
        let a = issue(&pool, c.id, 300.0).await;
        let b = issue(&pool, c.id, 200.0).await;
        let untouched = issue(&pool, c.id, 100.0).await;
        assert_eq!(client::get(&pool, c.id).await.unwrap().outstanding_balance, 600.0);

        let invoice = create(
            &pool,
            InvoiceCreate {
                conduce_ids: vec![a.id, b.id],
                requires_rnc: true,
                payment_method: PaymentMethod::Transfer,
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(invoice.total, 500.0);
        assert_eq!(invoice.items.len(), 2);
        assert_eq!(invoice.client_id, Some(c.id));
        assert_eq!(invoice.customer_rnc.as_deref(), Some("131000001"));
        assert_eq!(client::get(&pool, c.id).await.unwrap().outstanding_balance, 100.0);

        let a = conduce::get(&pool, a.id).await.unwrap();
        assert_eq!(a.status, ConduceStatus::Paid);
        assert_eq!(a.invoice_id, Some(invoice.id));
        let untouched = conduce::get(&pool, untouched.id).await.unwrap();
        assert_eq!(untouched.status, ConduceStatus::Pending);
    }

    #[tokio::test]
    async fn test_settlement_is_all_or_nothing() {
        let pool = test_pool().await;
        let c = credit_client(&pool, 1000.0).await;
        let a = issue(&pool, c.id, 300.0).await;
        let b = issue(&pool, c.id, 200.0).await;
        conduce::void(&pool, b.id, None).await.unwrap();

        let err = create(
            &pool,
            InvoiceCreate {
                conduce_ids: vec![a.id, b.id],
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Rule(ErrorCode::ConduceNotPending, _)));
        assert_eq!(conduce::get(&pool, a.id).await.unwrap().status, ConduceStatus::Pending);
        assert_eq!(client::get(&pool, c.id).await.unwrap().outstanding_balance, 300.0);

        let err = create(
            &pool,
            InvoiceCreate {
                conduce_ids: vec![a.id, 77],
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(ErrorCode::ConduceNotFound, _)));

        let err = create(
            &pool,
            InvoiceCreate {
                conduce_ids: vec![a.id],
                payment_method: PaymentMethod::Credit,
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Rule(ErrorCode::PaymentMethodNotAllowed, _)));
    }

    #[tokio::test]
    async fn test_void_settlement_restores_state() {
        let pool = test_pool().await;
        let c = credit_client(&pool, 1000.0).await;
        let a = issue(&pool, c.id, 450.0).await;
        let invoice = create(
            &pool,
            InvoiceCreate {
                conduce_ids: vec![a.id],
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(client::get(&pool, c.id).await.unwrap().outstanding_balance, 0.0);

        let err = delete(&pool, invoice.id).await.unwrap_err();
        assert!(matches!(err, RepoError::Rule(ErrorCode::InvoiceSettlementActive, _)));

        let voided = void(&pool, invoice.id, Some("pago rebotado".into())).await.unwrap();
        assert!(voided.is_voided);
        let a = conduce::get(&pool, a.id).await.unwrap();
        assert_eq!(a.status, ConduceStatus::Pending);
        assert_eq!(a.invoice_id, None);
        assert_eq!(client::get(&pool, c.id).await.unwrap().outstanding_balance, 450.0);

        let err = void(&pool, invoice.id, None).await.unwrap_err();
        assert!(matches!(err, RepoError::Rule(ErrorCode::InvoiceAlreadyVoided, _)));
        delete(&pool, invoice.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_writers_wait_for_the_lock() {
        let db = FileDb::open().await;
        let pool = db.pool.clone();
        let client_id = credit_client(&pool, 1_000_000.0).await.id;

        let creates = (0..20).map(|_| {
            let pool = pool.clone();
            tokio::spawn(async move {
                conduce::create(
                    &pool,
                    ConduceCreate {
                        client_id,
                        items: vec![line("Mercancía", 1.0, 10.0)],
                        is_fiscal: false,
                    },
                )
                .await
            })
        });
        let issued: Vec<_> = futures::future::join_all(creates)
            .await
            .into_iter()
            .map(|joined| joined.unwrap().unwrap())
            .collect();
        let numbers: HashSet<_> = issued.iter().map(|c| c.number.clone()).collect();
        assert_eq!(numbers.len(), 20);
        assert_eq!(client::get(&pool, client_id).await.unwrap().outstanding_balance, 200.0);

        // Racing settlements of one conduce: one wins, the rest see it paid
        let target = issued[0].id;
        let settlements = (0..5).map(|_| {
            let pool = pool.clone();
            tokio::spawn(async move {
                create(
                    &pool,
                    InvoiceCreate {
                        conduce_ids: vec![target],
                        ..Default::default()
                    },
                )
                .await
            })
        });
        let results: Vec<_> = futures::future::join_all(settlements)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect();
        let paid: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(paid.len(), 1);
        assert_eq!(paid[0].number, "FAC-000001");
        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            assert!(matches!(err, RepoError::Rule(ErrorCode::ConduceNotPending, _)), "{err:?}");
        }
        assert_eq!(client::get(&pool, client_id).await.unwrap().outstanding_balance, 190.0);
        assert_eq!(conduce::get(&pool, target).await.unwrap().status, ConduceStatus::Paid);

        db.close().await;
    }
}
