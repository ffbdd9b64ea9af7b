//! Delivery Order Repository

use super::{RepoError, RepoResult, TimeRange, begin_write, client, conduce};
use crate::billing::{money, order_flow};
use shared::error::ErrorCode;
use shared::models::{
    Conduce, DeliveryOrder, DeliveryOrderCreate, LineItem, OrderStatus, PaymentMethod,
};
use sqlx::{SqliteExecutor, SqlitePool};

const ORDER_SELECT: &str = "SELECT id, customer_name, customer_phone, customer_address, client_id, description, amount, delivery_fee, total, payment_method, status, is_voided, void_reason, conduce_id, delivered_at, created_at, updated_at FROM delivery_order";

fn not_found(id: i64) -> RepoError {
    RepoError::not_found(ErrorCode::OrderNotFound, format!("Order {id} not found"))
}

pub async fn find_by_id<'e, E>(db: E, id: i64) -> RepoResult<Option<DeliveryOrder>>
where
    E: SqliteExecutor<'e>,
{
    let order = sqlx::query_as::<_, DeliveryOrder>(&format!("{ORDER_SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(order)
}

pub async fn get<'e, E>(db: E, id: i64) -> RepoResult<DeliveryOrder>
where
    E: SqliteExecutor<'e>,
{
    find_by_id(db, id).await?.ok_or_else(|| not_found(id))
}

pub async fn find_all(
    pool: &SqlitePool,
    range: Option<TimeRange>,
    status: Option<OrderStatus>,
) -> RepoResult<Vec<DeliveryOrder>> {
    let (start, end) = range
        .map(|r| (Some(r.start), Some(r.end)))
        .unwrap_or((None, None));
    let orders = sqlx::query_as::<_, DeliveryOrder>(&format!(
        "{ORDER_SELECT} WHERE (?1 IS NULL OR created_at >= ?1) AND (?2 IS NULL OR created_at < ?2) AND (?3 IS NULL OR status = ?3) ORDER BY created_at DESC"
    ))
    .bind(start)
    .bind(end)
    .bind(status)
    .fetch_all(pool)
    .await?;
    Ok(orders)
}

pub async fn create(pool: &SqlitePool, data: DeliveryOrderCreate) -> RepoResult<DeliveryOrder> {
    if data.payment_method == PaymentMethod::Credit || data.client_id.is_some() {
        let client = match data.client_id {
            Some(id) => Some(client::get(pool, id).await?),
            None => None,
        };
        order_flow::check_credit_client(data.payment_method, client.as_ref())?;
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    let total = money::order_total(data.amount, data.delivery_fee);
    sqlx::query(
        "INSERT INTO delivery_order (id, customer_name, customer_phone, customer_address, client_id, description, amount, delivery_fee, total, payment_method, status, is_voided, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 'received', 0, ?11, ?11)",
    )
    .bind(id)
    .bind(data.customer_name.trim())
    .bind(&data.customer_phone)
    .bind(&data.customer_address)
    .bind(data.client_id)
    .bind(&data.description)
    .bind(money::round2(data.amount))
    .bind(money::round2(data.delivery_fee))
    .bind(total)
    .bind(data.payment_method)
    .bind(now)
    .execute(pool)
    .await?;

    get(pool, id).await
}

/// Move the order forward.
///
/// Delivering a credit order issues a conduce in the same transaction;
/// if the client's limit would be exceeded nothing changes.
pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    next: OrderStatus,
) -> RepoResult<(DeliveryOrder, Option<Conduce>)> {
    let mut tx = begin_write(pool).await?;
    let order = get(&mut *tx, id).await?;
    order_flow::check_transition(&order, next)?;

    let mut issued = None;
    if order_flow::needs_conduce(&order, next) {
        let client_id = order.client_id.ok_or_else(|| {
            RepoError::Rule(
                ErrorCode::OrderCreditRequiresClient,
                format!("Order {id} has no client"),
            )
        })?;
        let client = client::get(&mut *tx, client_id).await?;
        let items = vec![LineItem {
            description: order_flow::conduce_description(&order),
            quantity: 1.0,
            unit_price: order.total,
            amount: order.total,
        }];
        let totals = money::compute_totals(&items, false);
        issued = Some(conduce::insert(&mut tx, &client, items, totals, false, Some(order.id)).await?);
    }

    let now = shared::util::now_millis();
    let delivered_at = (next == OrderStatus::Delivered).then_some(now);
    let rows = sqlx::query(
        "UPDATE delivery_order SET status = ?1, delivered_at = COALESCE(?2, delivered_at), conduce_id = COALESCE(?3, conduce_id), updated_at = ?4 WHERE id = ?5 AND status = ?6 AND is_voided = 0",
    )
    .bind(next)
    .bind(delivered_at)
    .bind(issued.as_ref().map(|c| c.id))
    .bind(now)
    .bind(id)
    .bind(order.status)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::Rule(
            ErrorCode::OrderInvalidTransition,
            format!("Order {id} changed concurrently"),
        ));
    }

    let updated = get(&mut *tx, id).await?;
    tx.commit().await?;
    Ok((updated, issued))
}

pub async fn update_payment_method(
    pool: &SqlitePool,
    id: i64,
    method: PaymentMethod,
) -> RepoResult<DeliveryOrder> {
    let order = get(pool, id).await?;
    order_flow::check_payment_change(&order)?;
    if method == PaymentMethod::Credit {
        let client = match order.client_id {
            Some(cid) => Some(client::get(pool, cid).await?),
            None => None,
        };
        order_flow::check_credit_client(method, client.as_ref())?;
    }

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE delivery_order SET payment_method = ?1, updated_at = ?2 WHERE id = ?3 AND status != 'delivered' AND is_voided = 0",
    )
    .bind(method)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::Rule(
            ErrorCode::OrderAlreadyDelivered,
            format!("Order {id} can no longer change payment method"),
        ));
    }
    get(pool, id).await
}

pub async fn void(pool: &SqlitePool, id: i64, reason: Option<String>) -> RepoResult<DeliveryOrder> {
    let order = get(pool, id).await?;
    order_flow::check_void(&order)?;

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE delivery_order SET is_voided = 1, void_reason = ?1, updated_at = ?2 WHERE id = ?3 AND is_voided = 0 AND status != 'delivered'",
    )
    .bind(&reason)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::Rule(
            ErrorCode::OrderAlreadyVoided,
            format!("Order {id} cannot be voided"),
        ));
    }
    get(pool, id).await
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM delivery_order WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::{credit_client, test_pool};
    use shared::models::ConduceStatus;

    fn new_order(client_id: Option<i64>, method: PaymentMethod, amount: f64) -> DeliveryOrderCreate {
        DeliveryOrderCreate {
            customer_name: "María".into(),
            customer_phone: Some("829-555-0199".into()),
            customer_address: Some("Calle El Sol 12".into()),
            client_id,
            description: Some("2 pizzas".into()),
            amount,
            delivery_fee: 100.0,
            payment_method: method,
        }
    }

    #[tokio::test]
    async fn test_create_computes_total() {
        let pool = test_pool().await;
        let order = create(&pool, new_order(None, PaymentMethod::Cash, 550.0)).await.unwrap();
        assert_eq!(order.total, 650.0);
        assert_eq!(order.status, OrderStatus::Received);
        assert!(!order.is_voided);
    }

    #[tokio::test]
    async fn test_credit_order_requires_client() {
        let pool = test_pool().await;
        let err = create(&pool, new_order(None, PaymentMethod::Credit, 100.0))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Rule(ErrorCode::OrderCreditRequiresClient, _)));
    }

    #[tokio::test]
    async fn test_delivered_is_immutable() {
        let pool = test_pool().await;
        let order = create(&pool, new_order(None, PaymentMethod::Cash, 300.0)).await.unwrap();
        let (order, conduce) = update_status(&pool, order.id, OrderStatus::Delivered).await.unwrap();
        assert!(conduce.is_none());
        assert!(order.delivered_at.is_some());

        let err = update_status(&pool, order.id, OrderStatus::EnRoute).await.unwrap_err();
        assert!(matches!(err, RepoError::Rule(ErrorCode::OrderAlreadyDelivered, _)));
        let err = update_payment_method(&pool, order.id, PaymentMethod::Card)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Rule(ErrorCode::OrderAlreadyDelivered, _)));
        assert_eq!(get(&pool, order.id).await.unwrap().payment_method, PaymentMethod::Cash);
    }

    #[tokio::test]
    async fn test_credit_delivery_issues_conduce() {
        let pool = test_pool().await;
        let c = credit_client(&pool, 1000.0).await;
        let order = create(&pool, new_order(Some(c.id), PaymentMethod::Credit, 400.0))
            .await
            .unwrap();

        update_status(&pool, order.id, OrderStatus::Preparing).await.unwrap();
        let (order, conduce) = update_status(&pool, order.id, OrderStatus::Delivered).await.unwrap();
        let conduce = conduce.unwrap();
        assert_eq!(order.conduce_id, Some(conduce.id));
        assert_eq!(conduce.total, 500.0);
        assert_eq!(conduce.order_id, Some(order.id));
        assert_eq!(conduce.status, ConduceStatus::Pending);
        assert_eq!(conduce.items[0].description, "2 pizzas");
        assert_eq!(client::get(&pool, c.id).await.unwrap().outstanding_balance, 500.0);
    }

    #[tokio::test]
    async fn test_credit_delivery_over_limit_changes_nothing() {
        let pool = test_pool().await;
        let c = credit_client(&pool, 300.0).await;
        let order = create(&pool, new_order(Some(c.id), PaymentMethod::Credit, 400.0))
            .await
            .unwrap();

        let err = update_status(&pool, order.id, OrderStatus::Delivered).await.unwrap_err();
        assert!(matches!(err, RepoError::Rule(ErrorCode::CreditLimitExceeded, _)));

        let order = get(&pool, order.id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Received);
        assert!(order.conduce_id.is_none());
        assert_eq!(client::get(&pool, c.id).await.unwrap().outstanding_balance, 0.0);
    }

    #[tokio::test]
    async fn test_void_and_filters() {
        let pool = test_pool().await;
        let a = create(&pool, new_order(None, PaymentMethod::Cash, 100.0)).await.unwrap();
        let b = create(&pool, new_order(None, PaymentMethod::Card, 200.0)).await.unwrap();
        update_status(&pool, b.id, OrderStatus::EnRoute).await.unwrap();

        let voided = void(&pool, a.id, Some("Cliente canceló".into())).await.unwrap();
        assert!(voided.is_voided);
        assert!(void(&pool, a.id, None).await.is_err());
        assert!(update_status(&pool, a.id, OrderStatus::Preparing).await.is_err());

        let en_route = find_all(&pool, None, Some(OrderStatus::EnRoute)).await.unwrap();
        assert_eq!(en_route.len(), 1);
        assert_eq!(en_route[0].id, b.id);

        delete(&pool, a.id).await.unwrap();
        assert!(matches!(
            delete(&pool, a.id).await.unwrap_err(),
            RepoError::NotFound(ErrorCode::OrderNotFound, _)
        ));
    }
}
