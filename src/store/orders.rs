//! Order repository. One record per purchase attempt, keyed by order id.

use chrono::Utc;

use crate::error::Result;
use crate::kv::Kv;
use crate::models::{CreateOrder, Order, OrderSummary};
use crate::util::generate_id;

pub const NS: &str = "orders";

/// Orders age out after 30 days; an order that is never paid simply
/// becomes unreachable.
pub const ORDER_TTL_SECS: i64 = 60 * 60 * 24 * 30;

pub fn create(kv: &Kv, fields: CreateOrder) -> Result<Order> {
    let order = fields.into_order(generate_id("ORD"), Utc::now());
    save(kv, &order)?;
    Ok(order)
}

pub fn get(kv: &Kv, order_id: &str) -> Result<Option<Order>> {
    match kv.get(NS, order_id)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Full overwrite with a fresh 30-day TTL. There is no partial update;
/// callers read-modify-write the whole record.
pub fn save(kv: &Kv, order: &Order) -> Result<()> {
    kv.put(
        NS,
        &order.order_id,
        &serde_json::to_string(order)?,
        ORDER_TTL_SECS,
    )
}

/// Paginated admin enumeration. The page is fetched in the store's native
/// key order and re-sorted newest-first; ordering across pages follows key
/// order, not time.
pub fn list(
    kv: &Kv,
    limit: usize,
    cursor: Option<&str>,
) -> Result<(Vec<OrderSummary>, Option<String>, bool)> {
    let page = kv.list(NS, limit, cursor)?;

    let mut items = Vec::with_capacity(page.keys.len());
    for key in &page.keys {
        // A record can expire between listing and fetching; skip it.
        if let Some(order) = get(kv, key)? {
            items.push(OrderSummary::from(order));
        }
    }
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok((items, page.cursor, page.has_more))
}
