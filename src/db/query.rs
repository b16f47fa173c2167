use sqlx::{QueryBuilder, Sqlite};

use crate::models::customer::Customer;
use crate::models::filter::ListFilter;
use crate::models::inventory::InventoryItem;
use crate::models::order::{CustomerOrder, ShopOrder};

/// Records that the free-text `search` filter looks into.
///
/// Matching happens in Rust because SQLite's LIKE only folds ASCII case,
/// which misses Vietnamese capitals such as "Ễ".
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;

    /// `needle` must already be lowercased.
    fn matches_search(&self, needle: &str) -> bool {
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

impl Searchable for CustomerOrder {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.buyer_name.as_str(),
            self.order_code.as_str(),
            self.buyer_phone.as_str(),
            self.buyer_address.as_str(),
        ]
    }
}

impl Searchable for ShopOrder {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.buyer_name.as_str(),
            self.order_code.as_str(),
            self.buyer_phone.as_str(),
            self.buyer_address.as_str(),
        ]
    }
}

impl Searchable for InventoryItem {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.order_code.as_str(), self.note.as_str()]
    }
}

impl Searchable for Customer {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.phone.as_str(), self.address.as_str()]
    }
}

/// Keep the rows containing `search`, ignoring case. Order is preserved.
pub fn retain_matching<T: Searchable>(rows: &mut Vec<T>, search: Option<&str>) {
    if let Some(search) = search {
        let needle = search.to_lowercase();
        rows.retain(|row| row.matches_search(&needle));
    }
}

/// `SELECT * FROM <table> WHERE ...` with the structured filters applied.
///
/// `search` is left to [`retain_matching`].
pub fn select_filtered<'a>(table: &str, filter: &'a ListFilter) -> QueryBuilder<'a, Sqlite> {
    let mut builder = QueryBuilder::new(format!("SELECT * FROM {table} WHERE 1 = 1"));

    if let Some(status) = &filter.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(priority) = filter.priority {
        builder.push(" AND priority = ").push_bind(priority);
    }
    if let Some(sync_id) = &filter.sync_id {
        builder.push(" AND sync_id = ").push_bind(sync_id.as_str());
    }
    if let Some(start) = filter.created.start {
        builder.push(" AND created_at >= ").push_bind(start);
    }
    if let Some(end) = filter.created.end {
        builder.push(" AND created_at < ").push_bind(end);
    }
    builder
}
