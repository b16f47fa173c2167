//! Customer directory.

use chrono::Utc;
use sqlx::SqliteConnection;

use crate::db::query::{retain_matching, select_filtered};
use crate::db::tables::CustomerTable;
use crate::error::Result;
use crate::models::customer::{Customer, CustomerInput};
use crate::models::filter::ListFilter;

pub async fn list(conn: &mut SqliteConnection, search: Option<&str>) -> Result<Vec<Customer>> {
    let filter = ListFilter {
        search: search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        ..Default::default()
    };
    let mut builder = select_filtered(CustomerTable::TABLE_NAME, &filter);
    builder.push(" ORDER BY name ASC, id ASC");
    let mut customers = builder
        .build_query_as::<Customer>()
        .fetch_all(&mut *conn)
        .await?;
    retain_matching(&mut customers, filter.search.as_deref());
    Ok(customers)
}

pub async fn create(conn: &mut SqliteConnection, input: &CustomerInput) -> Result<Customer> {
    let customer = sqlx::query_as::<_, Customer>(
        "INSERT INTO customers (name, phone, address, created_at) VALUES (?, ?, ?, ?) RETURNING *",
    )
    .bind(&input.name)
    .bind(&input.phone)
    .bind(&input.address)
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await?;
    Ok(customer)
}

pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    input: &CustomerInput,
) -> Result<Option<Customer>> {
    let customer = sqlx::query_as::<_, Customer>(
        "UPDATE customers SET name = ?, phone = ?, address = ? WHERE id = ? RETURNING *",
    )
    .bind(&input.name)
    .bind(&input.phone)
    .bind(&input.address)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(customer)
}

async fn find_by_phone(conn: &mut SqliteConnection, phone: &str) -> Result<Option<Customer>> {
    let customer = sqlx::query_as::<_, Customer>(
        "SELECT * FROM customers WHERE TRIM(phone) = ? ORDER BY id LIMIT 1",
    )
    .bind(phone)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(customer)
}

async fn find_by_name(conn: &mut SqliteConnection, name: &str) -> Result<Option<Customer>> {
    let customer = sqlx::query_as::<_, Customer>(
        "SELECT * FROM customers WHERE TRIM(name) = ? ORDER BY id LIMIT 1",
    )
    .bind(name)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(customer)
}

/// Record the buyer of an order in the directory.
///
/// Matches by phone first, then by name. An existing entry is refreshed when
/// the name changed or a non-empty phone/address differs; blanks never erase
/// known details. Returns `None` when the buyer has no name.
pub async fn upsert_from_buyer(
    conn: &mut SqliteConnection,
    name: &str,
    phone: &str,
    address: &str,
) -> Result<Option<Customer>> {
    let buyer = CustomerInput {
        name: name.to_string(),
        phone: phone.to_string(),
        address: address.to_string(),
    }
    .normalized();
    if buyer.name.is_empty() {
        return Ok(None);
    }

    let existing = match buyer.phone.as_str() {
        "" => None,
        phone => find_by_phone(conn, phone).await?,
    };
    let existing = match existing {
        Some(customer) => Some(customer),
        None => find_by_name(conn, &buyer.name).await?,
    };

    let Some(existing) = existing else {
        let customer = create(conn, &buyer).await?;
        tracing::debug!(customer_id = customer.id, "added customer from order");
        return Ok(Some(customer));
    };

    let name_changed = existing.name != buyer.name;
    let phone_changed = !buyer.phone.is_empty() && existing.phone != buyer.phone;
    let address_changed = !buyer.address.is_empty() && existing.address != buyer.address;
    if !(name_changed || phone_changed || address_changed) {
        return Ok(Some(existing));
    }

    let merged = CustomerInput {
        name: buyer.name,
        phone: if phone_changed { buyer.phone } else { existing.phone.clone() },
        address: if address_changed {
            buyer.address
        } else {
            existing.address.clone()
        },
    };
    update(conn, existing.id, &merged).await
}
