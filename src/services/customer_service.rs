use crate::db::{customer_store, DbPool};
use crate::error::{AppError, Result};
use crate::models::customer::{Customer, CustomerInput};

/// Customer directory, also fed by order saves through `upsert_from_buyer`.
#[derive(Clone)]
pub struct CustomerService {
    pool: DbPool,
}

impl CustomerService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Customer>> {
        let mut conn = self.pool.acquire().await?;
        customer_store::list(&mut conn, search).await
    }

    pub async fn create(&self, input: CustomerInput) -> Result<Customer> {
        let input = input.normalized();
        input.validate()?;

        let mut conn = self.pool.acquire().await?;
        let customer = customer_store::create(&mut conn, &input).await?;
        tracing::info!(customer_id = customer.id, "customer created");
        Ok(customer)
    }

    pub async fn update(&self, id: i64, input: CustomerInput) -> Result<Customer> {
        let input = input.normalized();
        input.validate()?;

        let mut conn = self.pool.acquire().await?;
        customer_store::update(&mut conn, id, &input)
            .await?
            .ok_or(AppError::NotFound("Customer"))
    }
}
