use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{
    DateRange, Page, Product, ProductId, Pvz, PvzId, Reception, ReceptionId, ReceptionStatus, User,
};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

use crate::store::{ProductStore, PvzStore, ReceptionStore, UserStore};
use crate::{Result, StoreError};

/// Connection settings for [`PostgresStore::connect`].
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Upper bound on waiting for a pooled connection; bounds every store call.
    pub acquire_timeout: Duration,
}

/// PostgreSQL-backed store implementation.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool using the given settings.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.url)
            .await?;
        tracing::debug!(max_connections = config.max_connections, "Connected to PostgreSQL");
        Ok(Self::new(pool))
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    /// Waits for checked-out connections to be returned, then closes the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn row_to_pvz(row: PgRow) -> Result<Pvz> {
        let city: String = row.try_get("city")?;
        Ok(Pvz {
            id: PvzId::new(row.try_get::<String, _>("id")?),
            registration_date: row.try_get::<DateTime<Utc>, _>("registration_date")?,
            city: city.parse().map_err(decode_error)?,
        })
    }

    fn row_to_reception(row: PgRow) -> Result<Reception> {
        let status: String = row.try_get("status")?;
        Ok(Reception {
            id: ReceptionId::new(row.try_get::<String, _>("id")?),
            opened_at: row.try_get::<DateTime<Utc>, _>("date_time")?,
            pvz_id: PvzId::new(row.try_get::<String, _>("pvz_id")?),
            status: status.parse().map_err(decode_error)?,
        })
    }

    fn row_to_product(row: PgRow) -> Result<Product> {
        let product_type: String = row.try_get("type")?;
        Ok(Product {
            id: ProductId::new(row.try_get::<String, _>("id")?),
            added_at: row.try_get::<DateTime<Utc>, _>("date_time")?,
            product_type: product_type.parse().map_err(decode_error)?,
            reception_id: ReceptionId::new(row.try_get::<String, _>("reception_id")?),
        })
    }

    fn row_to_user(row: PgRow) -> Result<User> {
        let role: String = row.try_get("role")?;
        Ok(User {
            id: row.try_get::<String, _>("id")?.into(),
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            role: role.parse().map_err(decode_error)?,
        })
    }
}

fn decode_error(err: common::ParseEnumError) -> StoreError {
    StoreError::Decode(err.to_string())
}

/// Maps unique-constraint violations to [`StoreError::Conflict`].
fn map_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
        && let Some(constraint) = db_err.constraint()
    {
        return StoreError::Conflict {
            constraint: constraint.to_string(),
        };
    }
    StoreError::Database(err)
}

#[async_trait]
impl PvzStore for PostgresStore {
    async fn create_pvz(&self, pvz: &Pvz) -> Result<()> {
        sqlx::query("INSERT INTO pvz (id, registration_date, city) VALUES ($1, $2, $3)")
            .bind(pvz.id.as_str())
            .bind(pvz.registration_date)
            .bind(pvz.city.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;
        Ok(())
    }

    async fn list_pvz_page(&self, page: Page) -> Result<Vec<Pvz>> {
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
        let rows = sqlx::query(
            r#"
            SELECT id, registration_date, city
            FROM pvz
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(page.size()))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_pvz).collect()
    }

    async fn list_all_pvz(&self) -> Result<Vec<Pvz>> {
        let rows = sqlx::query("SELECT id, registration_date, city FROM pvz ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_pvz).collect()
    }

    async fn get_pvz(&self, id: &PvzId) -> Result<Option<Pvz>> {
        let row: Option<PgRow> =
            sqlx::query("SELECT id, registration_date, city FROM pvz WHERE id = $1")
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await?;

        row.map(Self::row_to_pvz).transpose()
    }
}

#[async_trait]
impl ReceptionStore for PostgresStore {
    async fn create_reception(&self, reception: &Reception) -> Result<()> {
        sqlx::query("INSERT INTO receptions (id, date_time, pvz_id, status) VALUES ($1, $2, $3, $4)")
            .bind(reception.id.as_str())
            .bind(reception.opened_at)
            .bind(reception.pvz_id.as_str())
            .bind(reception.status.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;
        Ok(())
    }

    async fn last_reception_for_pvz(&self, pvz_id: &PvzId) -> Result<Option<Reception>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, date_time, pvz_id, status
            FROM receptions
            WHERE pvz_id = $1
            ORDER BY date_time DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(pvz_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_reception).transpose()
    }

    async fn update_reception_status(
        &self,
        id: &ReceptionId,
        status: ReceptionStatus,
    ) -> Result<()> {
        sqlx::query("UPDATE receptions SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;
        Ok(())
    }

    async fn receptions_for_pvzs(
        &self,
        pvz_ids: &[PvzId],
        range: DateRange,
    ) -> Result<Vec<Reception>> {
        if pvz_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = pvz_ids.iter().map(|id| id.as_str().to_string()).collect();
        let rows = sqlx::query(
            r#"
            SELECT id, date_time, pvz_id, status
            FROM receptions
            WHERE pvz_id = ANY($1)
              AND ($2::timestamptz IS NULL OR date_time >= $2)
              AND ($3::timestamptz IS NULL OR date_time <= $3)
            ORDER BY date_time ASC
            "#,
        )
        .bind(ids)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_reception).collect()
    }
}

#[async_trait]
impl ProductStore for PostgresStore {
    async fn create_product(&self, product: &Product) -> Result<()> {
        sqlx::query(
            "INSERT INTO products (id, date_time, type, reception_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(product.id.as_str())
        .bind(product.added_at)
        .bind(product.product_type.as_str())
        .bind(product.reception_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;
        Ok(())
    }

    async fn last_product_for_reception(
        &self,
        reception_id: &ReceptionId,
    ) -> Result<Option<Product>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, date_time, type, reception_id
            FROM products
            WHERE reception_id = $1
            ORDER BY date_time DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(reception_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_product).transpose()
    }

    async fn delete_product(&self, id: &ProductId) -> Result<()> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn products_for_receptions(&self, reception_ids: &[ReceptionId]) -> Result<Vec<Product>> {
        if reception_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = reception_ids
            .iter()
            .map(|id| id.as_str().to_string())
            .collect();
        let rows = sqlx::query(
            r#"
            SELECT id, date_time, type, reception_id
            FROM products
            WHERE reception_id = ANY($1)
            ORDER BY date_time ASC, id ASC
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_product).collect()
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn create_user(&self, user: &User) -> Result<()> {
        sqlx::query("INSERT INTO users (id, email, password_hash, role) VALUES ($1, $2, $3, $4)")
            .bind(user.id.as_str())
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row: Option<PgRow> =
            sqlx::query("SELECT id, email, password_hash, role FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Self::row_to_user).transpose()
    }
}
