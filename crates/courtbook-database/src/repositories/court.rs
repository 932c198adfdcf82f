//! Court repository implementation.

use sqlx::{PgPool, Postgres, QueryBuilder};

use courtbook_core::error::{AppError, ErrorKind};
use courtbook_core::result::AppResult;
use courtbook_core::types::{CourtId, PageRequest, PageResponse};
use courtbook_entity::court::{Court, CourtFilter, CreateCourt, UpdateCourt};

/// Repository for court CRUD and catalogue queries.
#[derive(Debug, Clone)]
pub struct CourtRepository {
    pool: PgPool,
}

impl CourtRepository {
    /// Create a new court repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a court by primary key.
    pub async fn find_by_id(&self, id: CourtId) -> AppResult<Option<Court>> {
        sqlx::query_as::<_, Court>("SELECT * FROM courts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find court", e))
    }

    /// List courts matching a filter, by name.
    pub async fn find_filtered(
        &self,
        filter: &CourtFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Court>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM courts WHERE 1=1");
        push_filter(&mut count, filter);
        let total: i64 = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count courts", e))?;

        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM courts WHERE 1=1");
        push_filter(&mut query, filter);
        query.push(" ORDER BY name, id LIMIT ");
        query.push_bind(page.limit() as i64);
        query.push(" OFFSET ");
        query.push_bind(page.offset() as i64);

        let courts = query
            .build_query_as::<Court>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list courts", e))?;

        Ok(PageResponse::new(
            courts,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Insert a new court.
    pub async fn create(&self, data: &CreateCourt) -> AppResult<Court> {
        sqlx::query_as::<_, Court>(
            r#"INSERT INTO courts
               (id, name, address, court_type, description, hourly_price, owner_id, availability_policy)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING *"#,
        )
        .bind(CourtId::new())
        .bind(&data.name)
        .bind(&data.address)
        .bind(&data.court_type)
        .bind(&data.description)
        .bind(data.hourly_price)
        .bind(data.owner_id)
        .bind(data.availability_policy)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::validation(format!("Owner {} does not exist", data.owner_id))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create court", e),
        })
    }

    /// Apply a partial update. Returns `None` when the court does not exist.
    pub async fn update(&self, id: CourtId, data: &UpdateCourt) -> AppResult<Option<Court>> {
        sqlx::query_as::<_, Court>(
            r#"UPDATE courts SET
                   name = COALESCE($2, name),
                   address = COALESCE($3, address),
                   court_type = COALESCE($4, court_type),
                   description = COALESCE($5, description),
                   hourly_price = COALESCE($6, hourly_price),
                   owner_id = COALESCE($7, owner_id),
                   availability_policy = COALESCE($8, availability_policy),
                   is_active = COALESCE($9, is_active),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.address)
        .bind(&data.court_type)
        .bind(&data.description)
        .bind(data.hourly_price)
        .bind(data.owner_id)
        .bind(data.availability_policy)
        .bind(data.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::validation("New owner does not exist")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to update court", e),
        })
    }

    /// Delete a court; schedules and reservations cascade.
    pub async fn delete(&self, id: CourtId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM courts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete court", e))?;
        Ok(result.rows_affected() > 0)
    }
}

fn push_filter<'a>(query: &mut QueryBuilder<'a, Postgres>, filter: &'a CourtFilter) {
    if let Some(court_type) = &filter.court_type {
        query.push(" AND court_type = ");
        query.push_bind(court_type);
    }
    if let Some(active) = filter.is_active {
        query.push(" AND is_active = ");
        query.push_bind(active);
    }
    if let Some(owner_id) = filter.owner_id {
        query.push(" AND owner_id = ");
        query.push_bind(owner_id);
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search.to_lowercase());
        query.push(" AND (LOWER(name) LIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR LOWER(address) LIKE ");
        query.push_bind(pattern);
        query.push(")");
    }
}
