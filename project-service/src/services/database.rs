//! Database service for project-service.

use crate::models::{CreateProject, ListProjectsFilter, Project, ReplaceLineItems, UpdateProject};
use crate::services::dashboard::matches_query;
use crate::services::metrics::DB_QUERY_DURATION;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "project-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Create a pool that connects on first use.
    pub fn connect_lazy(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect_lazy(database_url)
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Invalid database URL: {}", e)))?;

        Ok(Self { pool })
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Project Operations
    // -------------------------------------------------------------------------

    /// Create a new project.
    #[instrument(skip(self, input), fields(project_name = %input.project_name))]
    pub async fn create_project(&self, input: &CreateProject) -> Result<Project, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_project"])
            .start_timer();

        let project_id = Uuid::new_v4();
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (
                project_id, project_name, client, phone, description, status,
                lat, lng, address, materials, services, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING project_id, project_name, client, phone, description, status,
                lat, lng, address, materials, services, ac_units, photos, documents,
                created_by, created_utc, updated_utc
            "#,
        )
        .bind(project_id)
        .bind(&input.project_name)
        .bind(&input.client)
        .bind(&input.phone)
        .bind(&input.description)
        .bind(input.status.as_str())
        .bind(input.location.lat)
        .bind(input.location.lng)
        .bind(&input.location.address)
        .bind(Json(&input.materials))
        .bind(Json(&input.services))
        .bind(&input.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create project: {}", e)))?;

        timer.observe_duration();

        info!(project_id = %project.project_id, status = %project.status, "Project created");

        Ok(project)
    }

    /// Get a project by ID.
    #[instrument(skip(self), fields(project_id = %project_id))]
    pub async fn get_project(&self, project_id: Uuid) -> Result<Option<Project>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_project"])
            .start_timer();

        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT project_id, project_name, client, phone, description, status,
                lat, lng, address, materials, services, ac_units, photos, documents,
                created_by, created_utc, updated_utc
            FROM projects
            WHERE project_id = $1
            "#,
        )
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get project: {}", e)))?;

        timer.observe_duration();

        Ok(project)
    }

    /// List projects, newest first.
    ///
    /// The status filter runs in SQL; the free-text query is applied to the
    /// loaded rows with the same matching rules as the dashboard.
    #[instrument(skip(self))]
    pub async fn list_projects(&self, filter: &ListProjectsFilter) -> Result<Vec<Project>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_projects"])
            .start_timer();

        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT project_id, project_name, client, phone, description, status,
                lat, lng, address, materials, services, ac_units, photos, documents,
                created_by, created_utc, updated_utc
            FROM projects
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY created_utc DESC, project_id
            "#,
        )
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list projects: {}", e)))?;

        timer.observe_duration();

        let projects = match filter.query.as_deref() {
            Some(query) => projects
                .into_iter()
                .filter(|p| matches_query(p, query))
                .collect(),
            None => projects,
        };

        Ok(projects)
    }

    /// Update project details.
    ///
    /// An empty `phone` or `description` clears the stored value.
    #[instrument(skip(self, input), fields(project_id = %project_id))]
    pub async fn update_project(
        &self,
        project_id: Uuid,
        input: &UpdateProject,
    ) -> Result<Option<Project>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_project"])
            .start_timer();

        // A new map location carries its own address; otherwise only the
        // address text may change.
        let address = input
            .location
            .as_ref()
            .map(|l| l.address.clone())
            .or_else(|| input.address.clone());

        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET project_name = COALESCE($2, project_name),
                client = COALESCE($3, client),
                phone = CASE WHEN $4::text IS NULL THEN phone ELSE NULLIF(BTRIM($4), '') END,
                description = CASE WHEN $5::text IS NULL THEN description ELSE NULLIF(BTRIM($5), '') END,
                status = COALESCE($6, status),
                lat = COALESCE($7, lat),
                lng = COALESCE($8, lng),
                address = COALESCE($9, address),
                updated_utc = NOW()
            WHERE project_id = $1
            RETURNING project_id, project_name, client, phone, description, status,
                lat, lng, address, materials, services, ac_units, photos, documents,
                created_by, created_utc, updated_utc
            "#,
        )
        .bind(project_id)
        .bind(&input.project_name)
        .bind(&input.client)
        .bind(&input.phone)
        .bind(&input.description)
        .bind(input.status.map(|s| s.as_str()))
        .bind(input.location.as_ref().map(|l| l.lat))
        .bind(input.location.as_ref().map(|l| l.lng))
        .bind(address)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update project: {}", e)))?;

        timer.observe_duration();

        if let Some(ref p) = project {
            info!(project_id = %p.project_id, status = %p.status, "Project updated");
        }

        Ok(project)
    }

    /// Delete a project. Returns false when it did not exist.
    #[instrument(skip(self), fields(project_id = %project_id))]
    pub async fn delete_project(&self, project_id: Uuid) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_project"])
            .start_timer();

        let result = sqlx::query("DELETE FROM projects WHERE project_id = $1")
            .bind(project_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to delete project: {}", e)))?;

        timer.observe_duration();

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(project_id = %project_id, "Project deleted");
        }

        Ok(deleted)
    }

    // -------------------------------------------------------------------------
    // Line Item Operations
    // -------------------------------------------------------------------------

    /// Replace line-item collections wholesale. Absent collections are kept.
    #[instrument(skip(self, input), fields(project_id = %project_id))]
    pub async fn replace_line_items(
        &self,
        project_id: Uuid,
        input: &ReplaceLineItems,
    ) -> Result<Option<Project>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["replace_line_items"])
            .start_timer();

        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET materials = COALESCE($2, materials),
                services = COALESCE($3, services),
                ac_units = COALESCE($4, ac_units),
                updated_utc = NOW()
            WHERE project_id = $1
            RETURNING project_id, project_name, client, phone, description, status,
                lat, lng, address, materials, services, ac_units, photos, documents,
                created_by, created_utc, updated_utc
            "#,
        )
        .bind(project_id)
        .bind(input.materials.as_ref().map(Json))
        .bind(input.services.as_ref().map(Json))
        .bind(input.ac_units.as_ref().map(Json))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to save line items: {}", e))
        })?;

        timer.observe_duration();

        Ok(project)
    }

    /// Read-modify-write of a project's collections under a row lock.
    ///
    /// `modify` edits the loaded project in memory; the line items, photos and
    /// documents it leaves behind are written back in the same transaction.
    /// An error from `modify` rolls the transaction back.
    #[instrument(skip(self, modify), fields(project_id = %project_id))]
    pub async fn modify_collections<F>(
        &self,
        project_id: Uuid,
        operation: &str,
        modify: F,
    ) -> Result<Project, AppError>
    where
        F: FnOnce(&mut Project) -> Result<(), AppError>,
    {
        let timer = DB_QUERY_DURATION
            .with_label_values(&[operation])
            .start_timer();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let mut project = sqlx::query_as::<_, Project>(
            r#"
            SELECT project_id, project_name, client, phone, description, status,
                lat, lng, address, materials, services, ac_units, photos, documents,
                created_by, created_utc, updated_utc
            FROM projects
            WHERE project_id = $1
            FOR UPDATE
            "#,
        )
        .bind(project_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to lock project: {}", e)))?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Project not found")))?;

        modify(&mut project)?;

        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET materials = $2,
                services = $3,
                ac_units = $4,
                photos = $5,
                documents = $6,
                updated_utc = NOW()
            WHERE project_id = $1
            RETURNING project_id, project_name, client, phone, description, status,
                lat, lng, address, materials, services, ac_units, photos, documents,
                created_by, created_utc, updated_utc
            "#,
        )
        .bind(project_id)
        .bind(&project.materials)
        .bind(&project.services)
        .bind(&project.ac_units)
        .bind(&project.photos)
        .bind(&project.documents)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update project: {}", e)))?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();

        info!(project_id = %project_id, operation = operation, "Project collections updated");

        Ok(project)
    }
}
