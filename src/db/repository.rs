//! Database repository for blog CRUD operations.
//!
//! Every operation is a single statement; `RETURNING` hands back the stored row
//! so callers never need a second round trip.

use sqlx::AnyPool;

use crate::errors::AppError;
use crate::models::{Blog, BlogPatch, NewBlog};

const BLOG_COLUMNS: &str = "id, title, description, content";

/// Database repository for all blog operations.
#[derive(Clone)]
pub struct Repository {
    pool: AnyPool,
}

impl Repository {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// List all blogs ordered by id.
    pub async fn list_blogs(&self) -> Result<Vec<Blog>, AppError> {
        let blogs = sqlx::query_as::<_, Blog>(&format!(
            "SELECT {} FROM blogs ORDER BY id",
            BLOG_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(blogs)
    }

    /// Get a blog by ID.
    pub async fn get_blog(&self, id: i64) -> Result<Option<Blog>, AppError> {
        let blog = sqlx::query_as::<_, Blog>(&format!(
            "SELECT {} FROM blogs WHERE id = $1",
            BLOG_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(blog)
    }

    /// Insert a new blog and return it with its assigned ID.
    pub async fn create_blog(&self, new: &NewBlog) -> Result<Blog, AppError> {
        let blog = sqlx::query_as::<_, Blog>(&format!(
            "INSERT INTO blogs (title, description, content) VALUES ($1, $2, $3) RETURNING {}",
            BLOG_COLUMNS
        ))
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.content)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(?blog, "Created blog");
        Ok(blog)
    }

    /// Replace every field of a blog. `None` if the blog does not exist.
    pub async fn replace_blog(&self, id: i64, new: &NewBlog) -> Result<Option<Blog>, AppError> {
        let blog = sqlx::query_as::<_, Blog>(&format!(
            "UPDATE blogs SET title = $1, description = $2, content = $3 WHERE id = $4 RETURNING {}",
            BLOG_COLUMNS
        ))
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.content)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(blog)
    }

    /// Update only the fields present in `patch`. `None` if the blog does not exist.
    pub async fn patch_blog(&self, id: i64, patch: &BlogPatch) -> Result<Option<Blog>, AppError> {
        let blog = sqlx::query_as::<_, Blog>(&format!(
            "UPDATE blogs SET title = COALESCE($1, title), description = COALESCE($2, description), content = COALESCE($3, content) WHERE id = $4 RETURNING {}",
            BLOG_COLUMNS
        ))
        .bind(patch.title.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.content.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(blog)
    }

    /// Delete a blog. Returns whether a row was removed.
    pub async fn delete_blog(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
