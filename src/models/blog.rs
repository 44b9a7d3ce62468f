//! Blog post model and its request/response shapes.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::errors::AppError;

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// A stored blog post, one row of the `blogs` table.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Blog {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub content: String,
}

// Only id and title: content can be arbitrarily long and would flood the logs.
impl fmt::Debug for Blog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Blog(id={}, title={:?})", self.id, self.title)
    }
}

/// List item, without the full content.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BlogSummary {
    pub id: i64,
    pub title: String,
    pub description: String,
}

impl From<Blog> for BlogSummary {
    fn from(blog: Blog) -> Self {
        Self {
            id: blog.id,
            title: blog.title,
            description: blog.description,
        }
    }
}

/// Single blog read, with the full content.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BlogDetail {
    pub id: i64,
    pub title: String,
    pub content: String,
}

impl From<Blog> for BlogDetail {
    fn from(blog: Blog) -> Self {
        Self {
            id: blog.id,
            title: blog.title,
            content: blog.content,
        }
    }
}

/// Request body for creating a blog or replacing all of its fields.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewBlog {
    #[schema(example = "Getting Started with Axum", max_length = 100)]
    pub title: String,
    #[schema(max_length = 500)]
    pub description: String,
    pub content: String,
}

impl NewBlog {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_title(&self.title)?;
        validate_description(&self.description)
    }
}

/// Query parameters for a partial update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BlogPatch {
    /// New title (optional)
    pub title: Option<String>,
    /// New description (optional)
    pub description: Option<String>,
    /// New content (optional)
    pub content: Option<String>,
}

impl BlogPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.content.is_none()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.is_empty() {
            return Err(AppError::BadRequest(
                "At least one field (title, description, or content) must be provided"
                    .to_string(),
            ));
        }
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(AppError::Validation(format!(
            "Title must be at most {} characters",
            TITLE_MAX_CHARS
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), AppError> {
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(AppError::Validation(format!(
            "Description must be at most {} characters",
            DESCRIPTION_MAX_CHARS
        )));
    }
    Ok(())
}
