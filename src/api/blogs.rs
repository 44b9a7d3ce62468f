//! Blog API endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::errors::{AppError, ErrorResponse};
use crate::models::{Blog, BlogDetail, BlogPatch, BlogSummary, NewBlog};
use crate::AppState;

/// Read all blogs
#[utoipa::path(
    get,
    path = "/",
    tag = "blogs",
    responses(
        (status = 200, description = "List of all blogs", body = [BlogSummary]),
    )
)]
pub async fn list_blogs(
    State(state): State<AppState>,
) -> Result<Json<Vec<BlogSummary>>, AppError> {
    let blogs = state.repo.list_blogs().await?;
    Ok(Json(blogs.into_iter().map(BlogSummary::from).collect()))
}

/// Read a blog by id
#[utoipa::path(
    get,
    path = "/blog/{blog_id}",
    tag = "blogs",
    params(("blog_id" = i64, Path, description = "Enter the blog id to read the blog")),
    responses(
        (status = 200, description = "The blog with the given id", body = BlogDetail),
        (status = 404, description = "Blog not found", body = ErrorResponse),
    )
)]
pub async fn get_blog(
    State(state): State<AppState>,
    Path(blog_id): Path<i64>,
) -> Result<Json<BlogDetail>, AppError> {
    let blog = state
        .repo
        .get_blog(blog_id)
        .await?
        .ok_or_else(|| AppError::blog_not_found(blog_id))?;

    Ok(Json(blog.into()))
}

/// Create a new blog entry
#[utoipa::path(
    post,
    path = "/create-blog",
    tag = "blogs",
    request_body = NewBlog,
    responses(
        (status = 201, description = "The created blog with its assigned id", body = Blog),
        (status = 422, description = "Invalid field value", body = ErrorResponse),
    )
)]
pub async fn create_blog(
    State(state): State<AppState>,
    Json(request): Json<NewBlog>,
) -> Result<(StatusCode, Json<Blog>), AppError> {
    request.validate()?;

    let blog = state.repo.create_blog(&request).await?;
    tracing::info!(blog_id = blog.id, "Blog created");

    Ok((StatusCode::CREATED, Json(blog)))
}

/// Update a blog by replacing all its fields
#[utoipa::path(
    put,
    path = "/update-blog/{blog_id}",
    tag = "blogs",
    params(("blog_id" = i64, Path, description = "The id of the blog to update")),
    request_body = NewBlog,
    responses(
        (status = 200, description = "The updated blog", body = Blog),
        (status = 404, description = "Blog not found", body = ErrorResponse),
        (status = 422, description = "Invalid field value", body = ErrorResponse),
    )
)]
pub async fn update_blog(
    State(state): State<AppState>,
    Path(blog_id): Path<i64>,
    Json(request): Json<NewBlog>,
) -> Result<Json<Blog>, AppError> {
    request.validate()?;

    let blog = state
        .repo
        .replace_blog(blog_id, &request)
        .await?
        .ok_or_else(|| AppError::blog_not_found(blog_id))?;
    tracing::info!(blog_id, "Blog replaced");

    Ok(Json(blog))
}

/// Partially update a blog - only updates the fields you provide
#[utoipa::path(
    patch,
    path = "/update-blog/{blog_id}",
    tag = "blogs",
    params(
        ("blog_id" = i64, Path, description = "The id of the blog to update"),
        BlogPatch,
    ),
    responses(
        (status = 200, description = "The updated blog", body = Blog),
        (status = 400, description = "No field provided", body = ErrorResponse),
        (status = 404, description = "Blog not found", body = ErrorResponse),
        (status = 422, description = "Invalid field value", body = ErrorResponse),
    )
)]
pub async fn partial_update_blog(
    State(state): State<AppState>,
    Path(blog_id): Path<i64>,
    Query(patch): Query<BlogPatch>,
) -> Result<Json<Blog>, AppError> {
    patch.validate()?;

    let blog = state
        .repo
        .patch_blog(blog_id, &patch)
        .await?
        .ok_or_else(|| AppError::blog_not_found(blog_id))?;
    tracing::info!(blog_id, "Blog patched");

    Ok(Json(blog))
}

/// Delete a blog by id
#[utoipa::path(
    delete,
    path = "/delete-blog/{blog_id}",
    tag = "blogs",
    params(("blog_id" = i64, Path, description = "The id of the blog to delete")),
    responses(
        (status = 204, description = "Blog deleted"),
        (status = 404, description = "Blog not found", body = ErrorResponse),
    )
)]
pub async fn delete_blog(
    State(state): State<AppState>,
    Path(blog_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !state.repo.delete_blog(blog_id).await? {
        return Err(AppError::blog_not_found(blog_id));
    }
    tracing::info!(blog_id, "Blog deleted");

    Ok(StatusCode::NO_CONTENT)
}
