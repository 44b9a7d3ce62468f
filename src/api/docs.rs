//! OpenAPI document for the blogs API.

use axum::Json;
use utoipa::OpenApi;

use crate::errors::ErrorResponse;
use crate::models::{Blog, BlogDetail, BlogSummary, NewBlog};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Qatoto Blogs",
        version = "0.0.1",
        description = "Qatoto Blogs is a simple API for managing blogs."
    ),
    paths(
        super::blogs::list_blogs,
        super::blogs::get_blog,
        super::blogs::create_blog,
        super::blogs::update_blog,
        super::blogs::partial_update_blog,
        super::blogs::delete_blog,
    ),
    components(schemas(Blog, BlogSummary, BlogDetail, NewBlog, ErrorResponse)),
    tags(
        (name = "blogs", description = "Blog management"),
        (name = "auth", description = "Authentication"),
    )
)]
pub struct ApiDoc;

/// GET /openapi.json - Serve the OpenAPI document.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
