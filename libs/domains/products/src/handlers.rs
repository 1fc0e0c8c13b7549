//! HTTP handlers for Products API

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use axum_helpers::errors::responses::InternalServerErrorResponse;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{BrandStat, CategoryStat, Product, ProductPage, ProductStats, RatedExpensiveItem};
use crate::query::{ListProductsQuery, ProductQuery};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(list_products, product_stats),
    components(
        schemas(Product, ProductPage, ProductStats, CategoryStat, RatedExpensiveItem, BrandStat),
        responses(InternalServerErrorResponse)
    ),
    tags(
        (name = "Products", description = "Product catalog listing and statistics")
    )
)]
pub struct ApiDoc;

/// Create the products router.
///
/// `/stats` is registered ahead of the listing route.
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/stats", get(product_stats))
        .route("/", get(list_products))
        .with_state(shared_service)
}

/// List products with filtering, sorting and pagination
///
/// Invalid or missing parameters fall back to their defaults; they never
/// cause an error response.
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ProductQuery),
    responses(
        (status = 200, description = "One page of products", body = ProductPage),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> ProductResult<Json<ProductPage>> {
    let raw = match query {
        Ok(Query(raw)) => raw,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable query string, using defaults");
            ProductQuery::default()
        }
    };

    let page = service.list_products(ListProductsQuery::parse(&raw)).await?;
    Ok(Json(page))
}

/// Catalog statistics by category and brand, plus the best rated expensive items
#[utoipa::path(
    get,
    path = "/stats",
    tag = "Products",
    responses(
        (status = 200, description = "Combined statistics", body = ProductStats),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn product_stats<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<Json<ProductStats>> {
    let stats = service.product_stats().await?;
    Ok(Json(stats))
}
