//! Products Domain
//!
//! Read-only access to the product catalog stored in MongoDB: a paginated,
//! filterable listing and a set of aggregate statistics.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Query parsing, concurrent pipelines, row decoding
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Documents and response bodies
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{handlers, MongoProductRepository, ProductService};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017/shop").await?;
//! let db = client.database("shop");
//!
//! let repository = MongoProductRepository::new(&db);
//! let service = ProductService::new(repository);
//!
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod pipeline;
pub mod query;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{
    BrandStat, CategoryStat, Product, ProductPage, ProductStats, RatedExpensiveItem,
};
pub use crate::mongodb::{MongoProductRepository, PRODUCTS_COLLECTION};
pub use pipeline::{Pipeline, PipelineError};
pub use query::{ListProductsQuery, PageRequest, ProductFilter, ProductQuery, SortSpec};
pub use repository::ProductRepository;
pub use service::ProductService;
