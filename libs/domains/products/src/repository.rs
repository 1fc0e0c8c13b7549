use async_trait::async_trait;
use mongodb::bson::Document;

use crate::error::ProductResult;
use crate::models::Product;
use crate::pipeline::Pipeline;
use crate::query::{PageRequest, ProductFilter, SortSpec};

/// Read access to the product catalog
///
/// Implementations only run what they are given: filters, sort keys and
/// pipelines arrive already parsed and validated.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// One page of products matching `filter`, in `sort` order or natural order
    async fn find(
        &self,
        filter: ProductFilter,
        sort: Option<SortSpec>,
        page: PageRequest,
    ) -> ProductResult<Vec<Product>>;

    /// Total number of products matching `filter`
    async fn count(&self, filter: ProductFilter) -> ProductResult<u64>;

    /// Run an aggregation pipeline and return the raw result rows
    async fn aggregate(&self, pipeline: Pipeline) -> ProductResult<Vec<Document>>;
}
