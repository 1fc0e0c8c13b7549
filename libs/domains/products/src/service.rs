//! Product Service - listing and statistics over the catalog

use mongodb::bson::{self, Document};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::{BrandStat, CategoryStat, ProductPage, ProductStats, RatedExpensiveItem};
use crate::pipeline::{self, Pipeline};
use crate::query::ListProductsQuery;
use crate::repository::ProductRepository;

pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// One page of products plus the total matching the same filter
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: ListProductsQuery) -> ProductResult<ProductPage> {
        let ListProductsQuery { page, filter, sort } = query;

        let (products, total) = tokio::try_join!(
            self.repository.find(filter.clone(), sort, page),
            self.repository.count(filter),
        )?;

        Ok(ProductPage {
            page: page.page(),
            limit: page.limit(),
            total,
            products,
        })
    }

    /// Run the three statistics pipelines concurrently.
    ///
    /// All three must succeed; the first failure is returned and the other
    /// results are dropped.
    #[instrument(skip(self))]
    pub async fn product_stats(&self) -> ProductResult<ProductStats> {
        let (stats_by_category, best_rated_expensive, stats_by_brand) = tokio::try_join!(
            self.run_pipeline::<CategoryStat>(pipeline::category_stats(), "CategoryStat"),
            self.run_pipeline::<RatedExpensiveItem>(
                pipeline::best_rated_expensive(),
                "RatedExpensiveItem"
            ),
            self.run_pipeline::<BrandStat>(pipeline::brand_stats(), "BrandStat"),
        )?;

        Ok(ProductStats {
            stats_by_category,
            best_rated_expensive,
            stats_by_brand,
        })
    }

    async fn run_pipeline<T: DeserializeOwned>(
        &self,
        pipeline: Pipeline,
        entity: &'static str,
    ) -> ProductResult<Vec<T>> {
        pipeline.validate()?;
        let rows = self.repository.aggregate(pipeline).await?;
        decode_rows(rows, entity)
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

fn decode_rows<T: DeserializeOwned>(
    rows: Vec<Document>,
    entity: &'static str,
) -> ProductResult<Vec<T>> {
    rows.into_iter()
        .map(|row| {
            bson::from_document(row).map_err(|e| ProductError::Decode {
                entity,
                message: e.to_string(),
            })
        })
        .collect()
}
