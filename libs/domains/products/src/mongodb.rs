//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::Document,
    options::{FindOptions, IndexOptions},
};
use tracing::instrument;

use crate::error::ProductResult;
use crate::models::Product;
use crate::pipeline::Pipeline;
use crate::query::{PageRequest, ProductFilter, SortSpec};
use crate::repository::ProductRepository;

/// Collection holding the catalog
pub const PRODUCTS_COLLECTION: &str = "products";

/// MongoDB implementation of the ProductRepository
#[derive(Clone)]
pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, PRODUCTS_COLLECTION)
    }

    /// Use a custom collection name (tests run against throwaway collections)
    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<Product>(collection_name);
        Self { collection }
    }

    /// Create the indexes backing the listing filters, sort keys and stats
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let indexes = [
            ("category", "idx_category"),
            ("brand", "idx_brand"),
            ("price", "idx_price"),
            ("rating", "idx_rating"),
        ]
        .into_iter()
        .map(|(field, name)| {
            let mut keys = Document::new();
            keys.insert(field, 1);
            IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().name(name.to_string()).build())
                .build()
        });

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }

    pub fn collection(&self) -> &Collection<Product> {
        &self.collection
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        filter: ProductFilter,
        sort: Option<SortSpec>,
        page: PageRequest,
    ) -> ProductResult<Vec<Product>> {
        let options = FindOptions::builder()
            .sort(sort.map(|s| s.to_document()))
            .skip(page.skip())
            .limit(page.limit() as i64)
            .build();

        let cursor = self
            .collection
            .find(filter.to_document())
            .with_options(options)
            .await?;
        let products: Vec<Product> = cursor.try_collect().await?;

        tracing::debug!(returned = products.len(), "Listed products");
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: ProductFilter) -> ProductResult<u64> {
        let count = self.collection.count_documents(filter.to_document()).await?;
        Ok(count)
    }

    #[instrument(skip(self, pipeline), fields(stages = ?pipeline.stage_names()))]
    async fn aggregate(&self, pipeline: Pipeline) -> ProductResult<Vec<Document>> {
        let cursor = self.collection.aggregate(pipeline.to_documents()).await?;
        let rows: Vec<Document> = cursor.try_collect().await?;
        Ok(rows)
    }
}
