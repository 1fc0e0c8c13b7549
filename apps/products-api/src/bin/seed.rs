//! Seed the `products` collection from a remote JSON catalog
//!
//! Environment variables:
//! - `MONGO_URI` or `MONGODB_URL` (required)
//! - `MONGODB_DATABASE` (optional, otherwise the database named in the URI)
//! - `SEED_SOURCE_URL` (default: `https://dummyjson.com/products?limit=100`)
//!
//! Existing documents are removed before the fetched ones are inserted.

use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv, env_or_default};
use database::mongodb::{MongoConfig, connect_from_config, resolve_database};
use domain_products::PRODUCTS_COLLECTION;
use mongodb::Database;
use mongodb::bson::{self, Document, doc};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{error, info};

const DEFAULT_SOURCE_URL: &str = "https://dummyjson.com/products?limit=100";

/// `{"products": [...]}`; other top-level fields are ignored
#[derive(Debug, Deserialize)]
struct CatalogPayload {
    #[serde(default)]
    products: Vec<Map<String, Value>>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();
    init_tracing(&Environment::from_env());

    let mongo = MongoConfig::from_env()?.with_app_name("seed-products");
    let source_url = env_or_default("SEED_SOURCE_URL", DEFAULT_SOURCE_URL);

    let client = connect_from_config(&mongo).await?;
    info!("Connected to MongoDB for seeding");

    let db = resolve_database(&client, &mongo);
    let result = seed(&db, &source_url).await;

    if let Err(ref e) = result {
        error!(error = %e, "Seeding failed");
    }

    client.shutdown().await;
    info!("Disconnected from MongoDB");

    result
}

async fn seed(db: &Database, source_url: &str) -> eyre::Result<()> {
    info!(url = %source_url, "Fetching products");
    let payload: CatalogPayload = reqwest::get(source_url)
        .await?
        .error_for_status()?
        .json()
        .await?;

    let documents = catalog_documents(payload)?;
    if documents.is_empty() {
        info!("No products found to seed");
        return Ok(());
    }

    let collection = db.collection::<Document>(PRODUCTS_COLLECTION);

    info!("Clearing existing products");
    let deleted = collection.delete_many(doc! {}).await?;
    info!(count = deleted.deleted_count, "Removed existing products");

    info!(count = documents.len(), "Inserting products");
    collection.insert_many(documents).await?;

    info!("Seeding completed successfully");
    Ok(())
}

fn catalog_documents(payload: CatalogPayload) -> eyre::Result<Vec<Document>> {
    payload
        .products
        .iter()
        .map(|product| bson::to_document(product).map_err(eyre::Report::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;
    use serde_json::json;

    fn payload(value: Value) -> CatalogPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_catalog_documents_converts_every_product() {
        let documents = catalog_documents(payload(json!({
            "products": [
                { "id": 1, "title": "Essence Mascara", "price": 9.99, "tags": ["beauty"] },
                { "id": 2, "title": "Eyeshadow Palette", "price": 19.99, "brand": "Glamour" },
            ],
            "total": 194,
            "skip": 0,
            "limit": 2,
        })))
        .unwrap();

        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].get_str("title").unwrap(), "Essence Mascara");
        assert!(matches!(
            documents[0].get("id"),
            Some(Bson::Int64(1)) | Some(Bson::Int32(1))
        ));
        assert_eq!(documents[1].get_str("brand").unwrap(), "Glamour");
        assert!(!documents[0].contains_key("_id"));
    }

    #[test]
    fn test_catalog_documents_missing_products_is_empty() {
        let documents = catalog_documents(payload(json!({ "message": "rate limited" }))).unwrap();
        assert!(documents.is_empty());
    }

    #[test]
    fn test_catalog_documents_empty_list() {
        let documents = catalog_documents(payload(json!({ "products": [] }))).unwrap();
        assert!(documents.is_empty());
    }
}
