use mongodb::bson::Bson;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use utoipa::ToSchema;

/// A stored catalog item.
///
/// Stored documents have no enforced shape. The fields the listing filters,
/// sorts and aggregates on are typed but optional, numbers keep whatever
/// integer or floating point type they were stored with, and every other
/// attribute (images, tags, dimensions, ...) is carried through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// ObjectIds render as hex strings, any other id as stored
    #[serde(rename = "_id", serialize_with = "serialize_document_id")]
    #[schema(value_type = String, example = "665f1c2ab8e4a1d2c3f4a5b6")]
    pub id: Bson,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub price: Option<Number>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub rating: Option<Number>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub stock: Option<Number>,

    #[serde(flatten)]
    #[schema(ignore)]
    pub attributes: Map<String, Value>,
}

fn serialize_document_id<S: Serializer>(id: &Bson, serializer: S) -> Result<S::Ok, S::Error> {
    match id {
        Bson::ObjectId(oid) => serializer.serialize_str(&oid.to_hex()),
        other => other.clone().into_relaxed_extjson().serialize(serializer),
    }
}

/// Body of `GET /api/products`
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductPage {
    pub page: u64,
    pub limit: u64,
    /// Number of documents matching the filter, ignoring pagination
    pub total: u64,
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStat {
    /// `null` groups products without a category
    pub category_name: Option<String>,
    pub total_products: i64,
    /// Rounded to 2 decimal places
    pub average_price: f64,
    pub max_price: f64,
    pub min_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RatedExpensiveItem {
    pub title: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrandStat {
    /// `null` groups products without a brand
    pub brand: Option<String>,
    /// Integer or floating point, following the stored `stock` values
    #[schema(value_type = f64)]
    pub total_stock: Number,
    pub total_value: f64,
}

/// Body of `GET /api/products/stats`
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    pub stats_by_category: Vec<CategoryStat>,
    pub best_rated_expensive: Vec<RatedExpensiveItem>,
    pub stats_by_brand: Vec<BrandStat>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, doc, oid::ObjectId};
    use serde_json::json;

    #[test]
    fn test_product_from_document_keeps_extra_attributes() {
        let id = ObjectId::new();
        let document = doc! {
            "_id": id,
            "title": "iPhone 9",
            "description": "An apple mobile",
            "category": "smartphones",
            "brand": "Apple",
            "price": 549,
            "rating": 4.69,
            "stock": 94,
            "tags": ["phone", "apple"],
        };

        let product: Product = bson::from_document(document).unwrap();

        assert_eq!(product.id, Bson::ObjectId(id));
        assert_eq!(product.price, Some(Number::from(549)));
        assert_eq!(product.stock, Some(Number::from(94)));
        assert_eq!(product.brand.as_deref(), Some("Apple"));
        assert_eq!(product.attributes["tags"], json!(["phone", "apple"]));
    }

    #[test]
    fn test_product_optional_fields_default() {
        let document = doc! {
            "_id": ObjectId::new(),
            "title": "Plain mug",
            "category": "kitchen",
            "price": 4.5,
        };

        let product: Product = bson::from_document(document).unwrap();

        assert_eq!(product.description, None);
        assert_eq!(product.brand, None);
        assert_eq!(product.rating, None);
        assert_eq!(product.stock, None);
        assert!(product.attributes.is_empty());
    }

    #[test]
    fn test_product_serializes_id_as_hex() {
        let id = ObjectId::parse_str("665f1c2ab8e4a1d2c3f4a5b6").unwrap();
        let product: Product = bson::from_document(doc! {
            "_id": id,
            "title": "Lamp",
            "category": "lighting",
            "price": 30.0,
            "thumbnail": "https://example.com/lamp.png",
        })
        .unwrap();

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["_id"], "665f1c2ab8e4a1d2c3f4a5b6");
        assert_eq!(json["thumbnail"], "https://example.com/lamp.png");
        assert!(json.get("brand").is_none());
    }

    #[test]
    fn test_sparse_product_passes_through_unchanged() {
        let product: Product = bson::from_document(doc! {
            "_id": "sku-1",
            "category": "a",
            "price": 10,
        })
        .unwrap();

        assert_eq!(product.title, None);
        assert_eq!(
            serde_json::to_value(&product).unwrap(),
            json!({ "_id": "sku-1", "category": "a", "price": 10 })
        );
    }

    #[test]
    fn test_floating_point_stock_decodes() {
        let product: Product = bson::from_document(doc! {
            "_id": ObjectId::new(),
            "title": "Flour",
            "category": "groceries",
            "price": 2.5,
            "stock": 5.0,
        })
        .unwrap();
        assert_eq!(product.stock.as_ref().and_then(Number::as_f64), Some(5.0));

        let brand: BrandStat = bson::from_document(doc! {
            "brand": "x",
            "totalStock": 7.5,
            "totalValue": 1.0,
        })
        .unwrap();
        assert_eq!(brand.total_stock.as_f64(), Some(7.5));
    }

    #[test]
    fn test_stats_rows_decode_from_aggregation_output() {
        let category: CategoryStat = bson::from_document(doc! {
            "categoryName": "laptops",
            "totalProducts": 5,
            "averagePrice": 1499.99,
            "maxPrice": 1999.99,
            "minPrice": 999,
        })
        .unwrap();
        assert_eq!(category.total_products, 5);
        assert_eq!(category.min_price, 999.0);

        let brand: BrandStat = bson::from_document(doc! {
            "brand": null,
            "totalStock": 12_i64,
            "totalValue": 120.5,
        })
        .unwrap();
        assert_eq!(brand.brand, None);

        let item: RatedExpensiveItem = bson::from_document(doc! {
            "title": "MacBook Pro",
            "price": 1749.49,
        })
        .unwrap();
        assert_eq!(item.rating, None);
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let stats = ProductStats {
            stats_by_category: vec![],
            best_rated_expensive: vec![RatedExpensiveItem {
                title: "TV".to_string(),
                price: 899.0,
                rating: Some(4.5),
            }],
            stats_by_brand: vec![BrandStat {
                brand: Some("Acme".to_string()),
                total_stock: Number::from(3),
                total_value: 30.0,
            }],
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(
            json,
            json!({
                "statsByCategory": [],
                "bestRatedExpensive": [{ "title": "TV", "price": 899.0, "rating": 4.5 }],
                "statsByBrand": [{ "brand": "Acme", "totalStock": 3, "totalValue": 30.0 }],
            })
        );
    }
}
