//! Shared test utilities for domain testing
//!
//! - `TestMongo`: MongoDB container with automatic cleanup (feature: "mongo")
//! - `ProductFixture`: catalog documents for seeding test collections (feature: "mongo")
//! - `TestDataBuilder`: Deterministic names so parallel tests never collide
//! - `assertions`: Custom assertion helpers
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{ProductFixture, TestDataBuilder, TestMongo};
//! use mongodb::bson::Document;
//!
//! # async fn example() {
//! let mongo = TestMongo::new().await;
//! let builder = TestDataBuilder::from_test_name("my_test");
//! let collection = mongo
//!     .database("catalog")
//!     .collection::<Document>(&builder.collection_name());
//!
//! collection
//!     .insert_many([ProductFixture::new("Phone").price(699.0).into_document()])
//!     .await
//!     .unwrap();
//! # }
//! ```

#[cfg(feature = "mongo")]
mod mongo;

#[cfg(feature = "mongo")]
pub use mongo::TestMongo;

#[cfg(feature = "mongo")]
pub use fixtures::ProductFixture;

/// Builder for test data with deterministic naming
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (seed is a hash of the name)
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_list_products");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a unique name for testing
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.name("brand", "main"), "test-brand-7-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Collection name private to this test
    pub fn collection_name(&self) -> String {
        format!("products_{}", self.seed)
    }
}

#[cfg(feature = "mongo")]
mod fixtures {
    use mongodb::bson::{Bson, Document, doc, oid::ObjectId};

    /// A catalog document with sensible defaults
    ///
    /// ```
    /// use test_utils::ProductFixture;
    ///
    /// let doc = ProductFixture::new("Laptop")
    ///     .category("laptops")
    ///     .brand("Acme")
    ///     .price(1299.0)
    ///     .rating(4.5)
    ///     .stock(3)
    ///     .into_document();
    ///
    /// assert_eq!(doc.get_str("brand").unwrap(), "Acme");
    /// ```
    #[derive(Debug, Clone)]
    pub struct ProductFixture {
        title: String,
        description: String,
        category: String,
        brand: Option<String>,
        price: f64,
        rating: f64,
        stock: i64,
    }

    impl ProductFixture {
        pub fn new(title: &str) -> Self {
            Self {
                title: title.to_string(),
                description: format!("{title} for testing"),
                category: "general".to_string(),
                brand: None,
                price: 10.0,
                rating: 3.0,
                stock: 1,
            }
        }

        pub fn description(mut self, description: &str) -> Self {
            self.description = description.to_string();
            self
        }

        pub fn category(mut self, category: &str) -> Self {
            self.category = category.to_string();
            self
        }

        pub fn brand(mut self, brand: &str) -> Self {
            self.brand = Some(brand.to_string());
            self
        }

        pub fn price(mut self, price: f64) -> Self {
            self.price = price;
            self
        }

        pub fn rating(mut self, rating: f64) -> Self {
            self.rating = rating;
            self
        }

        pub fn stock(mut self, stock: i64) -> Self {
            self.stock = stock;
            self
        }

        pub fn into_document(self) -> Document {
            let mut document = doc! {
                "_id": ObjectId::new(),
                "title": self.title,
                "description": self.description,
                "category": self.category,
                "price": self.price,
                "rating": self.rating,
                "stock": self.stock,
            };
            // Products without a brand omit the field entirely
            if let Some(brand) = self.brand {
                document.insert("brand", Bson::String(brand));
            }
            document
        }
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert two floats are equal within `1e-6`
    pub fn assert_close(actual: f64, expected: f64, context: &str) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "{}: expected {}, got {}",
            context,
            expected,
            actual
        );
    }

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}
