//! Database bootstrap helpers
//!
//! Connection management for the services in this workspace. Only MongoDB is
//! supported; the connector verifies the deployment is reachable before
//! handing back a client and can retry with exponential backoff while the
//! database is still starting.
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB support
//! - `config` - `core_config::FromEnv` support for `MongoConfig`
//!
//! # Example
//!
//! ```ignore
//! use database::mongodb::{self, MongoConfig};
//!
//! let config = MongoConfig::new("mongodb://localhost:27017/shop");
//! let client = mongodb::connect_from_config_with_retry(&config, None).await?;
//! let db = mongodb::resolve_database(&client, &config);
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult};
