//! # ldpolicy: JSON-LD to Policy Model Transformation
//!
//! ldpolicy converts expanded JSON-LD policy documents into a typed policy
//! model and back, through a registry of small conversion units keyed by
//! `(input type, output type)`.
//!
//! ## Features
//!
//! - **Pluggable registry**: one conversion unit per type pair, registered once at startup
//! - **Recursive dispatch**: units delegate nested attributes back through the transformer context
//! - **Problem reporting**: non-fatal issues are collected with their attribute path instead of aborting
//! - **Lenient documents**: a scalar and a one-element array are read the same way
//!
//! ## Example
//!
//! ```no_run
//! use ldpolicy::model::Policy;
//! use ldpolicy::TransformerRegistry;
//! use serde_json::json;
//!
//! let registry = TransformerRegistry::with_policy_transformers().unwrap();
//! let document = json!({
//!     "@type": "http://www.w3.org/ns/odrl/2/Set",
//!     "http://www.w3.org/ns/odrl/2/permission": {
//!         "http://www.w3.org/ns/odrl/2/action": "use"
//!     }
//! });
//!
//! let transformed = registry.transform::<Policy>(&document);
//! for problem in &transformed.problems {
//!     eprintln!("{}", problem);
//! }
//! ```

pub mod document;
pub mod model;
pub mod transform;
pub mod vocabulary;

// Service boundary
pub mod cli;
pub mod config;
pub mod health;
pub mod server;

pub use config::{ConfigError, ServiceConfig};
pub use health::{
    DefaultHealthCheckService, HealthCheckProvider, HealthCheckResult, HealthCheckService,
    HealthStatus, RegistryHealthCheck,
};
pub use transform::{
    FnTransformer, Problem, RegistryError, Transformable, Transformed, Transformer,
    TransformerContext, TransformerRegistry, TypeTag,
};
