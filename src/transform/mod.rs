//! Pluggable transformation engine.
//!
//! * [`TransformerRegistry`] - table of conversion units keyed by
//!   `(input type, output type)`, built once and shared read-only
//! * [`TransformerContext`] - per-call dispatcher collecting [`Problem`]s
//! * [`Transformer`] - the contract every conversion unit implements
//! * [`units`] - the policy conversion units, in both directions

pub mod context;
pub mod registry;
pub mod tag;
pub mod transformer;
pub mod units;

pub use context::{Problem, TransformerContext};
pub use registry::{RegistryError, Transformed, TransformerInfo, TransformerRegistry};
pub use tag::{Payload, Subject, Transformable, TypeTag};
pub use transformer::{FnTransformer, Transformer};
