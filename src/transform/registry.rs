//! Transformer registry: the table resolving conversion units.
//!
//! The registry is filled once at startup and only read afterwards. Share it
//! behind an `Arc` with every boundary that needs transformation; lookups are
//! lock-free and each top-level call gets its own [`TransformerContext`].

use std::fmt;

use indexmap::IndexMap;

use super::context::{Problem, TransformerContext};
use super::tag::{Transformable, TypeTag};
use super::transformer::{ErasedTransformer, Transformer};

/// Configuration faults raised while building the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A unit is already registered for the same type pair.
    DuplicateTransformer {
        input: TypeTag,
        output: TypeTag,
        existing: &'static str,
    },
    /// The unit declares an input tag its input type cannot carry.
    InputTypeMismatch {
        input: TypeTag,
        transformer: &'static str,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateTransformer { input, output, existing } => write!(
                f,
                "Transformer for ({}, {}) already registered: {}",
                input, output, existing
            ),
            RegistryError::InputTypeMismatch { input, transformer } => write!(
                f,
                "Transformer {} declares input {} it cannot read",
                transformer, input
            ),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Result of a top-level transform call.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed<T> {
    /// `None` when dispatch or a required attribute failed.
    pub result: Option<T>,
    /// Every problem reported during the call, in order.
    pub problems: Vec<Problem>,
}

impl<T> Transformed<T> {
    pub fn has_problems(&self) -> bool {
        !self.problems.is_empty()
    }

    /// A result was produced and nothing was reported.
    pub fn is_complete(&self) -> bool {
        self.result.is_some() && self.problems.is_empty()
    }

    pub fn into_parts(self) -> (Option<T>, Vec<Problem>) {
        (self.result, self.problems)
    }
}

/// Description of a registered unit, for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformerInfo {
    pub input: TypeTag,
    pub output: TypeTag,
    pub name: &'static str,
}

impl fmt::Display for TransformerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.input, self.output, self.name)
    }
}

/// Table mapping `(input type, output type)` to exactly one conversion unit.
#[derive(Default)]
pub struct TransformerRegistry {
    transformers: IndexMap<(TypeTag, TypeTag), Box<dyn ErasedTransformer>>,
}

impl TransformerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every policy conversion unit, in both directions.
    pub fn with_policy_transformers() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        super::units::register_policy_transformers(&mut registry)?;
        Ok(registry)
    }

    /// Register a conversion unit.
    ///
    /// Duplicate pairs are rejected and leave the table unchanged, so the
    /// first registration keeps resolving.
    ///
    /// # Errors
    /// * `DuplicateTransformer` - the `(input, output)` pair is taken
    /// * `InputTypeMismatch` - the declared input tag does not fit the unit's
    ///   input type
    pub fn register<T: Transformer + 'static>(&mut self, transformer: T) -> Result<(), RegistryError> {
        let name = ErasedTransformer::name(&transformer);
        let input = Transformer::input_type(&transformer);
        let output = Transformer::output_type(&transformer);

        if !transformer.accepts_declared_input() {
            return Err(RegistryError::InputTypeMismatch {
                input,
                transformer: name,
            });
        }

        if let Some(existing) = self.transformers.get(&(input, output)) {
            return Err(RegistryError::DuplicateTransformer {
                input,
                output,
                existing: existing.name(),
            });
        }

        tracing::debug!("registered transformer {} for ({}, {})", name, input, output);
        self.transformers.insert((input, output), Box::new(transformer));
        Ok(())
    }

    pub(crate) fn resolve(&self, input: TypeTag, output: TypeTag) -> Option<&dyn ErasedTransformer> {
        self.transformers.get(&(input, output)).map(|t| t.as_ref())
    }

    /// Transform `input` into `T` with a fresh context.
    ///
    /// This is the entry point for callers outside the engine; conversion
    /// units recurse through their context instead.
    ///
    /// # Example
    /// ```
    /// use ldpolicy::model::Action;
    /// use ldpolicy::transform::TransformerRegistry;
    /// use serde_json::json;
    ///
    /// let registry = TransformerRegistry::with_policy_transformers().unwrap();
    /// let transformed = registry.transform::<Action>(&json!("use"));
    ///
    /// assert_eq!(transformed.result, Some(Action::new("use")));
    /// assert!(transformed.problems.is_empty());
    /// ```
    pub fn transform<T: Transformable>(&self, input: &impl Transformable) -> Transformed<T> {
        let mut context = TransformerContext::new(self);
        let result = context.transform::<T>(input);

        Transformed {
            result,
            problems: context.into_problems(),
        }
    }

    /// Check if a unit is registered for the pair.
    pub fn has_transformer(&self, input: TypeTag, output: TypeTag) -> bool {
        self.transformers.contains_key(&(input, output))
    }

    /// Registered units, in registration order.
    pub fn list_transformers(&self) -> Vec<TransformerInfo> {
        self.transformers
            .iter()
            .map(|(&(input, output), t)| TransformerInfo {
                input,
                output,
                name: t.name(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }
}

impl fmt::Debug for TransformerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerRegistry")
            .field("transformers", &self.list_transformers())
            .finish()
    }
}
