//! Per-call transformation context.
//!
//! A context is created for every top-level transform call. Conversion units
//! receive it to dispatch nested values back into the registry and to record
//! problems; every nested call shares the same ordered problem list.

use std::fmt;

use serde::Serialize;

use super::registry::TransformerRegistry;
use super::tag::{Payload, Subject, Transformable, TypeTag};

/// A non-fatal issue found while transforming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    pub message: String,
    /// Attribute path active when the problem was reported, e.g.
    /// `permission[0]/action`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Problem {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}", path, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Call-scoped dispatcher and problem collector.
pub struct TransformerContext<'r> {
    registry: &'r TransformerRegistry,
    problems: Vec<Problem>,
    path: Vec<String>,
}

impl<'r> TransformerContext<'r> {
    pub fn new(registry: &'r TransformerRegistry) -> Self {
        Self {
            registry,
            problems: Vec::new(),
            path: Vec::new(),
        }
    }

    /// Transform `input` into `T` using the registered unit for
    /// `(runtime tag of input, T::TAG)`.
    ///
    /// # Returns
    /// * `Some(value)` - the unit produced a value
    /// * `None` - no unit is registered (a problem is recorded) or the unit
    ///   itself failed (it recorded its own problems)
    pub fn transform<T: Transformable>(&mut self, input: &impl Transformable) -> Option<T> {
        let payload = self.transform_to(input.subject(), T::TAG)?;
        let produced = payload.type_tag();

        match T::from_payload(payload) {
            Some(value) => Some(value),
            None => {
                self.report_problem(format!(
                    "transformer for {} produced {} instead",
                    T::TAG,
                    produced
                ));
                None
            }
        }
    }

    /// Untyped form of [`transform`](Self::transform).
    pub fn transform_to(&mut self, subject: Subject<'_>, target: TypeTag) -> Option<Payload> {
        let input_type = subject.type_tag();
        let registry = self.registry;

        let Some(transformer) = registry.resolve(input_type, target) else {
            self.report_problem(format!(
                "no transformer registered for ({}, {})",
                input_type, target
            ));
            return None;
        };

        tracing::trace!(
            "dispatching ({}, {}) to {} at '{}'",
            input_type,
            target,
            transformer.name(),
            self.path.join("/")
        );

        transformer.transform_subject(subject, self)
    }

    /// Run `f` with `segment` appended to the attribute path.
    ///
    /// Problems reported inside carry the extended path.
    pub fn in_attribute<R>(&mut self, segment: &str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push(segment.to_string());
        let result = f(self);
        self.path.pop();
        result
    }

    /// Append a problem at the current attribute path.
    pub fn report_problem(&mut self, message: impl Into<String>) {
        let path = (!self.path.is_empty()).then(|| self.path.join("/"));
        let problem = Problem {
            message: message.into(),
            path,
        };

        tracing::debug!("transform problem: {}", problem);
        self.problems.push(problem);
    }

    pub fn has_problems(&self) -> bool {
        !self.problems.is_empty()
    }

    /// Problems in the order they were reported.
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn into_problems(self) -> Vec<Problem> {
        self.problems
    }

    pub fn registry(&self) -> &'r TransformerRegistry {
        self.registry
    }
}
