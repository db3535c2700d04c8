//! Conversion-unit contract.

use std::marker::PhantomData;

use serde_json::Value;

use super::context::TransformerContext;
use super::tag::{Payload, Subject, Transformable, TypeTag};
use crate::document::{self, TYPE};
use crate::vocabulary::{is_term, local_name};

/// A single conversion unit: one direction of one type pair.
///
/// Implementations are stateless and may be called concurrently. Malformed
/// input is reported through [`TransformerContext::report_problem`] and
/// results in `None` (or a partial value), never a panic.
///
/// # Example
///
/// ```
/// use ldpolicy::model::Action;
/// use ldpolicy::transform::{Transformer, TransformerContext, TypeTag};
/// use serde_json::Value;
///
/// struct ShoutingAction;
///
/// impl Transformer for ShoutingAction {
///     type Input = Value;
///     type Output = Action;
///
///     fn input_type(&self) -> TypeTag {
///         TypeTag::JsonString
///     }
///
///     fn transform(&self, input: &Value, _context: &mut TransformerContext<'_>) -> Option<Action> {
///         input.as_str().map(|s| Action::new(s.to_uppercase()))
///     }
/// }
/// ```
pub trait Transformer: Send + Sync {
    type Input: Transformable;
    type Output: Transformable;

    /// Tag of the inputs this unit accepts.
    ///
    /// Document units override this with the JSON shape they read.
    fn input_type(&self) -> TypeTag {
        <Self::Input as Transformable>::TAG
    }

    fn output_type(&self) -> TypeTag {
        <Self::Output as Transformable>::TAG
    }

    /// Document `@type` values this unit reads.
    ///
    /// An untyped node is always accepted. A typed node must carry one of
    /// these types, otherwise the call is rejected with a problem. Empty
    /// (the default) accepts any type.
    fn accepted_types(&self) -> &'static [&'static str] {
        &[]
    }

    fn transform(
        &self,
        input: &Self::Input,
        context: &mut TransformerContext<'_>,
    ) -> Option<Self::Output>;
}

/// Object-safe form of [`Transformer`] stored in the registry.
pub(crate) trait ErasedTransformer: Send + Sync {
    fn input_type(&self) -> TypeTag;

    fn output_type(&self) -> TypeTag;

    fn name(&self) -> &'static str;

    fn accepts_declared_input(&self) -> bool;

    fn transform_subject(
        &self,
        subject: Subject<'_>,
        context: &mut TransformerContext<'_>,
    ) -> Option<Payload>;
}

impl<T: Transformer> ErasedTransformer for T {
    fn input_type(&self) -> TypeTag {
        Transformer::input_type(self)
    }

    fn output_type(&self) -> TypeTag {
        Transformer::output_type(self)
    }

    fn name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn accepts_declared_input(&self) -> bool {
        <T::Input as Transformable>::accepts(Transformer::input_type(self))
    }

    fn transform_subject(
        &self,
        subject: Subject<'_>,
        context: &mut TransformerContext<'_>,
    ) -> Option<Payload> {
        // Registration checks the declared input tag against `T::Input`, so
        // a mismatch here means the subject was routed by hand.
        if let Subject::Document(node) = subject {
            if !accepts_node_type(Transformer::accepted_types(self), node, context) {
                return None;
            }
        }

        let Some(input) = <T::Input as Transformable>::from_subject(subject) else {
            context.report_problem(format!(
                "transformer {} cannot read input of type {}",
                self.name(),
                subject.type_tag()
            ));
            return None;
        };

        self.transform(input, context)
            .map(Transformable::into_payload)
    }
}

/// Check the `@type` of `node` against a unit's accepted types, reporting a
/// conflict under `@type`.
fn accepts_node_type(accepted: &[&str], node: &Value, context: &mut TransformerContext<'_>) -> bool {
    if accepted.is_empty() {
        return true;
    }

    let declared: Vec<&str> = document::attribute(node, TYPE)
        .iter()
        .filter_map(Value::as_str)
        .collect();
    if declared.is_empty()
        || declared
            .iter()
            .any(|name| accepted.iter().any(|iri| is_term(name, iri)))
    {
        return true;
    }

    let declared: Vec<&str> = declared.into_iter().map(local_name).collect();
    let expected: Vec<&str> = accepted.iter().map(|iri| local_name(iri)).collect();
    context.in_attribute(TYPE, |ctx| {
        ctx.report_problem(format!(
            "unexpected type '{}', expected {}",
            declared.join(", "),
            expected.join(" or ")
        ))
    });
    false
}

/// Closure-backed [`Transformer`], handy for small units and test fakes.
pub struct FnTransformer<I, O, F> {
    input_type: TypeTag,
    func: F,
    _types: PhantomData<fn(&I) -> O>,
}

impl<I, O, F> FnTransformer<I, O, F>
where
    I: Transformable,
    O: Transformable,
    F: Fn(&I, &mut TransformerContext<'_>) -> Option<O> + Send + Sync,
{
    pub fn new(input_type: TypeTag, func: F) -> Self {
        Self {
            input_type,
            func,
            _types: PhantomData,
        }
    }
}

impl<I, O, F> Transformer for FnTransformer<I, O, F>
where
    I: Transformable,
    O: Transformable,
    F: Fn(&I, &mut TransformerContext<'_>) -> Option<O> + Send + Sync,
{
    type Input = I;
    type Output = O;

    fn input_type(&self) -> TypeTag {
        self.input_type
    }

    fn transform(&self, input: &I, context: &mut TransformerContext<'_>) -> Option<O> {
        (self.func)(input, context)
    }
}
