//! Policy conversion units, in both directions.
//!
//! Document → model units walk an object's attributes in document order and
//! read every value through [`to_sequence`], so bare and array-wrapped
//! attributes behave identically. Model → document units emit expanded
//! objects keyed by ODRL IRIs that the document → model units read back.

mod action;
mod constraint;
mod policy;
mod rule;

pub use action::{ActionToJsonObject, JsonObjectToAction, JsonStringToAction};
pub use constraint::{ConstraintToJsonObject, JsonObjectToConstraint};
pub use policy::{JsonObjectToPolicy, PolicyToJsonObject};
pub use rule::{
    DutyToJsonObject, JsonObjectToDuty, JsonObjectToPermission, JsonObjectToProhibition,
    PermissionToJsonObject, ProhibitionToJsonObject,
};

use serde_json::Value;

use super::context::TransformerContext;
use super::registry::{RegistryError, TransformerRegistry};
use super::tag::Transformable;
use crate::document::{self, to_sequence};
use crate::vocabulary::local_name;

/// Register every policy unit on `registry`.
pub fn register_policy_transformers(registry: &mut TransformerRegistry) -> Result<(), RegistryError> {
    registry.register(JsonObjectToAction)?;
    registry.register(JsonStringToAction)?;
    registry.register(JsonObjectToConstraint)?;
    registry.register(JsonObjectToDuty)?;
    registry.register(JsonObjectToPermission)?;
    registry.register(JsonObjectToProhibition)?;
    registry.register(JsonObjectToPolicy)?;

    registry.register(ActionToJsonObject)?;
    registry.register(ConstraintToJsonObject)?;
    registry.register(DutyToJsonObject)?;
    registry.register(PermissionToJsonObject)?;
    registry.register(ProhibitionToJsonObject)?;
    registry.register(PolicyToJsonObject)?;
    Ok(())
}

/// Transform the first value of a single-valued attribute.
///
/// An empty attribute yields `None` without a problem; whether that is an
/// error is up to the calling unit.
fn transform_first<T: Transformable>(
    attribute: &str,
    value: &Value,
    context: &mut TransformerContext<'_>,
) -> Option<T> {
    let first = to_sequence(Some(value)).first()?;
    context.in_attribute(local_name(attribute), |ctx| ctx.transform::<T>(first))
}

/// Transform every value of a multi-valued attribute.
///
/// Values that fail are left out; their problems were already recorded by
/// the nested call.
fn transform_all<T: Transformable>(
    attribute: &str,
    value: &Value,
    context: &mut TransformerContext<'_>,
) -> Vec<T> {
    let name = local_name(attribute);

    to_sequence(Some(value))
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            context.in_attribute(&format!("{}[{}]", name, index), |ctx| ctx.transform::<T>(item))
        })
        .collect()
}

/// Read the first value of a string attribute, reporting mis-shaped values.
fn read_string(
    attribute: &str,
    value: &Value,
    context: &mut TransformerContext<'_>,
) -> Option<String> {
    let first = to_sequence(Some(value)).first()?;

    match document::string_value(first) {
        Ok(s) => Some(s.to_string()),
        Err(message) => {
            context.in_attribute(local_name(attribute), |ctx| ctx.report_problem(message));
            None
        }
    }
}

/// Transform each domain value into a document, in order.
fn documents<T: Transformable>(
    attribute: &str,
    items: &[T],
    context: &mut TransformerContext<'_>,
) -> Vec<Value> {
    let name = local_name(attribute);

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            context.in_attribute(&format!("{}[{}]", name, index), |ctx| ctx.transform::<Value>(item))
        })
        .collect()
}

/// Transform one optional domain value into a document.
fn document_of<T: Transformable>(
    attribute: &str,
    item: Option<&T>,
    context: &mut TransformerContext<'_>,
) -> Option<Value> {
    let item = item?;
    context.in_attribute(local_name(attribute), |ctx| ctx.transform::<Value>(item))
}

fn missing(attribute: &str) -> String {
    format!("missing required attribute '{}'", local_name(attribute))
}
