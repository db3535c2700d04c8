use serde_json::Value;

use super::{document_of, missing, read_string, transform_first};
use crate::document::{to_sequence, ObjectBuilder, ID};
use crate::model::{Action, Constraint};
use crate::transform::{Transformer, TransformerContext, TypeTag};
use crate::vocabulary::{
    ODRL_ACTION_TYPE, ODRL_ACTION_TYPE_ATTRIBUTE, ODRL_INCLUDED_IN_ATTRIBUTE,
    ODRL_REFINEMENT_ATTRIBUTE,
};

/// Reads an action object.
///
/// The action type comes from `odrl:type`, falling back to `@id`. Without
/// either the action is unusable: a problem is reported and no action is
/// produced.
pub struct JsonObjectToAction;

impl Transformer for JsonObjectToAction {
    type Input = Value;
    type Output = Action;

    fn input_type(&self) -> TypeTag {
        TypeTag::JsonObject
    }

    fn accepted_types(&self) -> &'static [&'static str] {
        &[ODRL_ACTION_TYPE]
    }

    fn transform(&self, input: &Value, context: &mut TransformerContext<'_>) -> Option<Action> {
        let object = input.as_object()?;
        let mut builder = Action::builder();
        let mut id = None;
        let mut type_present = false;

        for (key, value) in object {
            match key.as_str() {
                ODRL_ACTION_TYPE_ATTRIBUTE => {
                    type_present |= !to_sequence(Some(value)).is_empty();
                    if let Some(action_type) = read_string(key, value, context) {
                        builder = builder.action_type(action_type);
                    }
                }
                ID => {
                    type_present |= !to_sequence(Some(value)).is_empty();
                    id = read_string(key, value, context);
                }
                ODRL_INCLUDED_IN_ATTRIBUTE => {
                    if let Some(included_in) = read_string(key, value, context) {
                        builder = builder.included_in(included_in);
                    }
                }
                ODRL_REFINEMENT_ATTRIBUTE => {
                    if let Some(refinement) = transform_first::<Constraint>(key, value, context) {
                        builder = builder.refinement(refinement);
                    }
                }
                _ => {}
            }
        }

        if !builder.has_type() {
            match id {
                Some(id) => builder = builder.action_type(id),
                None => {
                    // A present but unreadable type was reported by `read_string`
                    if !type_present {
                        context.report_problem(missing(ODRL_ACTION_TYPE_ATTRIBUTE));
                    }
                    return None;
                }
            }
        }

        Some(builder.build())
    }
}

/// Reads the compact form where the action is just its type, e.g. `"use"`.
pub struct JsonStringToAction;

impl Transformer for JsonStringToAction {
    type Input = Value;
    type Output = Action;

    fn input_type(&self) -> TypeTag {
        TypeTag::JsonString
    }

    fn transform(&self, input: &Value, _context: &mut TransformerContext<'_>) -> Option<Action> {
        input.as_str().map(Action::new)
    }
}

pub struct ActionToJsonObject;

impl Transformer for ActionToJsonObject {
    type Input = Action;
    type Output = Value;

    fn transform(&self, input: &Action, context: &mut TransformerContext<'_>) -> Option<Value> {
        let mut builder = ObjectBuilder::typed(ODRL_ACTION_TYPE)
            .add(ODRL_ACTION_TYPE_ATTRIBUTE, Value::String(input.action_type.clone()))
            .add_opt(ODRL_INCLUDED_IN_ATTRIBUTE, input.included_in.as_deref());

        if let Some(refinement) = document_of(ODRL_REFINEMENT_ATTRIBUTE, input.refinement.as_ref(), context) {
            builder = builder.add(ODRL_REFINEMENT_ATTRIBUTE, refinement);
        }

        Some(builder.build())
    }
}
