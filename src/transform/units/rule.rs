//! Duty, permission and prohibition units.
//!
//! Attribute policy shared by all rules:
//!
//! | attribute | kind | when absent | when it fails |
//! |---|---|---|---|
//! | `action` | single, required | one problem, rule still built | omitted, nested problem only |
//! | `constraint` | multi | empty | element skipped |
//! | `target`, `assigner`, `assignee`, `@id` | string | unset | problem, unset |
//!
//! Duties additionally read an optional `consequence`, permissions a
//! multi-valued `duty` and prohibitions a multi-valued `remedy`; failed
//! elements are skipped.

use serde_json::{Map, Value};

use super::{document_of, documents, missing, read_string, transform_all, transform_first};
use crate::document::{to_sequence, ObjectBuilder, ID};
use crate::model::{Action, Constraint, Duty, Permission, Prohibition};
use crate::transform::{Transformer, TransformerContext, TypeTag};
use crate::vocabulary::{
    ODRL_ACTION_ATTRIBUTE, ODRL_ASSIGNEE_ATTRIBUTE, ODRL_ASSIGNER_ATTRIBUTE,
    ODRL_CONSEQUENCE_ATTRIBUTE, ODRL_CONSTRAINT_ATTRIBUTE, ODRL_DUTY_ATTRIBUTE, ODRL_DUTY_TYPE,
    ODRL_PERMISSION_TYPE, ODRL_PROHIBITION_TYPE, ODRL_REMEDY_ATTRIBUTE, ODRL_TARGET_ATTRIBUTE,
};

/// Staging area for the attributes every rule shares.
#[derive(Debug, Default)]
struct RuleFields {
    uid: Option<String>,
    target: Option<String>,
    action: Option<Action>,
    action_present: bool,
    assigner: Option<String>,
    assignee: Option<String>,
    constraints: Vec<Constraint>,
}

impl RuleFields {
    /// Read `key` if it is a shared rule attribute.
    ///
    /// Returns `false` for attributes the caller should handle itself.
    fn read(&mut self, key: &str, value: &Value, context: &mut TransformerContext<'_>) -> bool {
        match key {
            ID => self.uid = read_string(key, value, context),
            ODRL_TARGET_ATTRIBUTE => self.target = read_string(key, value, context),
            ODRL_ASSIGNER_ATTRIBUTE => self.assigner = read_string(key, value, context),
            ODRL_ASSIGNEE_ATTRIBUTE => self.assignee = read_string(key, value, context),
            ODRL_ACTION_ATTRIBUTE => {
                self.action_present = !to_sequence(Some(value)).is_empty();
                self.action = transform_first(key, value, context);
            }
            ODRL_CONSTRAINT_ATTRIBUTE => {
                self.constraints = transform_all(key, value, context);
            }
            _ => return false,
        }
        true
    }

    /// Walk all attributes of `object` in document order.
    fn read_all(
        object: &Map<String, Value>,
        context: &mut TransformerContext<'_>,
        mut other: impl FnMut(&str, &Value, &mut TransformerContext<'_>),
    ) -> Self {
        let mut fields = RuleFields::default();

        for (key, value) in object {
            if !fields.read(key, value, context) {
                other(key, value, context);
            }
        }

        if !fields.action_present {
            context.report_problem(missing(ODRL_ACTION_ATTRIBUTE));
        }

        fields
    }
}

/// Reads a duty object.
pub struct JsonObjectToDuty;

impl Transformer for JsonObjectToDuty {
    type Input = Value;
    type Output = Duty;

    fn input_type(&self) -> TypeTag {
        TypeTag::JsonObject
    }

    fn accepted_types(&self) -> &'static [&'static str] {
        &[ODRL_DUTY_TYPE]
    }

    fn transform(&self, input: &Value, context: &mut TransformerContext<'_>) -> Option<Duty> {
        let object = input.as_object()?;
        let mut consequence = None;

        let fields = RuleFields::read_all(object, context, |key, value, ctx| {
            if key == ODRL_CONSEQUENCE_ATTRIBUTE {
                consequence = transform_first::<Duty>(key, value, ctx);
            }
        });

        Some(Duty {
            uid: fields.uid,
            target: fields.target,
            action: fields.action,
            assigner: fields.assigner,
            assignee: fields.assignee,
            constraints: fields.constraints,
            consequence: consequence.map(Box::new),
        })
    }
}

/// Reads a permission object.
pub struct JsonObjectToPermission;

impl Transformer for JsonObjectToPermission {
    type Input = Value;
    type Output = Permission;

    fn input_type(&self) -> TypeTag {
        TypeTag::JsonObject
    }

    fn accepted_types(&self) -> &'static [&'static str] {
        &[ODRL_PERMISSION_TYPE]
    }

    fn transform(&self, input: &Value, context: &mut TransformerContext<'_>) -> Option<Permission> {
        let object = input.as_object()?;
        let mut duties = Vec::new();

        let fields = RuleFields::read_all(object, context, |key, value, ctx| {
            if key == ODRL_DUTY_ATTRIBUTE {
                duties = transform_all::<Duty>(key, value, ctx);
            }
        });

        Some(Permission {
            uid: fields.uid,
            target: fields.target,
            action: fields.action,
            assigner: fields.assigner,
            assignee: fields.assignee,
            constraints: fields.constraints,
            duties,
        })
    }
}

/// Reads a prohibition object.
pub struct JsonObjectToProhibition;

impl Transformer for JsonObjectToProhibition {
    type Input = Value;
    type Output = Prohibition;

    fn input_type(&self) -> TypeTag {
        TypeTag::JsonObject
    }

    fn accepted_types(&self) -> &'static [&'static str] {
        &[ODRL_PROHIBITION_TYPE]
    }

    fn transform(&self, input: &Value, context: &mut TransformerContext<'_>) -> Option<Prohibition> {
        let object = input.as_object()?;
        let mut remedies = Vec::new();

        let fields = RuleFields::read_all(object, context, |key, value, ctx| {
            if key == ODRL_REMEDY_ATTRIBUTE {
                remedies = transform_all::<Duty>(key, value, ctx);
            }
        });

        Some(Prohibition {
            uid: fields.uid,
            target: fields.target,
            action: fields.action,
            assigner: fields.assigner,
            assignee: fields.assignee,
            constraints: fields.constraints,
            remedies,
        })
    }
}

/// Emit the attributes shared by every rule.
#[allow(clippy::too_many_arguments)]
fn rule_document(
    type_name: &str,
    uid: Option<&str>,
    target: Option<&str>,
    assigner: Option<&str>,
    assignee: Option<&str>,
    action: Option<&Action>,
    constraints: &[Constraint],
    context: &mut TransformerContext<'_>,
) -> ObjectBuilder {
    let mut builder = ObjectBuilder::typed(type_name)
        .add_opt(ID, uid)
        .add_opt(ODRL_TARGET_ATTRIBUTE, target)
        .add_opt(ODRL_ASSIGNER_ATTRIBUTE, assigner)
        .add_opt(ODRL_ASSIGNEE_ATTRIBUTE, assignee);

    if let Some(action) = document_of(ODRL_ACTION_ATTRIBUTE, action, context) {
        builder = builder.add(ODRL_ACTION_ATTRIBUTE, action);
    }

    let constraints = documents(ODRL_CONSTRAINT_ATTRIBUTE, constraints, context);
    builder.add_list(ODRL_CONSTRAINT_ATTRIBUTE, constraints)
}

pub struct DutyToJsonObject;

impl Transformer for DutyToJsonObject {
    type Input = Duty;
    type Output = Value;

    fn transform(&self, input: &Duty, context: &mut TransformerContext<'_>) -> Option<Value> {
        let mut builder = rule_document(
            ODRL_DUTY_TYPE,
            input.uid.as_deref(),
            input.target.as_deref(),
            input.assigner.as_deref(),
            input.assignee.as_deref(),
            input.action.as_ref(),
            &input.constraints,
            context,
        );

        if let Some(consequence) =
            document_of(ODRL_CONSEQUENCE_ATTRIBUTE, input.consequence.as_deref(), context)
        {
            builder = builder.add(ODRL_CONSEQUENCE_ATTRIBUTE, consequence);
        }

        Some(builder.build())
    }
}

pub struct PermissionToJsonObject;

impl Transformer for PermissionToJsonObject {
    type Input = Permission;
    type Output = Value;

    fn transform(&self, input: &Permission, context: &mut TransformerContext<'_>) -> Option<Value> {
        let builder = rule_document(
            ODRL_PERMISSION_TYPE,
            input.uid.as_deref(),
            input.target.as_deref(),
            input.assigner.as_deref(),
            input.assignee.as_deref(),
            input.action.as_ref(),
            &input.constraints,
            context,
        );
        let duties = documents(ODRL_DUTY_ATTRIBUTE, &input.duties, context);

        Some(builder.add_list(ODRL_DUTY_ATTRIBUTE, duties).build())
    }
}

pub struct ProhibitionToJsonObject;

impl Transformer for ProhibitionToJsonObject {
    type Input = Prohibition;
    type Output = Value;

    fn transform(&self, input: &Prohibition, context: &mut TransformerContext<'_>) -> Option<Value> {
        let builder = rule_document(
            ODRL_PROHIBITION_TYPE,
            input.uid.as_deref(),
            input.target.as_deref(),
            input.assigner.as_deref(),
            input.assignee.as_deref(),
            input.action.as_ref(),
            &input.constraints,
            context,
        );
        let remedies = documents(ODRL_REMEDY_ATTRIBUTE, &input.remedies, context);

        Some(builder.add_list(ODRL_REMEDY_ATTRIBUTE, remedies).build())
    }
}
