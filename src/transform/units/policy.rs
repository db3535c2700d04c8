use serde_json::Value;

use super::{documents, read_string, transform_all};
use crate::document::{to_sequence, ObjectBuilder, ID, TYPE};
use crate::model::{Duty, Permission, Policy, PolicyType, Prohibition};
use crate::transform::{Transformer, TransformerContext, TypeTag};
use crate::vocabulary::{
    ODRL_ASSIGNEE_ATTRIBUTE, ODRL_ASSIGNER_ATTRIBUTE, ODRL_OBLIGATION_ATTRIBUTE,
    ODRL_PERMISSION_ATTRIBUTE, ODRL_PROHIBITION_ATTRIBUTE, ODRL_TARGET_ATTRIBUTE,
};

/// Reads a policy object.
///
/// The first recognised `@type` selects the policy type; without one the
/// policy is a `Set`, and an unrecognised type is reported before falling
/// back to `Set`. Rules that fail to convert are left out.
pub struct JsonObjectToPolicy;

impl Transformer for JsonObjectToPolicy {
    type Input = Value;
    type Output = Policy;

    fn input_type(&self) -> TypeTag {
        TypeTag::JsonObject
    }

    fn transform(&self, input: &Value, context: &mut TransformerContext<'_>) -> Option<Policy> {
        let object = input.as_object()?;
        let mut builder = Policy::builder();

        for (key, value) in object {
            match key.as_str() {
                ID => {
                    if let Some(uid) = read_string(key, value, context) {
                        builder = builder.uid(uid);
                    }
                }
                TYPE => builder = builder.policy_type(policy_type(value, context)),
                ODRL_TARGET_ATTRIBUTE => {
                    if let Some(target) = read_string(key, value, context) {
                        builder = builder.target(target);
                    }
                }
                ODRL_ASSIGNER_ATTRIBUTE => {
                    if let Some(assigner) = read_string(key, value, context) {
                        builder = builder.assigner(assigner);
                    }
                }
                ODRL_ASSIGNEE_ATTRIBUTE => {
                    if let Some(assignee) = read_string(key, value, context) {
                        builder = builder.assignee(assignee);
                    }
                }
                ODRL_PERMISSION_ATTRIBUTE => {
                    builder = builder.permissions(transform_all::<Permission>(key, value, context));
                }
                ODRL_PROHIBITION_ATTRIBUTE => {
                    builder = builder.prohibitions(transform_all::<Prohibition>(key, value, context));
                }
                ODRL_OBLIGATION_ATTRIBUTE => {
                    builder = builder.obligations(transform_all::<Duty>(key, value, context));
                }
                _ => {}
            }
        }

        Some(builder.build())
    }
}

fn policy_type(value: &Value, context: &mut TransformerContext<'_>) -> PolicyType {
    let names: Vec<&str> = to_sequence(Some(value)).iter().filter_map(Value::as_str).collect();

    if let Some(policy_type) = names.iter().find_map(|name| PolicyType::from_type_name(name)) {
        return policy_type;
    }

    if !names.is_empty() {
        context.in_attribute(TYPE, |ctx| {
            ctx.report_problem(format!("unknown policy type '{}'", names.join(", ")))
        });
    }
    PolicyType::Set
}

pub struct PolicyToJsonObject;

impl Transformer for PolicyToJsonObject {
    type Input = Policy;
    type Output = Value;

    fn transform(&self, input: &Policy, context: &mut TransformerContext<'_>) -> Option<Value> {
        let permissions = documents(ODRL_PERMISSION_ATTRIBUTE, &input.permissions, context);
        let prohibitions = documents(ODRL_PROHIBITION_ATTRIBUTE, &input.prohibitions, context);
        let obligations = documents(ODRL_OBLIGATION_ATTRIBUTE, &input.obligations, context);

        let document = ObjectBuilder::typed(input.policy_type.type_iri())
            .add_opt(ID, input.uid.as_deref())
            .add_opt(ODRL_TARGET_ATTRIBUTE, input.target.as_deref())
            .add_opt(ODRL_ASSIGNER_ATTRIBUTE, input.assigner.as_deref())
            .add_opt(ODRL_ASSIGNEE_ATTRIBUTE, input.assignee.as_deref())
            .add_list(ODRL_PERMISSION_ATTRIBUTE, permissions)
            .add_list(ODRL_PROHIBITION_ATTRIBUTE, prohibitions)
            .add_list(ODRL_OBLIGATION_ATTRIBUTE, obligations)
            .build();

        Some(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Action;
    use crate::transform::TransformerRegistry;
    use crate::vocabulary::{ODRL_ACTION_ATTRIBUTE, ODRL_POLICY_TYPE_OFFER};
    use serde_json::json;

    fn registry() -> TransformerRegistry {
        TransformerRegistry::with_policy_transformers().unwrap()
    }

    #[test]
    fn test_policy_from_document() {
        let policy = json!({
            "@id": "urn:policy:1",
            "@type": ODRL_POLICY_TYPE_OFFER,
            ODRL_ASSIGNER_ATTRIBUTE: "provider",
            ODRL_PERMISSION_ATTRIBUTE: [
                {ODRL_ACTION_ATTRIBUTE: "use", ODRL_TARGET_ATTRIBUTE: "asset:1"},
                {ODRL_ACTION_ATTRIBUTE: "read"}
            ],
            ODRL_PROHIBITION_ATTRIBUTE: {ODRL_ACTION_ATTRIBUTE: "distribute"}
        });

        let transformed = registry().transform::<Policy>(&policy);

        assert!(transformed.is_complete(), "{:?}", transformed.problems);
        let policy = transformed.result.unwrap();
        assert_eq!(policy.uid.as_deref(), Some("urn:policy:1"));
        assert_eq!(policy.policy_type, PolicyType::Offer);
        assert_eq!(policy.assigner.as_deref(), Some("provider"));
        assert_eq!(policy.permissions.len(), 2);
        assert_eq!(policy.permissions[0].target.as_deref(), Some("asset:1"));
        assert_eq!(policy.prohibitions.len(), 1);
        assert_eq!(policy.prohibitions[0].action, Some(Action::new("distribute")));
        assert!(policy.obligations.is_empty());
    }

    #[test]
    fn test_policy_without_type_is_set() {
        let transformed = registry().transform::<Policy>(&json!({}));

        assert_eq!(transformed.result.map(|p| p.policy_type), Some(PolicyType::Set));
        assert!(transformed.problems.is_empty());
    }

    #[test]
    fn test_unknown_policy_type_is_reported() {
        let transformed = registry().transform::<Policy>(&json!({"@type": "Contract"}));

        assert_eq!(transformed.result.map(|p| p.policy_type), Some(PolicyType::Set));
        assert_eq!(transformed.problems.len(), 1);
        assert_eq!(
            transformed.problems[0].to_string(),
            "@type: unknown policy type 'Contract'"
        );
    }

    #[test]
    fn test_failed_rules_are_dropped_with_paths() {
        let policy = json!({
            ODRL_PERMISSION_ATTRIBUTE: [
                {ODRL_ACTION_ATTRIBUTE: "use"},
                "not a permission",
                {ODRL_TARGET_ATTRIBUTE: "asset:2"}
            ]
        });

        let transformed = registry().transform::<Policy>(&policy);

        let policy = transformed.result.unwrap();
        assert_eq!(policy.permissions.len(), 2);
        let problems: Vec<String> = transformed.problems.iter().map(|p| p.to_string()).collect();
        assert_eq!(
            problems,
            vec![
                "permission[1]: no transformer registered for (JsonString, Permission)",
                "permission[2]: missing required attribute 'action'",
            ]
        );
    }
}
