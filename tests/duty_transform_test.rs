//! Duty conversion against fake action and constraint units.

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use ldpolicy::model::{Action, Constraint, Duty, Operator};
use ldpolicy::transform::units::JsonObjectToDuty;
use ldpolicy::vocabulary::{
    ODRL_ACTION_ATTRIBUTE, ODRL_CONSEQUENCE_ATTRIBUTE, ODRL_CONSTRAINT_ATTRIBUTE,
    ODRL_TARGET_ATTRIBUTE,
};
use ldpolicy::{FnTransformer, TransformerRegistry, TypeTag};

/// Records every input a fake unit was called with.
#[derive(Clone, Default)]
struct Calls(Arc<Mutex<Vec<Value>>>);

impl Calls {
    fn record(&self, input: &Value) {
        self.0.lock().unwrap().push(input.clone());
    }

    fn inputs(&self) -> Vec<Value> {
        self.0.lock().unwrap().clone()
    }
}

struct Fixture {
    registry: TransformerRegistry,
    action_calls: Calls,
    constraint_calls: Calls,
}

fn fixture() -> Fixture {
    let action_calls = Calls::default();
    let constraint_calls = Calls::default();
    let mut registry = TransformerRegistry::new();

    let calls = action_calls.clone();
    registry
        .register(FnTransformer::new(TypeTag::JsonObject, move |input: &Value, _ctx| {
            calls.record(input);
            Some(Action::new("use"))
        }))
        .unwrap();

    let calls = constraint_calls.clone();
    registry
        .register(FnTransformer::new(TypeTag::JsonObject, move |input: &Value, _ctx| {
            calls.record(input);
            Some(Constraint::atomic("spatial", Operator::Eq, "EU"))
        }))
        .unwrap();

    registry.register(JsonObjectToDuty).unwrap();

    Fixture {
        registry,
        action_calls,
        constraint_calls,
    }
}

fn action_node() -> Value {
    json!({"http://www.w3.org/ns/odrl/2/type": "use"})
}

fn constraint_node() -> Value {
    json!({"http://www.w3.org/ns/odrl/2/leftOperand": "spatial"})
}

fn consequence_node() -> Value {
    json!({ ODRL_ACTION_ATTRIBUTE: action_node() })
}

fn assert_complete_duty(fixture: &Fixture, document: &Value) {
    let transformed = fixture.registry.transform::<Duty>(document);

    assert!(transformed.problems.is_empty(), "{:?}", transformed.problems);
    let duty = transformed.result.unwrap();
    assert_eq!(duty.action, Some(Action::new("use")));
    assert_eq!(
        duty.constraints,
        vec![Constraint::atomic("spatial", Operator::Eq, "EU")]
    );
    assert_eq!(duty.target.as_deref(), Some("target"));
    let consequence = duty.consequence.expect("consequence");
    assert_eq!(consequence.action, Some(Action::new("use")));

    // Outer action first, then the consequence's own action
    assert_eq!(fixture.action_calls.inputs(), vec![action_node(), action_node()]);
    assert_eq!(fixture.constraint_calls.inputs(), vec![constraint_node()]);
}

#[test]
fn test_duty_with_bare_attributes() {
    let duty = json!({
        ODRL_ACTION_ATTRIBUTE: action_node(),
        ODRL_CONSTRAINT_ATTRIBUTE: constraint_node(),
        ODRL_CONSEQUENCE_ATTRIBUTE: consequence_node(),
        ODRL_TARGET_ATTRIBUTE: "target"
    });

    assert_complete_duty(&fixture(), &duty);
}

#[test]
fn test_duty_with_array_wrapped_attributes() {
    let duty = json!({
        ODRL_ACTION_ATTRIBUTE: [action_node()],
        ODRL_CONSTRAINT_ATTRIBUTE: [constraint_node()],
        ODRL_CONSEQUENCE_ATTRIBUTE: [consequence_node()],
        ODRL_TARGET_ATTRIBUTE: [{"@value": "target"}]
    });

    assert_complete_duty(&fixture(), &duty);
}

#[test]
fn test_duty_without_action_reports_one_problem() {
    let fixture = fixture();
    let duty = json!({ ODRL_TARGET_ATTRIBUTE: "target" });

    let transformed = fixture.registry.transform::<Duty>(&duty);

    let duty = transformed.result.unwrap();
    assert_eq!(duty.action, None);
    assert_eq!(duty.target.as_deref(), Some("target"));
    assert_eq!(transformed.problems.len(), 1);
    assert_eq!(
        transformed.problems[0].message,
        "missing required attribute 'action'"
    );
    assert!(fixture.action_calls.inputs().is_empty());
}

#[test]
fn test_failed_action_is_not_reported_twice() {
    let mut registry = TransformerRegistry::new();
    registry
        .register(FnTransformer::new(TypeTag::JsonObject, |_: &Value, ctx| {
            ctx.report_problem("unreadable action");
            None::<Action>
        }))
        .unwrap();
    registry.register(JsonObjectToDuty).unwrap();

    let transformed = registry.transform::<Duty>(&json!({ ODRL_ACTION_ATTRIBUTE: action_node() }));

    assert_eq!(transformed.result.unwrap().action, None);
    let problems: Vec<String> = transformed.problems.iter().map(|p| p.to_string()).collect();
    assert_eq!(problems, vec!["action: unreadable action"]);
}

#[test]
fn test_failed_constraint_is_skipped_and_reported() {
    let mut registry = TransformerRegistry::new();
    registry
        .register(FnTransformer::new(TypeTag::JsonObject, |input: &Value, ctx| {
            if input.get("broken").is_some() {
                ctx.report_problem("broken constraint");
                return None;
            }
            Some(Constraint::atomic("spatial", Operator::Eq, "EU"))
        }))
        .unwrap();
    registry
        .register(FnTransformer::new(TypeTag::JsonString, |input: &Value, _ctx| {
            input.as_str().map(Action::new)
        }))
        .unwrap();
    registry.register(JsonObjectToDuty).unwrap();

    let duty = json!({
        ODRL_ACTION_ATTRIBUTE: "use",
        ODRL_CONSTRAINT_ATTRIBUTE: [constraint_node(), {"broken": true}, constraint_node()]
    });
    let transformed = registry.transform::<Duty>(&duty);

    assert_eq!(transformed.result.unwrap().constraints.len(), 2);
    let problems: Vec<String> = transformed.problems.iter().map(|p| p.to_string()).collect();
    assert_eq!(problems, vec!["constraint[1]: broken constraint"]);
}

#[test]
fn test_duty_rejects_other_rule_type() {
    let registry = TransformerRegistry::with_policy_transformers().unwrap();
    let permission = json!({
        "@type": ldpolicy::vocabulary::ODRL_PERMISSION_TYPE,
        ODRL_ACTION_ATTRIBUTE: "use"
    });

    let transformed = registry.transform::<Duty>(&permission);

    assert!(transformed.result.is_none());
    let problems: Vec<String> = transformed.problems.iter().map(|p| p.to_string()).collect();
    assert_eq!(problems, vec!["@type: unexpected type 'Permission', expected Duty"]);
}

#[test]
fn test_duty_accepts_own_type_in_either_form() {
    let registry = TransformerRegistry::with_policy_transformers().unwrap();

    for duty_type in [ldpolicy::vocabulary::ODRL_DUTY_TYPE, "odrl:Duty"] {
        let duty = json!({"@type": [duty_type], ODRL_ACTION_ATTRIBUTE: "use"});

        let transformed = registry.transform::<Duty>(&duty);

        assert!(transformed.is_complete(), "{:?}", transformed.problems);
        assert_eq!(transformed.result.unwrap().action, Some(Action::new("use")));
    }
}
