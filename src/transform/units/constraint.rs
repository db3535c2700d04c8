use serde_json::Value;

use super::{documents, missing, read_string, transform_all};
use crate::document::{self, to_sequence, ObjectBuilder, ID, LIST, VALUE};
use crate::model::{AtomicConstraint, Constraint, Operator};
use crate::transform::{Transformer, TransformerContext, TypeTag};
use crate::vocabulary::{
    local_name, ODRL_AND_CONSTRAINT_ATTRIBUTE, ODRL_CONSTRAINT_TYPE, ODRL_LEFT_OPERAND_ATTRIBUTE,
    ODRL_LOGICAL_CONSTRAINT_TYPE, ODRL_OPERATOR_ATTRIBUTE, ODRL_OR_CONSTRAINT_ATTRIBUTE,
    ODRL_RIGHT_OPERAND_ATTRIBUTE, ODRL_XONE_CONSTRAINT_ATTRIBUTE,
};

const LOGICAL_ATTRIBUTES: [&str; 3] = [
    ODRL_AND_CONSTRAINT_ATTRIBUTE,
    ODRL_OR_CONSTRAINT_ATTRIBUTE,
    ODRL_XONE_CONSTRAINT_ATTRIBUTE,
];

/// Reads atomic and logical constraints.
///
/// An object carrying `and`, `or` or `xone` is logical; its operands are
/// converted best-effort. Anything else is atomic and needs `leftOperand`,
/// `operator` and `rightOperand`: a missing or unreadable one is reported
/// and no constraint is produced.
pub struct JsonObjectToConstraint;

impl Transformer for JsonObjectToConstraint {
    type Input = Value;
    type Output = Constraint;

    fn input_type(&self) -> TypeTag {
        TypeTag::JsonObject
    }

    fn accepted_types(&self) -> &'static [&'static str] {
        &[ODRL_CONSTRAINT_TYPE, ODRL_LOGICAL_CONSTRAINT_TYPE]
    }

    fn transform(&self, input: &Value, context: &mut TransformerContext<'_>) -> Option<Constraint> {
        let object = input.as_object()?;

        let logical: Vec<(&String, &Value)> = object
            .iter()
            .filter(|(key, _)| LOGICAL_ATTRIBUTES.contains(&key.as_str()))
            .collect();

        match logical.as_slice() {
            [] => transform_atomic(input, context).map(Constraint::Atomic),
            [(key, value)] => {
                let operands = transform_all::<Constraint>(key, value, context);
                Some(match key.as_str() {
                    ODRL_AND_CONSTRAINT_ATTRIBUTE => Constraint::And(operands),
                    ODRL_OR_CONSTRAINT_ATTRIBUTE => Constraint::Or(operands),
                    _ => Constraint::Xone(operands),
                })
            }
            _ => {
                let names: Vec<&str> = logical.iter().map(|(key, _)| local_name(key)).collect();
                context.report_problem(format!(
                    "logical constraint has more than one operand list: {}",
                    names.join(", ")
                ));
                None
            }
        }
    }
}

fn transform_atomic(input: &Value, context: &mut TransformerContext<'_>) -> Option<AtomicConstraint> {
    let object = input.as_object()?;
    let mut left_operand = None;
    let mut operator = None;
    let mut right_operand = None;
    let mut complete = true;

    for (key, value) in object {
        match key.as_str() {
            ODRL_LEFT_OPERAND_ATTRIBUTE => {
                left_operand = read_string(key, value, context);
                complete &= left_operand.is_some();
            }
            ODRL_OPERATOR_ATTRIBUTE => {
                operator = read_string(key, value, context).and_then(|name| {
                    match name.parse::<Operator>() {
                        Ok(op) => Some(op),
                        Err(err) => {
                            context.in_attribute(local_name(key), |ctx| ctx.report_problem(err.to_string()));
                            None
                        }
                    }
                });
                complete &= operator.is_some();
            }
            ODRL_RIGHT_OPERAND_ATTRIBUTE => {
                right_operand = read_right_operand(key, value, context);
                complete &= right_operand.is_some();
            }
            _ => {}
        }
    }

    // Attributes that were present but unreadable are already reported
    for attribute in [
        ODRL_LEFT_OPERAND_ATTRIBUTE,
        ODRL_OPERATOR_ATTRIBUTE,
        ODRL_RIGHT_OPERAND_ATTRIBUTE,
    ] {
        if document::attribute(input, attribute).is_empty() {
            context.report_problem(missing(attribute));
            complete = false;
        }
    }

    if !complete {
        return None;
    }

    let operator = operator?;
    Some(AtomicConstraint {
        left_operand: left_operand?,
        operator,
        right_operand: right_operand?.into_value(operator),
    })
}

/// Right operand values in document order.
struct RightOperand {
    values: Vec<Value>,
    /// Given as an explicit `@list`.
    list: bool,
}

impl RightOperand {
    /// A single value stays scalar unless it came from a list or the
    /// operator works on sets.
    fn into_value(mut self, operator: Operator) -> Value {
        if self.list || operator.takes_list() || self.values.len() != 1 {
            Value::Array(self.values)
        } else {
            self.values.swap_remove(0)
        }
    }
}

fn read_right_operand(
    attribute: &str,
    value: &Value,
    context: &mut TransformerContext<'_>,
) -> Option<RightOperand> {
    let mut operand = RightOperand {
        values: Vec::new(),
        list: false,
    };

    for (index, item) in to_sequence(Some(value)).iter().enumerate() {
        let read = match item.get(LIST) {
            Some(list) => {
                operand.list = true;
                to_sequence(Some(list)).iter().map(operand_value).collect()
            }
            None => operand_value(item).map(|value| vec![value]),
        };

        match read {
            Ok(values) => operand.values.extend(values),
            Err(message) => {
                let segment = format!("{}[{}]", local_name(attribute), index);
                context.in_attribute(&segment, |ctx| ctx.report_problem(message));
                return None;
            }
        }
    }

    Some(operand)
}

/// A literal, or an IRI reference kept as `{"@id": iri}`.
fn operand_value(item: &Value) -> Result<Value, String> {
    if item.get(VALUE).is_none() {
        if let Some(iri) = document::node_id(item) {
            return Ok(ObjectBuilder::new().add(ID, Value::String(iri.to_string())).build());
        }
    }
    document::literal_value(item)
}

/// Expanded form of a right operand: value objects, IRI references as they
/// are, arrays as `@list`.
fn operand_document(operand: &Value) -> Value {
    match operand {
        Value::Array(items) => ObjectBuilder::new()
            .add(LIST, Value::Array(items.iter().map(operand_document).collect()))
            .build(),
        Value::Object(_) => operand.clone(),
        literal => ObjectBuilder::new().add(VALUE, literal.clone()).build(),
    }
}

pub struct ConstraintToJsonObject;

impl Transformer for ConstraintToJsonObject {
    type Input = Constraint;
    type Output = Value;

    fn transform(&self, input: &Constraint, context: &mut TransformerContext<'_>) -> Option<Value> {
        let object = match input {
            Constraint::Atomic(atomic) => ObjectBuilder::typed(ODRL_CONSTRAINT_TYPE)
                .add(ODRL_LEFT_OPERAND_ATTRIBUTE, Value::String(atomic.left_operand.clone()))
                .add(
                    ODRL_OPERATOR_ATTRIBUTE,
                    ObjectBuilder::new()
                        .add(ID, Value::String(atomic.operator.iri()))
                        .build(),
                )
                .add(ODRL_RIGHT_OPERAND_ATTRIBUTE, operand_document(&atomic.right_operand))
                .build(),
            Constraint::And(operands) => logical(ODRL_AND_CONSTRAINT_ATTRIBUTE, operands, context),
            Constraint::Or(operands) => logical(ODRL_OR_CONSTRAINT_ATTRIBUTE, operands, context),
            Constraint::Xone(operands) => logical(ODRL_XONE_CONSTRAINT_ATTRIBUTE, operands, context),
        };

        Some(object)
    }
}

fn logical(attribute: &str, operands: &[Constraint], context: &mut TransformerContext<'_>) -> Value {
    let operands = documents(attribute, operands, context);
    ObjectBuilder::typed(ODRL_LOGICAL_CONSTRAINT_TYPE)
        .add(attribute, Value::Array(operands))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::TransformerRegistry;
    use serde_json::json;

    fn registry() -> TransformerRegistry {
        TransformerRegistry::with_policy_transformers().unwrap()
    }

    fn atomic_json(left: &str, operator: &str, right: Value) -> Value {
        json!({
            ODRL_LEFT_OPERAND_ATTRIBUTE: left,
            ODRL_OPERATOR_ATTRIBUTE: {"@id": operator},
            ODRL_RIGHT_OPERAND_ATTRIBUTE: right
        })
    }

    #[test]
    fn test_atomic_constraint() {
        let transformed = registry().transform::<Constraint>(&atomic_json(
            "spatial",
            "http://www.w3.org/ns/odrl/2/eq",
            json!({"@value": "EU"}),
        ));

        assert!(transformed.is_complete(), "{:?}", transformed.problems);
        assert_eq!(
            transformed.result,
            Some(Constraint::atomic("spatial", Operator::Eq, "EU"))
        );
    }

    #[test]
    fn test_right_operand_list() {
        let transformed =
            registry().transform::<Constraint>(&atomic_json("purpose", "isAnyOf", json!(["a", "b"])));

        assert_eq!(
            transformed.result,
            Some(Constraint::atomic("purpose", Operator::IsAnyOf, json!(["a", "b"])))
        );
    }

    fn round_trip(constraint: &Constraint) -> Constraint {
        let registry = registry();
        let document = registry.transform::<Value>(constraint);
        assert!(document.is_complete(), "{:?}", document.problems);

        let back = registry.transform::<Constraint>(&document.result.unwrap());
        assert!(back.problems.is_empty(), "{:?}", back.problems);
        back.result.unwrap()
    }

    #[test]
    fn test_single_element_list_operand_round_trips() {
        let any_of = Constraint::atomic("purpose", Operator::IsAnyOf, json!(["research"]));
        let eq_list = Constraint::atomic("spatial", Operator::Eq, json!(["EU"]));

        assert_eq!(round_trip(&any_of), any_of);
        assert_eq!(round_trip(&eq_list), eq_list);
    }

    #[test]
    fn test_iri_operand_round_trips() {
        let constraint = Constraint::atomic(
            "spatial",
            Operator::Eq,
            json!({"@id": "http://example.com/EU"}),
        );

        assert_eq!(round_trip(&constraint), constraint);
    }

    #[test]
    fn test_iri_operand_from_document() {
        let transformed = registry().transform::<Constraint>(&atomic_json(
            "spatial",
            "eq",
            json!([{"@id": "http://example.com/EU"}]),
        ));

        assert!(transformed.is_complete(), "{:?}", transformed.problems);
        assert_eq!(
            transformed.result,
            Some(Constraint::atomic("spatial", Operator::Eq, json!({"@id": "http://example.com/EU"})))
        );
    }

    #[test]
    fn test_set_operator_reads_single_value_as_list() {
        let transformed =
            registry().transform::<Constraint>(&atomic_json("purpose", "isNoneOf", json!("marketing")));

        assert_eq!(
            transformed.result,
            Some(Constraint::atomic("purpose", Operator::IsNoneOf, json!(["marketing"])))
        );
    }

    #[test]
    fn test_explicit_list_operand() {
        let transformed = registry().transform::<Constraint>(&atomic_json(
            "spatial",
            "eq",
            json!({"@list": [{"@value": "EU"}]}),
        ));

        assert_eq!(
            transformed.result,
            Some(Constraint::atomic("spatial", Operator::Eq, json!(["EU"])))
        );
    }

    #[test]
    fn test_plain_object_operand_is_rejected() {
        let transformed =
            registry().transform::<Constraint>(&atomic_json("spatial", "eq", json!({"k": 1})));

        assert!(transformed.result.is_none());
        let problems: Vec<String> = transformed.problems.iter().map(|p| p.to_string()).collect();
        assert_eq!(problems, vec!["rightOperand[0]: expected literal, got object"]);
    }

    #[test]
    fn test_constraint_with_rule_type_is_rejected() {
        let mut constraint = atomic_json("spatial", "eq", json!("EU"));
        constraint["@type"] = json!(crate::vocabulary::ODRL_PERMISSION_TYPE);

        let transformed = registry().transform::<Constraint>(&constraint);

        assert!(transformed.result.is_none());
        assert_eq!(
            transformed.problems[0].to_string(),
            "@type: unexpected type 'Permission', expected Constraint or LogicalConstraint"
        );
    }

    #[test]
    fn test_atomic_constraint_missing_operands() {
        let transformed = registry().transform::<Constraint>(&json!({ ODRL_LEFT_OPERAND_ATTRIBUTE: "spatial" }));

        assert!(transformed.result.is_none());
        let messages: Vec<&str> = transformed.problems.iter().map(|p| p.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "missing required attribute 'operator'",
                "missing required attribute 'rightOperand'",
            ]
        );
    }

    #[test]
    fn test_unknown_operator() {
        let transformed =
            registry().transform::<Constraint>(&atomic_json("spatial", "equals", json!("EU")));

        assert!(transformed.result.is_none());
        assert_eq!(transformed.problems.len(), 1);
        assert_eq!(transformed.problems[0].to_string(), "operator: unknown operator 'equals'");
    }

    #[test]
    fn test_logical_constraint_skips_failed_operands() {
        let constraint = json!({
            ODRL_OR_CONSTRAINT_ATTRIBUTE: [
                atomic_json("spatial", "eq", json!("EU")),
                {ODRL_LEFT_OPERAND_ATTRIBUTE: "broken"},
                atomic_json("spatial", "eq", json!("US")),
            ]
        });

        let transformed = registry().transform::<Constraint>(&constraint);

        match transformed.result {
            Some(Constraint::Or(operands)) => assert_eq!(operands.len(), 2),
            other => panic!("expected or-constraint, got {:?}", other),
        }
        assert_eq!(transformed.problems.len(), 2);
        assert!(transformed.problems.iter().all(|p| p.path.as_deref() == Some("or[1]")));
    }

    #[test]
    fn test_more_than_one_logical_list() {
        let transformed = registry().transform::<Constraint>(&json!({
            ODRL_AND_CONSTRAINT_ATTRIBUTE: [],
            ODRL_XONE_CONSTRAINT_ATTRIBUTE: []
        }));

        assert!(transformed.result.is_none());
        assert_eq!(
            transformed.problems[0].message,
            "logical constraint has more than one operand list: and, xone"
        );
    }

    #[test]
    fn test_constraint_to_document_and_back() {
        let constraint = Constraint::And(vec![
            Constraint::atomic("spatial", Operator::Eq, "EU"),
            Constraint::atomic("count", Operator::Lt, 3),
        ]);
        let registry = registry();

        let document = registry.transform::<Value>(&constraint).result.unwrap();
        let back = registry.transform::<Constraint>(&document);

        assert_eq!(back.result, Some(constraint));
        assert!(back.problems.is_empty());
    }
}
