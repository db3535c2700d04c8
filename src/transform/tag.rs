//! Finite set of type tags the registry routes on.
//!
//! Conversion units are keyed by `(input tag, output tag)`. Document inputs
//! are tagged by their runtime JSON shape, domain inputs by their type.

use std::fmt;

use serde_json::Value;

use crate::model::{Action, Constraint, Duty, Permission, Policy, Prohibition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeTag {
    JsonObject,
    JsonArray,
    JsonString,
    JsonNumber,
    JsonBool,
    JsonNull,
    Action,
    Constraint,
    Duty,
    Permission,
    Prohibition,
    Policy,
}

impl TypeTag {
    /// Runtime tag of a document node.
    pub fn of_document(value: &Value) -> Self {
        match value {
            Value::Object(_) => TypeTag::JsonObject,
            Value::Array(_) => TypeTag::JsonArray,
            Value::String(_) => TypeTag::JsonString,
            Value::Number(_) => TypeTag::JsonNumber,
            Value::Bool(_) => TypeTag::JsonBool,
            Value::Null => TypeTag::JsonNull,
        }
    }

    pub fn is_document(self) -> bool {
        matches!(
            self,
            TypeTag::JsonObject
                | TypeTag::JsonArray
                | TypeTag::JsonString
                | TypeTag::JsonNumber
                | TypeTag::JsonBool
                | TypeTag::JsonNull
        )
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeTag::JsonObject => "JsonObject",
            TypeTag::JsonArray => "JsonArray",
            TypeTag::JsonString => "JsonString",
            TypeTag::JsonNumber => "JsonNumber",
            TypeTag::JsonBool => "JsonBool",
            TypeTag::JsonNull => "JsonNull",
            TypeTag::Action => "Action",
            TypeTag::Constraint => "Constraint",
            TypeTag::Duty => "Duty",
            TypeTag::Permission => "Permission",
            TypeTag::Prohibition => "Prohibition",
            TypeTag::Policy => "Policy",
        };
        f.write_str(name)
    }
}

/// Borrowed view of anything the registry can route.
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
    Document(&'a Value),
    Action(&'a Action),
    Constraint(&'a Constraint),
    Duty(&'a Duty),
    Permission(&'a Permission),
    Prohibition(&'a Prohibition),
    Policy(&'a Policy),
}

impl Subject<'_> {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Subject::Document(value) => TypeTag::of_document(value),
            Subject::Action(_) => TypeTag::Action,
            Subject::Constraint(_) => TypeTag::Constraint,
            Subject::Duty(_) => TypeTag::Duty,
            Subject::Permission(_) => TypeTag::Permission,
            Subject::Prohibition(_) => TypeTag::Prohibition,
            Subject::Policy(_) => TypeTag::Policy,
        }
    }
}

/// Owned result of a conversion unit.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Document(Value),
    Action(Action),
    Constraint(Constraint),
    Duty(Duty),
    Permission(Permission),
    Prohibition(Prohibition),
    Policy(Policy),
}

impl Payload {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Payload::Document(value) => TypeTag::of_document(value),
            Payload::Action(_) => TypeTag::Action,
            Payload::Constraint(_) => TypeTag::Constraint,
            Payload::Duty(_) => TypeTag::Duty,
            Payload::Permission(_) => TypeTag::Permission,
            Payload::Prohibition(_) => TypeTag::Prohibition,
            Payload::Policy(_) => TypeTag::Policy,
        }
    }
}

/// A Rust type that can be routed through the registry.
pub trait Transformable: Sized {
    /// Tag used when this type is the requested output.
    ///
    /// Documents produced from domain objects are always JSON objects.
    const TAG: TypeTag;

    /// Whether a unit declaring `tag` as its input can receive this type.
    fn accepts(tag: TypeTag) -> bool {
        tag == Self::TAG
    }

    fn subject(&self) -> Subject<'_>;

    fn from_subject(subject: Subject<'_>) -> Option<&Self>;

    fn into_payload(self) -> Payload;

    fn from_payload(payload: Payload) -> Option<Self>;
}

impl Transformable for Value {
    const TAG: TypeTag = TypeTag::JsonObject;

    fn accepts(tag: TypeTag) -> bool {
        tag.is_document()
    }

    fn subject(&self) -> Subject<'_> {
        Subject::Document(self)
    }

    fn from_subject(subject: Subject<'_>) -> Option<&Self> {
        match subject {
            Subject::Document(value) => Some(value),
            _ => None,
        }
    }

    fn into_payload(self) -> Payload {
        Payload::Document(self)
    }

    fn from_payload(payload: Payload) -> Option<Self> {
        match payload {
            Payload::Document(value) => Some(value),
            _ => None,
        }
    }
}

macro_rules! domain_transformable {
    ($($ty:ident),* $(,)?) => {
        $(
            impl Transformable for $ty {
                const TAG: TypeTag = TypeTag::$ty;

                fn subject(&self) -> Subject<'_> {
                    Subject::$ty(self)
                }

                fn from_subject(subject: Subject<'_>) -> Option<&Self> {
                    match subject {
                        Subject::$ty(value) => Some(value),
                        _ => None,
                    }
                }

                fn into_payload(self) -> Payload {
                    Payload::$ty(self)
                }

                fn from_payload(payload: Payload) -> Option<Self> {
                    match payload {
                        Payload::$ty(value) => Some(value),
                        _ => None,
                    }
                }
            }
        )*
    };
}

domain_transformable!(Action, Constraint, Duty, Permission, Prohibition, Policy);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_tags() {
        assert_eq!(TypeTag::of_document(&json!({})), TypeTag::JsonObject);
        assert_eq!(TypeTag::of_document(&json!([])), TypeTag::JsonArray);
        assert_eq!(TypeTag::of_document(&json!("a")), TypeTag::JsonString);
        assert_eq!(TypeTag::of_document(&json!(1.5)), TypeTag::JsonNumber);
        assert_eq!(TypeTag::of_document(&json!(false)), TypeTag::JsonBool);
        assert_eq!(TypeTag::of_document(&json!(null)), TypeTag::JsonNull);
    }

    #[test]
    fn test_value_accepts_only_document_tags() {
        assert!(Value::accepts(TypeTag::JsonString));
        assert!(!Value::accepts(TypeTag::Duty));
        assert!(Duty::accepts(TypeTag::Duty));
        assert!(!Duty::accepts(TypeTag::JsonObject));
    }

    #[test]
    fn test_subject_round_trip() {
        let action = Action::new("use");
        let subject = action.subject();

        assert_eq!(subject.type_tag(), TypeTag::Action);
        assert_eq!(Action::from_subject(subject), Some(&action));
        assert_eq!(Duty::from_subject(subject), None);
    }

    #[test]
    fn test_payload_extraction() {
        let payload = Action::new("use").into_payload();
        assert_eq!(payload.type_tag(), TypeTag::Action);
        assert_eq!(Constraint::from_payload(payload.clone()), None);
        assert_eq!(Action::from_payload(payload), Some(Action::new("use")));
    }
}
