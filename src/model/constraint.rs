use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::vocabulary::ODRL_SCHEMA;

/// Comparison operator of an atomic constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    Eq,
    Neq,
    Gt,
    Gteq,
    Lt,
    Lteq,
    IsA,
    HasPart,
    IsPartOf,
    IsAllOf,
    IsAnyOf,
    IsNoneOf,
}

impl Operator {
    pub const ALL: [Operator; 12] = [
        Operator::Eq,
        Operator::Neq,
        Operator::Gt,
        Operator::Gteq,
        Operator::Lt,
        Operator::Lteq,
        Operator::IsA,
        Operator::HasPart,
        Operator::IsPartOf,
        Operator::IsAllOf,
        Operator::IsAnyOf,
        Operator::IsNoneOf,
    ];

    /// ODRL local name, e.g. `gteq`.
    pub fn name(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Gt => "gt",
            Operator::Gteq => "gteq",
            Operator::Lt => "lt",
            Operator::Lteq => "lteq",
            Operator::IsA => "isA",
            Operator::HasPart => "hasPart",
            Operator::IsPartOf => "isPartOf",
            Operator::IsAllOf => "isAllOf",
            Operator::IsAnyOf => "isAnyOf",
            Operator::IsNoneOf => "isNoneOf",
        }
    }

    pub fn iri(self) -> String {
        format!("{}{}", ODRL_SCHEMA, self.name())
    }

    /// Set operators, whose right operand is always a list.
    pub fn takes_list(self) -> bool {
        matches!(self, Operator::IsAllOf | Operator::IsAnyOf | Operator::IsNoneOf)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error returned when an operator name is not part of the ODRL vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperator(pub String);

impl fmt::Display for UnknownOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown operator '{}'", self.0)
    }
}

impl std::error::Error for UnknownOperator {}

impl FromStr for Operator {
    type Err = UnknownOperator;

    /// Accepts the local name (`eq`), the prefixed form (`odrl:eq`) and the
    /// full IRI.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let local = s
            .strip_prefix(ODRL_SCHEMA)
            .or_else(|| s.strip_prefix("odrl:"))
            .unwrap_or(s);

        Operator::ALL
            .into_iter()
            .find(|op| op.name() == local)
            .ok_or_else(|| UnknownOperator(s.to_string()))
    }
}

/// `leftOperand operator rightOperand`, e.g. `spatial eq "EU"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomicConstraint {
    pub left_operand: String,
    pub operator: Operator,
    /// A literal, an IRI reference `{"@id": iri}`, or an array of those.
    pub right_operand: Value,
}

/// A condition restricting a rule or an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Constraint {
    Atomic(AtomicConstraint),
    /// All operands must hold.
    And(Vec<Constraint>),
    /// At least one operand must hold.
    Or(Vec<Constraint>),
    /// Exactly one operand must hold.
    Xone(Vec<Constraint>),
}

impl Constraint {
    pub fn atomic(
        left_operand: impl Into<String>,
        operator: Operator,
        right_operand: impl Into<Value>,
    ) -> Self {
        Constraint::Atomic(AtomicConstraint {
            left_operand: left_operand.into(),
            operator,
            right_operand: right_operand.into(),
        })
    }

    /// Operands of a logical constraint; empty for atomic ones.
    pub fn operands(&self) -> &[Constraint] {
        match self {
            Constraint::Atomic(_) => &[],
            Constraint::And(c) | Constraint::Or(c) | Constraint::Xone(c) => c,
        }
    }

    pub fn is_logical(&self) -> bool {
        !matches!(self, Constraint::Atomic(_))
    }
}
