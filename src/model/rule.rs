//! Rules: duties, permissions and prohibitions.

use serde::{Deserialize, Serialize};

use super::{Action, Constraint};

/// An obligation to perform an action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Duty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
    /// Duty that applies when this one is not fulfilled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consequence: Option<Box<Duty>>,
}

/// The ability to perform an action, possibly tied to duties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub duties: Vec<Duty>,
}

/// The inability to perform an action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prohibition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
    /// Duties to fulfil when the prohibition is infringed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remedies: Vec<Duty>,
}

/// Setters shared by every rule builder.
macro_rules! rule_builder {
    ($builder:ident => $rule:ident) => {
        impl $rule {
            pub fn builder() -> $builder {
                $builder::default()
            }
        }

        impl $builder {
            pub fn uid(mut self, uid: impl Into<String>) -> Self {
                self.inner.uid = Some(uid.into());
                self
            }

            pub fn target(mut self, target: impl Into<String>) -> Self {
                self.inner.target = Some(target.into());
                self
            }

            pub fn action(mut self, action: Action) -> Self {
                self.inner.action = Some(action);
                self
            }

            pub fn assigner(mut self, assigner: impl Into<String>) -> Self {
                self.inner.assigner = Some(assigner.into());
                self
            }

            pub fn assignee(mut self, assignee: impl Into<String>) -> Self {
                self.inner.assignee = Some(assignee.into());
                self
            }

            pub fn constraint(mut self, constraint: Constraint) -> Self {
                self.inner.constraints.push(constraint);
                self
            }

            pub fn constraints(mut self, constraints: impl IntoIterator<Item = Constraint>) -> Self {
                self.inner.constraints.extend(constraints);
                self
            }

            pub fn build(self) -> $rule {
                self.inner
            }
        }
    };
}

#[derive(Debug, Default)]
pub struct DutyBuilder {
    inner: Duty,
}

#[derive(Debug, Default)]
pub struct PermissionBuilder {
    inner: Permission,
}

#[derive(Debug, Default)]
pub struct ProhibitionBuilder {
    inner: Prohibition,
}

rule_builder!(DutyBuilder => Duty);
rule_builder!(PermissionBuilder => Permission);
rule_builder!(ProhibitionBuilder => Prohibition);

impl DutyBuilder {
    pub fn consequence(mut self, consequence: Duty) -> Self {
        self.inner.consequence = Some(Box::new(consequence));
        self
    }
}

impl PermissionBuilder {
    pub fn duty(mut self, duty: Duty) -> Self {
        self.inner.duties.push(duty);
        self
    }

    pub fn duties(mut self, duties: impl IntoIterator<Item = Duty>) -> Self {
        self.inner.duties.extend(duties);
        self
    }
}

impl ProhibitionBuilder {
    pub fn remedies(mut self, remedies: impl IntoIterator<Item = Duty>) -> Self {
        self.inner.remedies.extend(remedies);
        self
    }
}
