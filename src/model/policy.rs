use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Duty, Permission, Prohibition};
use crate::vocabulary::{ODRL_POLICY_TYPE_AGREEMENT, ODRL_POLICY_TYPE_OFFER, ODRL_POLICY_TYPE_SET};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyType {
    #[default]
    Set,
    Offer,
    Agreement,
}

impl PolicyType {
    pub fn type_iri(self) -> &'static str {
        match self {
            PolicyType::Set => ODRL_POLICY_TYPE_SET,
            PolicyType::Offer => ODRL_POLICY_TYPE_OFFER,
            PolicyType::Agreement => ODRL_POLICY_TYPE_AGREEMENT,
        }
    }

    /// Resolve an expanded or prefixed policy type name.
    pub fn from_type_name(name: &str) -> Option<Self> {
        [PolicyType::Set, PolicyType::Offer, PolicyType::Agreement]
            .into_iter()
            .find(|t| {
                let iri = t.type_iri();
                name == iri || name == format!("odrl:{}", crate::vocabulary::local_name(iri))
            })
    }
}

impl fmt::Display for PolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_iri())
    }
}

/// A set of rules issued by an assigner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default)]
    pub policy_type: PolicyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<Permission>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prohibitions: Vec<Prohibition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub obligations: Vec<Duty>,
}

impl Policy {
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct PolicyBuilder {
    inner: Policy,
}

impl PolicyBuilder {
    pub fn uid(mut self, uid: impl Into<String>) -> Self {
        self.inner.uid = Some(uid.into());
        self
    }

    pub fn policy_type(mut self, policy_type: PolicyType) -> Self {
        self.inner.policy_type = policy_type;
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.inner.target = Some(target.into());
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

    pub fn permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.inner.permissions.extend(permissions);
        self
    }

    pub fn prohibitions(mut self, prohibitions: impl IntoIterator<Item = Prohibition>) -> Self {
        self.inner.prohibitions.extend(prohibitions);
        self
    }

    pub fn obligations(mut self, obligations: impl IntoIterator<Item = Duty>) -> Self {
        self.inner.obligations.extend(obligations);
        self
    }

    pub fn build(self) -> Policy {
        self.inner
    }
}
