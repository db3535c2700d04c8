use serde::{Deserialize, Serialize};

use super::Constraint;

/// The activity a rule governs, e.g. `use` or `distribute`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub action_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included_in: Option<String>,
    /// Narrows the action itself (ODRL `refinement`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refinement: Option<Constraint>,
}

impl Action {
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            included_in: None,
            refinement: None,
        }
    }

    pub fn builder() -> ActionBuilder {
        ActionBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct ActionBuilder {
    action_type: Option<String>,
    included_in: Option<String>,
    refinement: Option<Constraint>,
}

impl ActionBuilder {
    pub fn action_type(mut self, action_type: impl Into<String>) -> Self {
        self.action_type = Some(action_type.into());
        self
    }

    pub fn included_in(mut self, included_in: impl Into<String>) -> Self {
        self.included_in = Some(included_in.into());
        self
    }

    pub fn refinement(mut self, refinement: Constraint) -> Self {
        self.refinement = Some(refinement);
        self
    }

    pub fn has_type(&self) -> bool {
        self.action_type.is_some()
    }

    /// An unset type builds as the empty string; units report the missing
    /// type as a problem before building.
    pub fn build(self) -> Action {
        Action {
            action_type: self.action_type.unwrap_or_default(),
            included_in: self.included_in,
            refinement: self.refinement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let action = Action::builder()
            .action_type("use")
            .included_in("http://www.w3.org/ns/odrl/2/use")
            .build();

        assert_eq!(action.action_type, "use");
        assert_eq!(action.included_in.as_deref(), Some("http://www.w3.org/ns/odrl/2/use"));
        assert!(action.refinement.is_none());
    }

    #[test]
    fn test_serialization_skips_unset_fields() {
        let json = serde_json::to_value(Action::new("use")).unwrap();
        assert_eq!(json, serde_json::json!({"action_type": "use"}));
    }
}
