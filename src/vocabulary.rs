//! ODRL attribute and type names in expanded IRI form.

pub const ODRL_SCHEMA: &str = "http://www.w3.org/ns/odrl/2/";

macro_rules! odrl {
    ($($name:ident => $term:literal),* $(,)?) => {
        $(pub const $name: &str = concat!("http://www.w3.org/ns/odrl/2/", $term);)*
    };
}

// Policy types
odrl! {
    ODRL_POLICY_TYPE_SET => "Set",
    ODRL_POLICY_TYPE_OFFER => "Offer",
    ODRL_POLICY_TYPE_AGREEMENT => "Agreement",
}

// Rule and node types
odrl! {
    ODRL_PERMISSION_TYPE => "Permission",
    ODRL_PROHIBITION_TYPE => "Prohibition",
    ODRL_DUTY_TYPE => "Duty",
    ODRL_ACTION_TYPE => "Action",
    ODRL_CONSTRAINT_TYPE => "Constraint",
    ODRL_LOGICAL_CONSTRAINT_TYPE => "LogicalConstraint",
}

// Policy attributes
odrl! {
    ODRL_PERMISSION_ATTRIBUTE => "permission",
    ODRL_PROHIBITION_ATTRIBUTE => "prohibition",
    ODRL_OBLIGATION_ATTRIBUTE => "obligation",
}

// Rule attributes
odrl! {
    ODRL_TARGET_ATTRIBUTE => "target",
    ODRL_ASSIGNER_ATTRIBUTE => "assigner",
    ODRL_ASSIGNEE_ATTRIBUTE => "assignee",
    ODRL_ACTION_ATTRIBUTE => "action",
    ODRL_CONSTRAINT_ATTRIBUTE => "constraint",
    ODRL_DUTY_ATTRIBUTE => "duty",
    ODRL_REMEDY_ATTRIBUTE => "remedy",
    ODRL_CONSEQUENCE_ATTRIBUTE => "consequence",
}

// Action attributes
odrl! {
    ODRL_ACTION_TYPE_ATTRIBUTE => "type",
    ODRL_INCLUDED_IN_ATTRIBUTE => "includedIn",
    ODRL_REFINEMENT_ATTRIBUTE => "refinement",
}

// Constraint attributes
odrl! {
    ODRL_LEFT_OPERAND_ATTRIBUTE => "leftOperand",
    ODRL_OPERATOR_ATTRIBUTE => "operator",
    ODRL_RIGHT_OPERAND_ATTRIBUTE => "rightOperand",
    ODRL_AND_CONSTRAINT_ATTRIBUTE => "and",
    ODRL_OR_CONSTRAINT_ATTRIBUTE => "or",
    ODRL_XONE_CONSTRAINT_ATTRIBUTE => "xone",
}

/// Strip the ODRL namespace from an IRI, if present.
pub fn local_name(iri: &str) -> &str {
    iri.strip_prefix(ODRL_SCHEMA).unwrap_or(iri)
}

/// Whether `name` denotes the ODRL term `iri`, either as the full IRI or in
/// the `odrl:` prefixed form.
pub fn is_term(name: &str, iri: &str) -> bool {
    name == iri
        || (iri.starts_with(ODRL_SCHEMA) && name.strip_prefix("odrl:") == Some(local_name(iri)))
}
