//! Policy domain model.
//!
//! Every domain object is an immutable value assembled through an explicit
//! builder. Builders accumulate fields while a conversion unit walks a
//! document and `build()` never fails: a value with optional fields unset is
//! still a complete result.

pub mod action;
pub mod constraint;
pub mod policy;
pub mod rule;

pub use action::{Action, ActionBuilder};
pub use constraint::{AtomicConstraint, Constraint, Operator, UnknownOperator};
pub use policy::{Policy, PolicyBuilder, PolicyType};
pub use rule::{
    Duty, DutyBuilder, Permission, PermissionBuilder, Prohibition, ProhibitionBuilder,
};
