/// Degree requirement validation module
mod config;
mod error;
mod gpa;
mod processor;
mod requisites;
mod types;
mod units;

pub use config::*;
pub use error::*;
pub use gpa::*;
pub use processor::PlanValidator;
pub use requisites::*;
pub use types::*;
pub use units::*;

/// Validates a plan against a program in one step
///
/// Convenience function that builds a [`PlanValidator`] around `lookup`.
///
/// # Arguments
/// * `plan_items` - The student's plan
/// * `program` - The program with its requirement tree
/// * `lookup` - Source of prerequisite rows for planned courses
///
/// # Returns
/// * `Ok(ValidationResult)` - Group rows, unit totals and prerequisite warnings
/// * `Err` - If the requisite lookup fails
pub fn validate_plan<L: RequisiteLookup>(
    plan_items: &[PlanItem],
    program: &Program,
    lookup: L,
) -> Result<ValidationResult, ValidationError> {
    PlanValidator::new(lookup).validate(plan_items, program)
}
