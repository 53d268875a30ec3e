//! Degree-plan validation for the MacTrack course planner.
//!
//! Checks a student's plan against a program's requirement tree and reports
//! satisfied groups, unit totals and unmet prerequisites.

pub mod db;
pub mod degree_audit;

pub use db::CatalogDb;
pub use degree_audit::{validate_plan, PlanValidator, ValidationResult};
