/// Plan validation against a program's requirement tree
use super::error::ValidationError;
use super::requisites::{RequisiteKind, RequisiteLookup};
use super::types::*;
use super::units::{course_key, normalize_code, units_for_code, DEFAULT_UNITS_PER_COURSE};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Validates student plans, checking prerequisites through a requisite lookup
pub struct PlanValidator<L> {
    lookup: L,
}

impl<L: RequisiteLookup> PlanValidator<L> {
    /// Creates a new validator backed by the given lookup
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Validates a student's plan against a program
    ///
    /// # Arguments
    /// * `plan_items` - Every course in the student's plan, in scan order
    /// * `program` - The program with its requirement tree
    ///
    /// # Returns
    /// * `Ok(ValidationResult)` - Group rows in tree pre-order and prerequisite warnings
    /// * `Err` - If a requisite lookup fails; no partial result is returned
    pub fn validate(
        &self,
        plan_items: &[PlanItem],
        program: &Program,
    ) -> Result<ValidationResult, ValidationError> {
        let completed = completed_courses(plan_items);
        let prereq_warnings = self.compute_prereq_warnings(plan_items, &completed)?;

        let mut walk = TreeWalk::new(&completed);
        for root in &program.groups {
            walk.visit(root);
        }

        let units_remaining = walk.total_required.saturating_sub(walk.total_completed);

        info!(
            "Validated plan ({} items) against program {} ({}): {} groups, {} prereq warnings, {}/{} units",
            plan_items.len(),
            program.program_id,
            program.name,
            walk.groups.len(),
            prereq_warnings.len(),
            walk.total_completed,
            walk.total_required
        );

        Ok(ValidationResult {
            total_units_required: walk.total_required,
            total_units_completed: walk.total_completed,
            units_remaining,
            groups: walk.groups,
            prereq_warnings,
        })
    }

    /// Finds planned/in-progress courses with no completed prerequisite.
    ///
    /// Prerequisite rows of one course are alternatives: any single completed
    /// option satisfies the course.
    fn compute_prereq_warnings(
        &self,
        plan_items: &[PlanItem],
        completed: &HashSet<String>,
    ) -> Result<Vec<PrereqWarning>, ValidationError> {
        let mut warnings = Vec::new();

        for item in plan_items.iter().filter(|i| i.status.is_pending()) {
            let course = course_key(&item.subject, &item.course_number);

            let rows = self
                .lookup
                .requisites(item.subject.trim(), item.course_number.trim())
                .map_err(|e| {
                    warn!("Requisite lookup failed for {}: {}", course, e);
                    ValidationError::lookup(course.clone(), e)
                })?;

            let prereqs: Vec<String> = rows
                .iter()
                .filter(|r| r.kind == RequisiteKind::Prereq)
                .map(|r| r.code())
                .collect();

            if prereqs.is_empty() || prereqs.iter().any(|p| completed.contains(p)) {
                continue;
            }

            debug!("{} is missing prerequisites: {}", course, prereqs.join(" or "));

            warnings.push(PrereqWarning {
                course,
                missing_prereq: prereqs.join(" or "),
            });
        }

        Ok(warnings)
    }
}

/// Collects normalized codes of every completed plan item
fn completed_courses(plan_items: &[PlanItem]) -> HashSet<String> {
    plan_items
        .iter()
        .filter(|i| i.status.is_completed())
        .map(|i| course_key(&i.subject, &i.course_number))
        .collect()
}

/// Units a group requires: the explicit threshold, else courses x default.
///
/// The courses-required fallback assumes every course is worth the default
/// even though completed courses are credited with their real units.
fn required_units(group: &RequirementGroup) -> u32 {
    match (group.units_required, group.courses_required) {
        (Some(units), _) => units,
        (None, Some(courses)) => courses.saturating_mul(DEFAULT_UNITS_PER_COURSE),
        (None, None) => 0,
    }
}

/// Running state of one pre-order walk
struct TreeWalk<'a> {
    completed: &'a HashSet<String>,
    total_required: u32,
    total_completed: u32,
    groups: Vec<GroupResult>,
}

impl<'a> TreeWalk<'a> {
    fn new(completed: &'a HashSet<String>) -> Self {
        Self {
            completed,
            total_required: 0,
            total_completed: 0,
            groups: Vec::new(),
        }
    }

    fn visit(&mut self, group: &RequirementGroup) {
        if group.acts_as_container() {
            for child in &group.children {
                self.visit(child);
            }
            return;
        }

        let units_required = required_units(group);
        if units_required > 0 {
            self.total_required = self.total_required.saturating_add(units_required);
        }

        let (units_completed, missing_courses) = self.score_slots(&group.courses);

        // Without a threshold (plain elective placeholders) only missing courses count
        let satisfied = if units_required == 0 {
            missing_courses.is_empty()
        } else {
            units_completed >= units_required
        };

        if units_completed > 0 {
            self.total_completed = self.total_completed.saturating_add(units_completed);
        }

        debug!(
            "Group '{}': {}/{} units, {} missing, satisfied={}",
            group.heading,
            units_completed,
            units_required,
            missing_courses.len(),
            satisfied
        );

        self.groups.push(GroupResult {
            heading: group.heading.clone(),
            satisfied,
            units_completed,
            units_required,
            missing_courses,
        });

        // Leaf groups may still carry children
        for child in &group.children {
            self.visit(child);
        }
    }

    /// Walks slots left to right, resolving OR-chains.
    ///
    /// Returns the completed units and the missing course codes.
    fn score_slots(&self, slots: &[CourseSlot]) -> (u32, Vec<String>) {
        let mut units: u32 = 0;
        let mut missing = Vec::new();
        let mut i = 0;

        while i < slots.len() {
            if slots[i].is_or_with_next {
                // Chain runs through the first slot without the flag
                let mut end = i;
                while end + 1 < slots.len() && slots[end].is_or_with_next {
                    end += 1;
                }
                let chain: Vec<String> = slots[i..=end]
                    .iter()
                    .filter_map(CourseSlot::code)
                    .map(normalize_code)
                    .collect();

                match chain.iter().position(|code| self.completed.contains(code)) {
                    Some(matched) => {
                        units = units.saturating_add(units_for_code(&chain[matched]))
                    }
                    None => missing.extend(chain),
                }

                i = end + 1;
                continue;
            }

            if let Some(code) = slots[i].code().map(normalize_code) {
                if self.completed.contains(&code) {
                    units = units.saturating_add(units_for_code(&code));
                } else {
                    missing.push(code);
                }
            }

            i += 1;
        }

        (units, missing)
    }
}
