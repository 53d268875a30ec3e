//! Unit-weighted GPA on the McMaster 12-point scale.

use super::types::PlanItem;
use super::units::{units_from_course_number, DEFAULT_UNITS_PER_COURSE};

/// Grade validation and conversion helper
#[derive(Debug, Clone)]
pub struct GradeScale;

impl GradeScale {
    /// Grade points for a letter grade, or `None` if unrecognised.
    pub fn points(grade: &str) -> Option<f64> {
        let points = match grade.trim().to_ascii_uppercase().as_str() {
            "A+" => 12.0,
            "A" => 11.0,
            "A-" => 10.0,
            "B+" => 9.0,
            "B" => 8.0,
            "B-" => 7.0,
            "C+" => 6.0,
            "C" => 5.0,
            "C-" => 4.0,
            "D+" => 3.0,
            "D" => 2.0,
            "D-" => 1.0,
            "F" => 0.0,
            _ => return None,
        };
        Some(points)
    }
}

/// Computes a GPA over completed, graded plan items.
///
/// Each grade is weighted by the units inferred from its course number.
/// Returns `None` when nothing has a recognised grade yet.
pub fn compute_gpa(plan_items: &[PlanItem]) -> Option<f64> {
    let (points, units) = plan_items
        .iter()
        .filter(|i| i.status.is_completed())
        .filter_map(|i| {
            let grade = i.grade.as_deref()?;
            let points = GradeScale::points(grade)?;
            let units = units_from_course_number(&i.course_number, DEFAULT_UNITS_PER_COURSE);
            Some((points, units))
        })
        .fold((0.0, 0u32), |(total, weight), (points, units)| {
            (total + points * f64::from(units), weight + units)
        });

    (units > 0).then(|| points / f64::from(units))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::degree_audit::PlanStatus;

    #[test]
    fn test_grade_points() {
        assert_eq!(GradeScale::points("A+"), Some(12.0));
        assert_eq!(GradeScale::points(" b- "), Some(7.0));
        assert_eq!(GradeScale::points("F"), Some(0.0));
        assert_eq!(GradeScale::points("P"), None);
    }

    #[test]
    fn test_gpa_weighted_by_units() {
        let items = vec![
            PlanItem::new("ENGINEER", "1P13", PlanStatus::Completed).with_grade("A+"),
            PlanItem::new("MATH", "1ZA3", PlanStatus::Completed).with_grade("C"),
        ];

        // (12 * 13 + 5 * 3) / 16
        let gpa = compute_gpa(&items).unwrap();
        assert!((gpa - 171.0 / 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_gpa_skips_ungraded_and_pending() {
        let items = vec![
            PlanItem::new("MATH", "1ZA3", PlanStatus::Completed).with_grade("B"),
            PlanItem::new("MATH", "1ZB3", PlanStatus::Completed),
            PlanItem::new("MATH", "1ZC3", PlanStatus::Completed).with_grade("COM"),
            PlanItem::new("MATH", "2Z03", PlanStatus::Planned).with_grade("A+"),
        ];

        assert_eq!(compute_gpa(&items), Some(8.0));
    }

    #[test]
    fn test_gpa_none_without_grades() {
        assert_eq!(compute_gpa(&[]), None);
        let items = vec![PlanItem::new("MATH", "1ZA3", PlanStatus::InProgress)];
        assert_eq!(compute_gpa(&items), None);
    }
}
