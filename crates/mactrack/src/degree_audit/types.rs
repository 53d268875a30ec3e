/// Types for plan validation input and output
use serde::{Deserialize, Serialize};
use std::fmt;

/// One course a student has placed in their plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_item_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_term_id: Option<i64>,

    pub subject: String,
    pub course_number: String,
    pub status: PlanStatus,

    /// Only meaningful when `status` is [`PlanStatus::Completed`]
    #[serde(default)]
    pub grade: Option<String>,

    #[serde(default)]
    pub note: Option<String>,
}

impl PlanItem {
    /// Creates a plan item with no grade or note.
    pub fn new(subject: &str, course_number: &str, status: PlanStatus) -> Self {
        Self {
            plan_item_id: None,
            plan_term_id: None,
            subject: subject.to_string(),
            course_number: course_number.to_string(),
            status,
            grade: None,
            note: None,
        }
    }

    /// Sets the grade (builder style).
    pub fn with_grade(mut self, grade: &str) -> Self {
        self.grade = Some(grade.to_string());
        self
    }
}

/// Where a plan item sits in the student's progression.
///
/// Parsed case-insensitively. Anything unrecognised is kept verbatim so a
/// drifting status column never breaks validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlanStatus {
    Planned,
    InProgress,
    Completed,
    Dropped,
    Unknown(String),
}

impl PlanStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, PlanStatus::Completed)
    }

    /// Planned and in-progress courses are the ones checked for prerequisites.
    pub fn is_pending(&self) -> bool {
        matches!(self, PlanStatus::Planned | PlanStatus::InProgress)
    }

    pub fn as_str(&self) -> &str {
        match self {
            PlanStatus::Planned => "PLANNED",
            PlanStatus::InProgress => "IN_PROGRESS",
            PlanStatus::Completed => "COMPLETED",
            PlanStatus::Dropped => "DROPPED",
            PlanStatus::Unknown(raw) => raw,
        }
    }
}

impl From<String> for PlanStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PLANNED" => PlanStatus::Planned,
            "IN_PROGRESS" => PlanStatus::InProgress,
            "COMPLETED" => PlanStatus::Completed,
            "DROPPED" => PlanStatus::Dropped,
            _ => PlanStatus::Unknown(raw),
        }
    }
}

impl From<&str> for PlanStatus {
    fn from(raw: &str) -> Self {
        PlanStatus::from(raw.to_string())
    }
}

impl From<PlanStatus> for String {
    fn from(status: PlanStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A degree program with its full requirement tree
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Program {
    pub program_id: i64,

    #[serde(default)]
    pub poid: Option<i64>,

    pub name: String,

    #[serde(default)]
    pub degree_type: String,

    #[serde(default)]
    pub total_units: Option<u32>,

    #[serde(default)]
    pub catalog_year: Option<String>,

    /// Root groups in display order
    #[serde(default)]
    pub groups: Vec<RequirementGroup>,
}

/// A node in a program's requirement tree (e.g. "Level I: 30 Units").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequirementGroup {
    pub heading: String,

    #[serde(default)]
    pub heading_level: u8,

    #[serde(default)]
    pub units_required: Option<u32>,

    #[serde(default)]
    pub courses_required: Option<u32>,

    /// Placeholder for "any elective"; carries no enumerable course list
    #[serde(default)]
    pub is_elective: bool,

    #[serde(default)]
    pub is_container: bool,

    #[serde(default)]
    pub courses: Vec<CourseSlot>,

    #[serde(default)]
    pub children: Vec<RequirementGroup>,
}

impl RequirementGroup {
    /// Containers delegate to their children and produce no result row.
    ///
    /// A group with children but no course slots is treated as a container
    /// even when the flag is unset.
    pub fn acts_as_container(&self) -> bool {
        self.is_container || (self.courses.is_empty() && !self.children.is_empty())
    }
}

/// One entry in a requirement group's course list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseSlot {
    /// e.g. "COMPSCI 2C03"; absent for adhoc entries
    #[serde(default)]
    pub course_code: Option<String>,

    #[serde(default)]
    pub course_name: Option<String>,

    /// Starts (or continues) an OR-chain with the following slot
    #[serde(default)]
    pub is_or_with_next: bool,

    /// Free text such as "List G electives"
    #[serde(default)]
    pub adhoc_text: Option<String>,
}

impl CourseSlot {
    pub fn course(code: &str) -> Self {
        Self {
            course_code: Some(code.to_string()),
            ..Self::default()
        }
    }

    pub fn or_with_next(code: &str) -> Self {
        Self {
            course_code: Some(code.to_string()),
            is_or_with_next: true,
            ..Self::default()
        }
    }

    pub fn adhoc(text: &str) -> Self {
        Self {
            adhoc_text: Some(text.to_string()),
            ..Self::default()
        }
    }

    /// The trimmed course code, or `None` for adhoc/blank slots.
    pub fn code(&self) -> Option<&str> {
        self.course_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Result of validating a plan against a program
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub total_units_required: u32,
    pub total_units_completed: u32,
    pub units_remaining: u32,
    pub groups: Vec<GroupResult>,
    pub prereq_warnings: Vec<PrereqWarning>,
}

/// One non-container requirement group, in tree pre-order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupResult {
    pub heading: String,
    pub satisfied: bool,
    pub units_completed: u32,
    pub units_required: u32,
    pub missing_courses: Vec<String>,
}

/// A planned course whose prerequisites are not met
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrereqWarning {
    pub course: String,
    /// Every prerequisite option joined by `" or "`
    pub missing_prereq: String,
}
