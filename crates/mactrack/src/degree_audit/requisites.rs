//! Requisite lookup: the seam between the validator and catalog storage.

use super::error::RequisiteError;
use super::units::course_key;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

/// Relationship between a course and one of its requisites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequisiteKind {
    Prereq,
    Coreq,
    Antireq,
}

impl RequisiteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequisiteKind::Prereq => "PREREQ",
            RequisiteKind::Coreq => "COREQ",
            RequisiteKind::Antireq => "ANTIREQ",
        }
    }
}

impl FromStr for RequisiteKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PREREQ" => Ok(RequisiteKind::Prereq),
            "COREQ" => Ok(RequisiteKind::Coreq),
            "ANTIREQ" => Ok(RequisiteKind::Antireq),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for RequisiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single requisite of some course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequisiteRow {
    pub kind: RequisiteKind,
    pub req_subject: String,
    pub req_course_number: String,
}

impl RequisiteRow {
    pub fn new(kind: RequisiteKind, req_subject: &str, req_course_number: &str) -> Self {
        Self {
            kind,
            req_subject: req_subject.to_string(),
            req_course_number: req_course_number.to_string(),
        }
    }

    /// Normalized "SUBJECT NUMBER" of the required course.
    pub fn code(&self) -> String {
        course_key(&self.req_subject, &self.req_course_number)
    }
}

/// One entry of the scraped requisite dump.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequisiteRecord {
    pub subject: String,
    pub course_number: String,
    pub req_subject: String,
    pub req_course_number: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl RequisiteRecord {
    /// Converts to a lookup row, rejecting unknown kinds.
    pub fn to_row(&self) -> Result<RequisiteRow, RequisiteError> {
        let kind = self
            .kind
            .parse::<RequisiteKind>()
            .map_err(|kind| RequisiteError::UnknownKind {
                kind,
                course: course_key(&self.subject, &self.course_number),
            })?;

        Ok(RequisiteRow::new(kind, &self.req_subject, &self.req_course_number))
    }
}

/// Source of requisite rows for a course.
///
/// Implementations return every row (PREREQ, COREQ and ANTIREQ); callers
/// filter by kind.
pub trait RequisiteLookup {
    type Error: std::error::Error + Send + Sync + 'static;

    fn requisites(
        &self,
        subject: &str,
        course_number: &str,
    ) -> Result<Vec<RequisiteRow>, Self::Error>;
}

impl<T: RequisiteLookup + ?Sized> RequisiteLookup for &T {
    type Error = T::Error;

    fn requisites(
        &self,
        subject: &str,
        course_number: &str,
    ) -> Result<Vec<RequisiteRow>, Self::Error> {
        (**self).requisites(subject, course_number)
    }
}

/// Lookup that knows no requisites at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRequisites;

impl RequisiteLookup for NoRequisites {
    type Error = Infallible;

    fn requisites(&self, _: &str, _: &str) -> Result<Vec<RequisiteRow>, Self::Error> {
        Ok(Vec::new())
    }
}

/// In-memory requisite table keyed by normalized course code.
#[derive(Debug, Clone, Default)]
pub struct RequisiteTable {
    rows: HashMap<String, Vec<RequisiteRow>>,
}

impl RequisiteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a requisite for `subject course_number`.
    pub fn insert(&mut self, subject: &str, course_number: &str, row: RequisiteRow) {
        self.rows
            .entry(course_key(subject, course_number))
            .or_default()
            .push(row);
    }

    /// Builds a table from dump records, skipping rows with an unknown kind.
    pub fn from_records(records: &[RequisiteRecord]) -> Self {
        let mut table = Self::new();

        for record in records {
            match record.to_row() {
                Ok(row) => table.insert(&record.subject, &record.course_number, row),
                Err(e) => warn!("Skipping requisite: {}", e),
            }
        }

        table
    }

    pub fn from_json_str(json: &str) -> Result<Self, RequisiteError> {
        let records: Vec<RequisiteRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(&records))
    }

    /// Loads a requisite dump (JSON array) from disk.
    pub fn from_path(path: &Path) -> Result<Self, RequisiteError> {
        let content = fs::read_to_string(path)?;
        let table = Self::from_json_str(&content)?;

        info!(
            "Loaded requisites for {} courses from {}",
            table.len(),
            path.display()
        );

        Ok(table)
    }

    /// Number of courses with at least one requisite.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl RequisiteLookup for RequisiteTable {
    type Error = Infallible;

    fn requisites(
        &self,
        subject: &str,
        course_number: &str,
    ) -> Result<Vec<RequisiteRow>, Self::Error> {
        Ok(self
            .rows
            .get(&course_key(subject, course_number))
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("prereq".parse::<RequisiteKind>(), Ok(RequisiteKind::Prereq));
        assert_eq!(" COREQ ".parse::<RequisiteKind>(), Ok(RequisiteKind::Coreq));
        assert_eq!("Antireq".parse::<RequisiteKind>(), Ok(RequisiteKind::Antireq));
        assert!("RECOMMENDED".parse::<RequisiteKind>().is_err());
    }

    #[test]
    fn test_table_from_json_dump() {
        let json = r#"[
            {"subject":"COMPSCI","course_number":"2C03","req_subject":"COMPSCI","req_course_number":"1MD3","kind":"PREREQ"},
            {"subject":"COMPSCI","course_number":"2C03","req_subject":"COMPSCI","req_course_number":"1XC3","kind":"PREREQ","note":"or equivalent"},
            {"subject":"COMPSCI","course_number":"2C03","req_subject":"SFWRENG","req_course_number":"2C03","kind":"ANTIREQ"},
            {"subject":"COMPSCI","course_number":"2C03","req_subject":"MATH","req_course_number":"1ZA3","kind":"SUGGESTED"}
        ]"#;

        let table = RequisiteTable::from_json_str(json).unwrap();
        let rows = table.requisites(" COMPSCI", "2C03 ").unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].code(), "COMPSCI 1MD3");
        assert_eq!(rows[2].kind, RequisiteKind::Antireq);
    }

    #[test]
    fn test_table_unknown_course_is_empty() {
        let table = RequisiteTable::new();
        assert!(table.requisites("HIST", "1A03").unwrap().is_empty());
        assert!(NoRequisites.requisites("HIST", "1A03").unwrap().is_empty());
    }

    #[test]
    fn test_record_rejects_unknown_kind() {
        let record = RequisiteRecord {
            subject: "CS".to_string(),
            course_number: "2C03".to_string(),
            req_subject: "CS".to_string(),
            req_course_number: "1A03".to_string(),
            kind: "MAYBE".to_string(),
            note: None,
        };

        assert!(matches!(
            record.to_row(),
            Err(RequisiteError::UnknownKind { ref course, .. }) if course == "CS 2C03"
        ));
    }
}
