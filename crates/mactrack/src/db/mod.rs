/// Database module for requisite data backing prerequisite checks

mod types;

pub use types::DbRequisite;

use crate::degree_audit::{RequisiteKind, RequisiteLookup, RequisiteRecord, RequisiteRow};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, info, warn};

const SCHEMA_SQL: &str = include_str!("../../../../sql/init_catalog.sql");

/// Errors from the catalog database.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A previous holder of the connection panicked
    #[error("Database connection lock poisoned")]
    Poisoned,

    #[error("Invalid requisite kind '{kind}' in row {requisite_id}")]
    InvalidKind { requisite_id: i64, kind: String },
}

pub struct CatalogDb {
    db: Mutex<Connection>,
}

impl CatalogDb {
    /// Opens (or creates) the database at `path` and initializes the schema
    pub fn open(path: &Path) -> Result<Self, DbError> {
        info!("Opening catalog database at {}", path.display());
        Self::init(Connection::open(path)?)
    }

    /// Opens a private in-memory database
    pub fn open_in_memory() -> Result<Self, DbError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, DbError> {
        conn.execute_batch(SCHEMA_SQL)?;

        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, DbError> {
        self.db.lock().map_err(|_| DbError::Poisoned)
    }

    /// Gets raw requisite rows for a course, ordered by kind then required course
    pub fn requisite_rows(
        &self,
        subject: &str,
        course_number: &str,
    ) -> Result<Vec<DbRequisite>, DbError> {
        let db = self.conn()?;
        let mut stmt = db.prepare(
            "SELECT requisite_id, subject, course_number, req_subject, req_course_number, kind, note
             FROM requisites
             WHERE subject = ?1 AND course_number = ?2
             ORDER BY kind, req_subject, req_course_number",
        )?;

        let rows = stmt.query_map(params![subject.trim(), course_number.trim()], |row| {
            Ok(DbRequisite {
                requisite_id: row.get(0)?,
                subject: row.get(1)?,
                course_number: row.get(2)?,
                req_subject: row.get(3)?,
                req_course_number: row.get(4)?,
                kind: row.get(5)?,
                note: row.get(6)?,
            })
        })?;

        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Gets requisite rows for a course in lookup form
    pub fn requisites_for(
        &self,
        subject: &str,
        course_number: &str,
    ) -> Result<Vec<RequisiteRow>, DbError> {
        self.requisite_rows(subject, course_number)?
            .into_iter()
            .map(|r| -> Result<RequisiteRow, DbError> {
                let kind = r.kind.parse::<RequisiteKind>().map_err(|kind| DbError::InvalidKind {
                    requisite_id: r.requisite_id,
                    kind,
                })?;
                Ok(RequisiteRow::new(kind, &r.req_subject, &r.req_course_number))
            })
            .collect()
    }

    /// Inserts a scraped requisite dump in a single transaction
    ///
    /// Records with an unknown kind are skipped. Returns the number inserted.
    pub fn import_requisites(&self, records: &[RequisiteRecord]) -> Result<usize, DbError> {
        let mut db = self.conn()?;
        let tx = db.transaction()?;
        let mut inserted = 0;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO requisites (subject, course_number, req_subject, req_course_number, kind, note)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;

            for record in records {
                let row = match record.to_row() {
                    Ok(row) => row,
                    Err(e) => {
                        warn!("Skipping requisite: {}", e);
                        continue;
                    }
                };

                stmt.execute(params![
                    record.subject.trim(),
                    record.course_number.trim(),
                    row.req_subject.trim(),
                    row.req_course_number.trim(),
                    row.kind.as_str(),
                    record.note,
                ])?;
                inserted += 1;
            }
        }

        tx.commit()?;

        info!("Imported {} of {} requisites", inserted, records.len());

        Ok(inserted)
    }

    /// Counts all requisite rows
    pub fn requisite_count(&self) -> Result<usize, DbError> {
        let db = self.conn()?;
        let count: i64 = db.query_row("SELECT COUNT(*) FROM requisites", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

impl RequisiteLookup for CatalogDb {
    type Error = DbError;

    fn requisites(
        &self,
        subject: &str,
        course_number: &str,
    ) -> Result<Vec<RequisiteRow>, Self::Error> {
        let rows = self.requisites_for(subject, course_number)?;
        debug!("{} requisites for {} {}", rows.len(), subject, course_number);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::degree_audit::{validate_plan, PlanItem, PlanStatus, Program};

    fn record(subject: &str, number: &str, req: &str, kind: &str) -> RequisiteRecord {
        let (req_subject, req_number) = req.split_once(' ').unwrap();
        RequisiteRecord {
            subject: subject.to_string(),
            course_number: number.to_string(),
            req_subject: req_subject.to_string(),
            req_course_number: req_number.to_string(),
            kind: kind.to_string(),
            note: None,
        }
    }

    fn seeded() -> CatalogDb {
        let db = CatalogDb::open_in_memory().unwrap();
        db.import_requisites(&[
            record("COMPSCI", "2C03", "COMPSCI 1XC3", "PREREQ"),
            record("COMPSCI", "2C03", "COMPSCI 1MD3", "prereq"),
            record("COMPSCI", "2C03", "SFWRENG 2C03", "ANTIREQ"),
            record("COMPSCI", "2C03", "MATH 1ZA3", "RECOMMENDED"),
        ])
        .unwrap();
        db
    }

    #[test]
    fn test_import_skips_unknown_kinds() {
        let db = seeded();
        assert_eq!(db.requisite_count().unwrap(), 3);
    }

    #[test]
    fn test_requisites_ordered_by_kind_then_course() {
        let rows = seeded().requisites_for("COMPSCI", "2C03").unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].kind, RequisiteKind::Antireq);
        assert_eq!(rows[1].code(), "COMPSCI 1MD3");
        assert_eq!(rows[2].code(), "COMPSCI 1XC3");
    }

    #[test]
    fn test_unknown_course_has_no_requisites() {
        assert!(seeded().requisites_for("HISTORY", "1A03").unwrap().is_empty());
    }

    #[test]
    fn test_database_backs_prereq_warnings() {
        let db = seeded();
        let plan = vec![PlanItem::new("COMPSCI", "2C03", PlanStatus::Planned)];

        let result = validate_plan(&plan, &Program::default(), &db).unwrap();

        assert_eq!(result.prereq_warnings.len(), 1);
        assert_eq!(
            result.prereq_warnings[0].missing_prereq,
            "COMPSCI 1MD3 or COMPSCI 1XC3"
        );
    }

    #[test]
    fn test_reopen_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("courses.db");

        {
            let db = CatalogDb::open(&path).unwrap();
            db.import_requisites(&[record("MATH", "2Z03", "MATH 1ZA3", "PREREQ")])
                .unwrap();
        }

        let db = CatalogDb::open(&path).unwrap();
        assert_eq!(db.requisites_for("MATH", "2Z03").unwrap().len(), 1);
    }
}
