use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::ArgAction;
use mactrack::degree_audit::{
    compute_gpa, load_plan_items, load_program, validate_plan, NoRequisites, PlanItem, Program,
    ProgramCatalog, RequisiteRecord, RequisiteTable, ValidationResult,
};
use mactrack::CatalogDb;
use serde::Serialize;
use serde_json::json;
use tracing::info;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        match self.command {
            Command::Validate(command) => command.run(),
            Command::Gpa(command) => command.run(),
            Command::ImportRequisites(command) => command.run(),
        }
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        // stdout carries the JSON result
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_target(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Validate a plan against a program's requirements
    Validate(Validate),

    /// Compute the unit-weighted GPA of a plan
    Gpa(Gpa),

    /// Load a scraped requisite dump into the catalog database
    ImportRequisites(ImportRequisites),
}

#[derive(Debug, clap::Args)]
pub struct Validate {
    /// Plan file (JSON array of plan items)
    #[arg(long)]
    plan: PathBuf,

    /// Program file (JSON program with its requirement tree)
    #[arg(long, required_unless_present = "programs_dir", conflicts_with = "programs_dir")]
    program: Option<PathBuf>,

    /// Directory of program files, used with --program-id
    #[arg(long, requires = "program_id")]
    programs_dir: Option<PathBuf>,

    #[arg(long, requires = "programs_dir")]
    program_id: Option<i64>,

    /// Requisite dump (JSON) used for prerequisite checks
    #[arg(long, conflicts_with = "db")]
    requisites: Option<PathBuf>,

    /// Catalog database used for prerequisite checks
    #[arg(long)]
    db: Option<PathBuf>,
}

impl Validate {
    fn run(self) -> anyhow::Result<()> {
        let plan = load_plan_items(&self.plan)?;
        let program = self.resolve_program()?;

        let result: ValidationResult = match (&self.requisites, &self.db) {
            (Some(path), _) => {
                let table = RequisiteTable::from_path(path)?;
                validate_plan(&plan, &program, table)?
            }
            (None, Some(path)) => {
                let db = CatalogDb::open(path)
                    .with_context(|| format!("opening {}", path.display()))?;
                validate_plan(&plan, &program, db)?
            }
            (None, None) => {
                info!("No requisite source given, skipping prerequisite checks");
                validate_plan(&plan, &program, NoRequisites)?
            }
        };

        print_json(&result)
    }

    fn resolve_program(&self) -> anyhow::Result<Program> {
        if let Some(path) = &self.program {
            return Ok(load_program(path)?);
        }

        let (Some(dir), Some(id)) = (&self.programs_dir, self.program_id) else {
            return Err(anyhow!("either --program or --programs-dir with --program-id is required"));
        };

        let catalog = ProgramCatalog::load_from_directory(dir)?;
        catalog
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("program {} not found in {}", id, dir.display()))
    }
}

#[derive(Debug, clap::Args)]
pub struct Gpa {
    /// Plan file (JSON array of plan items)
    #[arg(long)]
    plan: PathBuf,
}

impl Gpa {
    fn run(self) -> anyhow::Result<()> {
        let plan: Vec<PlanItem> = load_plan_items(&self.plan)?;
        print_json(&json!({ "gpa": compute_gpa(&plan) }))
    }
}

#[derive(Debug, clap::Args)]
pub struct ImportRequisites {
    /// Catalog database to load into (created if missing)
    #[arg(long)]
    db: PathBuf,

    /// Requisite dump (JSON array)
    #[arg(long)]
    json: PathBuf,
}

impl ImportRequisites {
    fn run(self) -> anyhow::Result<()> {
        let records = read_records(&self.json)?;
        let db = CatalogDb::open(&self.db)
            .with_context(|| format!("opening {}", self.db.display()))?;

        let inserted = db.import_requisites(&records)?;
        info!("Loaded {} requisites into {}", inserted, self.db.display());

        print_json(&json!({ "inserted": inserted, "skipped": records.len() - inserted }))
    }
}

fn read_records(path: &Path) -> anyhow::Result<Vec<RequisiteRecord>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate_args(programs_dir: &Path, program_id: i64) -> Validate {
        Validate {
            plan: PathBuf::from("plan.json"),
            program: None,
            programs_dir: Some(programs_dir.to_path_buf()),
            program_id: Some(program_id),
            requisites: None,
            db: None,
        }
    }

    #[test]
    fn test_resolve_program_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("compsci.json"),
            r#"{"program_id": 12, "name": "Computer Science", "degree_type": "BASc", "groups": []}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("math.json"),
            r#"{"program_id": 30, "name": "Mathematics", "groups": []}"#,
        )
        .unwrap();

        let program = validate_args(dir.path(), 30).resolve_program().unwrap();
        assert_eq!(program.name, "Mathematics");

        let err = validate_args(dir.path(), 99).resolve_program().unwrap_err();
        assert!(err.to_string().contains("program 99 not found"));
    }

    #[test]
    fn test_cli_parses_programs_dir_branch() {
        use clap::Parser;

        let cli = Cli::try_parse_from([
            "mactrack",
            "validate",
            "--plan",
            "plan.json",
            "--programs-dir",
            "programs",
            "--program-id",
            "7",
        ])
        .unwrap();

        let Command::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.program_id, Some(7));
        assert!(args.program.is_none());

        assert!(Cli::try_parse_from(["mactrack", "validate", "--plan", "plan.json"]).is_err());
    }
}
