/// Loading programs and plans from JSON files
use super::error::ConfigError;
use super::types::{PlanItem, Program};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Programs loaded from a directory, keyed by program ID
#[derive(Debug, Clone, Default)]
pub struct ProgramCatalog {
    programs: BTreeMap<i64, Program>,
}

impl ProgramCatalog {
    /// Loads every program file from a directory
    ///
    /// # Arguments
    /// * `dir` - Directory holding one `<anything>.json` file per program
    ///
    /// # Returns
    /// * `Ok(ProgramCatalog)` - All programs found (empty if the directory doesn't exist)
    /// * `Err` - If a file can't be read or parsed
    pub fn load_from_directory(dir: &Path) -> Result<Self, ConfigError> {
        let mut programs = BTreeMap::new();

        if !dir.is_dir() {
            info!("Program directory {} not found, catalog is empty", dir.display());
            return Ok(Self { programs });
        }

        let entries = fs::read_dir(dir).map_err(|source| ConfigError::Io {
            path: dir.display().to_string(),
            source,
        })?;

        for entry in entries {
            let path = entry
                .map_err(|source| ConfigError::Io {
                    path: dir.display().to_string(),
                    source,
                })?
                .path();

            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                let program: Program = read_json(&path)?;
                debug!("Loaded program {} from {}", program.program_id, path.display());
                programs.insert(program.program_id, program);
            }
        }

        info!("Loaded {} programs from {}", programs.len(), dir.display());

        Ok(Self { programs })
    }

    /// Gets a program by ID
    pub fn get(&self, program_id: i64) -> Option<&Program> {
        self.programs.get(&program_id)
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

/// Reads a single program file
pub fn load_program(path: &Path) -> Result<Program, ConfigError> {
    read_json(path)
}

/// Reads a plan file (a JSON array of plan items)
pub fn load_plan_items(path: &Path) -> Result<Vec<PlanItem>, ConfigError> {
    read_json(path)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ConfigError::Json {
        path: path.display().to_string(),
        source,
    })
}
