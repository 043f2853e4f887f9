use crate::model::Plan;
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Persistencia de la malla. El motor no toca este nivel: el CLI carga,
/// genera y guarda.
pub trait PlanStorage {
    /// Carga estricta: archivo ausente o ilegible es error.
    fn load(&self) -> anyhow::Result<Plan>;
    /// Malla vacía cuando el soporte todavía no existe; cualquier otro
    /// fallo de lectura se propaga.
    fn load_or_default(&self) -> anyhow::Result<Plan>;
    /// Guardado atómico.
    fn save(&self, plan: &Plan) -> anyhow::Result<()>;
}

pub struct JsonPlanStorage {
    path: PathBuf,
}

impl JsonPlanStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }

    fn read_plan(&self) -> anyhow::Result<Plan> {
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", self.path.display()))
    }
}

impl PlanStorage for JsonPlanStorage {
    fn load(&self) -> anyhow::Result<Plan> {
        self.read_plan()
    }

    fn load_or_default(&self) -> anyhow::Result<Plan> {
        if !self.path.exists() {
            return Ok(Plan::default());
        }
        self.read_plan()
    }

    fn save(&self, plan: &Plan) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(plan)?;
        let mut tmp =
            NamedTempFile::new_in(self.path.parent().unwrap_or_else(|| Path::new(".")))
                .with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)
            .with_context(|| format!("atomic rename to {}", self.path.display()))?;
        Ok(())
    }
}
