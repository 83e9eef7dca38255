use std::path::Path;

use serde_derive::{Deserialize, Serialize};

use crate::errors::KboardError;
use crate::sync::SyncSolution;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KboardConfig {
    pub sync_solution: SyncSolution,
    // Milliseconds each operation keeps its critical section after touching the ring.
    pub perform_delay_ms: u64,
}

impl KboardConfig {
    pub fn builder() -> KboardConfigBuilder {
        KboardConfigBuilder::default()
    }

    /// Loads a TOML config, writing the defaults out first if `path` does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<KboardConfig, KboardError> {
        Ok(confy::load_path(path)?)
    }
}

#[derive(Default)]
pub struct KboardConfigBuilder {
    cfg: KboardConfig,
}

impl KboardConfigBuilder {
    pub fn sync_solution(mut self, sync_solution: SyncSolution) -> Self {
        self.cfg.sync_solution = sync_solution;
        self
    }

    pub fn perform_delay_ms(mut self, perform_delay_ms: u64) -> Self {
        self.cfg.perform_delay_ms = perform_delay_ms;
        self
    }

    pub fn build(self) -> KboardConfig {
        self.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn loads_toml() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("kboard.toml");
        fs::write(&path, "sync_solution = \"ticket\"\nperform_delay_ms = 3\n")?;

        let cfg = KboardConfig::load(&path)?;
        assert_eq!(
            cfg,
            KboardConfig::builder()
                .sync_solution(SyncSolution::Ticket)
                .perform_delay_ms(3)
                .build()
        );
        Ok(())
    }

    #[test]
    fn missing_fields_take_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("kboard.toml");
        fs::write(&path, "sync_solution = \"reader-preference\"\n")?;

        let cfg = KboardConfig::load(&path)?;
        assert_eq!(cfg.sync_solution, SyncSolution::ReaderPreference);
        assert_eq!(cfg.perform_delay_ms, 0);
        Ok(())
    }

    #[test]
    fn missing_file_is_created_with_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("fresh.toml");

        let cfg = KboardConfig::load(&path)?;
        assert_eq!(cfg, KboardConfig::default());
        assert!(path.exists());
        Ok(())
    }
}
