//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use duka_backend::MockBackend;
use duka_cache::FileStore;
use duka_commerce::cart::CartStore;

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Catalog, order service and address book for this invocation.
    pub backend: MockBackend,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config_path = match config_path {
            Some(path) => Some(resolve(&cwd, path)),
            None => find_config(&cwd),
        };
        let config = match &config_path {
            Some(path) => CliConfig::load(path)?,
            None => CliConfig::default(),
        };

        let backend = MockBackend::new(config.backend.latency);

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
            backend,
        })
    }

    /// Directory holding the persisted slots.
    pub fn storage_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.storage.dir)
    }

    /// Open the persisted cart.
    pub fn cart_store(&self) -> Result<CartStore<FileStore>> {
        let dir = self.storage_dir();
        let store = FileStore::open(dir.clone())
            .with_context(|| format!("Failed to open cart storage at {}", dir.display()))?;
        Ok(CartStore::open_slot(store, self.config.storage.cart_key.clone()))
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        resolve(&self.cwd, path)
    }
}

fn resolve(cwd: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

/// Find a config file in `start` or any parent directory.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_walks_up() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_config(&nested), None);

        let config = root.path().join(".duka.toml");
        std::fs::write(&config, "").unwrap();
        assert_eq!(find_config(&nested), Some(config));
    }

    #[test]
    fn test_nearest_config_wins() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("shop");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.path().join("duka.toml"), "").unwrap();
        std::fs::write(nested.join("duka.json"), "{}").unwrap();

        assert_eq!(find_config(&nested), Some(nested.join("duka.json")));
    }
}
