//! Persistence for key bindings: one accelerator name per shortcut type.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Key/value storage of accelerator names, keyed by shortcut type name.
pub trait BindingStore {
    fn load(&self, key: &str) -> Option<String>;

    /// Persist `value` under `key`.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be written.
    fn store(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl BindingStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn store(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Bindings kept in a plain text file of `type = accelerator` lines.
///
/// Blank lines and `#` comments are skipped. The whole file is rewritten on
/// every store, so comments do not survive an update.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read key bindings {}", path.display()))?;
            parse_bindings(&content)
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self) -> Result<()> {
        let mut lines = vec!["# quillnote key bindings".to_string()];
        lines.extend(
            self.values
                .iter()
                .map(|(key, value)| format!("{key} = {value}")),
        );
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
        }
        fs::write(&self.path, format!("{}\n", lines.join("\n")))
            .with_context(|| format!("Failed to write key bindings {}", self.path.display()))
    }
}

impl BindingStore for FileStore {
    fn load(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn store(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.write()
    }
}

fn parse_bindings(content: &str) -> BTreeMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let parsed = line.split_once('=');
            if parsed.is_none() {
                tracing::warn!(line, "skipping key binding line without '='");
            }
            parsed
        })
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}
