//! Dialog source loading.
//!
//! `start()` resolves a dialog name to the file `<name>.byack` through a
//! [`DialogLoader`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use yack_foundation::{Error, Result};

/// File extension of compiled dialog files.
pub const DIALOG_EXTENSION: &str = "byack";

/// Returns the file name a dialog is stored under.
#[must_use]
pub fn dialog_file_name(name: &str) -> String {
    format!("{name}.{DIALOG_EXTENSION}")
}

/// Supplies dialog source by name.
pub trait DialogLoader {
    /// Loads the source of the named dialog.
    ///
    /// # Errors
    /// Returns `DialogNotFound` if no such dialog exists, or an I/O error if
    /// it cannot be read.
    fn load(&self, name: &str) -> Result<String>;
}

/// Loads dialogs from a directory on disk.
#[derive(Clone, Debug)]
pub struct FileLoader {
    root: PathBuf,
}

impl FileLoader {
    /// Creates a loader reading from the given directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the directory dialogs are read from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DialogLoader for FileLoader {
    fn load(&self, name: &str) -> Result<String> {
        let path = self.root.join(dialog_file_name(name));
        let bytes = std::fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::dialog_not_found(name)
            } else {
                Error::io(format!("failed to read '{}': {e}", path.display()))
            }
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Serves dialogs from memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryLoader {
    files: HashMap<String, String>,
}

impl MemoryLoader {
    /// Creates an empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a dialog under the given name.
    pub fn insert(&mut self, name: impl AsRef<str>, source: impl Into<String>) {
        self.files
            .insert(dialog_file_name(name.as_ref()), source.into());
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with_dialog(mut self, name: impl AsRef<str>, source: impl Into<String>) -> Self {
        self.insert(name, source);
        self
    }
}

impl DialogLoader for MemoryLoader {
    fn load(&self, name: &str) -> Result<String> {
        self.files
            .get(&dialog_file_name(name))
            .cloned()
            .ok_or_else(|| Error::dialog_not_found(name))
    }
}
