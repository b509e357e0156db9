use std::collections::HashMap;
use std::io::{BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

use crate::scheme::SchemeError;

/// Source of reference scheme tables, keyed by scheme name
pub trait SchemeRepository {
    /// Whether a scheme with this name exists
    fn contains(&self, scheme: &str) -> bool;

    /// Open the profile table of a scheme for streaming
    ///
    /// # Errors
    ///
    /// Returns `SchemeError::UnknownScheme` if the scheme does not exist or
    /// `SchemeError::Io` if it cannot be opened.
    fn open(&self, scheme: &str) -> Result<Box<dyn BufRead + '_>, SchemeError>;
}

/// Schemes stored on disk as `<root>/<name>/<name>.txt`
#[derive(Debug, Clone)]
pub struct DirectorySchemeRepository {
    root: PathBuf,
}

impl DirectorySchemeRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the profile table for a scheme
    pub fn profile_path(&self, scheme: &str) -> PathBuf {
        self.root.join(scheme).join(format!("{scheme}.txt"))
    }
}

impl SchemeRepository for DirectorySchemeRepository {
    fn contains(&self, scheme: &str) -> bool {
        !scheme.is_empty() && self.root.join(scheme).exists()
    }

    fn open(&self, scheme: &str) -> Result<Box<dyn BufRead + '_>, SchemeError> {
        let path = self.profile_path(scheme);
        if !path.exists() {
            return Err(SchemeError::UnknownScheme(scheme.to_string()));
        }
        let file = std::fs::File::open(path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Schemes held in memory, for fixtures and embedding
#[derive(Debug, Clone, Default)]
pub struct MemorySchemeRepository {
    schemes: HashMap<String, String>,
}

impl MemorySchemeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a scheme's profile table
    pub fn insert(&mut self, scheme: impl Into<String>, table: impl Into<String>) {
        self.schemes.insert(scheme.into(), table.into());
    }

    #[must_use]
    pub fn with_scheme(mut self, scheme: impl Into<String>, table: impl Into<String>) -> Self {
        self.insert(scheme, table);
        self
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

impl SchemeRepository for MemorySchemeRepository {
    fn contains(&self, scheme: &str) -> bool {
        self.schemes.contains_key(scheme)
    }

    fn open(&self, scheme: &str) -> Result<Box<dyn BufRead + '_>, SchemeError> {
        let table = self
            .schemes
            .get(scheme)
            .ok_or_else(|| SchemeError::UnknownScheme(scheme.to_string()))?;
        Ok(Box::new(Cursor::new(table.as_bytes())))
    }
}
