use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default file name of the ledger of undefined profiles and alleles
pub const BLANKS_LEDGER: &str = "blank_MLSTs.txt";

/// Default file name of the ledger of rewritten types
pub const UPDATED_LEDGER: &str = "updated_MLSTs.txt";

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Failed to append to ledger {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One ledger line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEntry {
    /// A record whose reconciled type is (partly) undefined
    Blank {
        identifier: String,
        labels: Vec<String>,
        fields: Vec<String>,
    },
    /// A record whose type field was rewritten
    Updated {
        identifier: String,
        scheme: String,
        old_type: String,
        new_type: String,
    },
}

impl std::fmt::Display for LedgerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank {
                identifier,
                labels,
                fields,
            } => write!(f, "{identifier}\t{}\t{}", labels.join(","), fields.join("\t")),
            Self::Updated {
                identifier,
                scheme,
                old_type,
                new_type,
            } => write!(f, "{identifier}\t{scheme}\t{old_type} to {new_type}"),
        }
    }
}

/// Destination for ledger lines
pub trait LedgerWriter {
    /// Make sure a following [`append`](LedgerWriter::append) can reach the
    /// ledger. Called before the record file is replaced, so an unreachable
    /// ledger leaves the record untouched.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Io` if the ledger cannot be opened.
    fn prepare(&mut self) -> Result<(), LedgerError> {
        Ok(())
    }

    /// Append one entry as a single line
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Io` if the entry cannot be written.
    fn append(&mut self, entry: &LedgerEntry) -> Result<(), LedgerError>;
}

/// A ledger file shared between invocations.
///
/// The file is opened in append mode and the whole line is written with a
/// single `write_all`, so concurrent appenders do not interleave partial
/// lines. A handle opened by [`prepare`](LedgerWriter::prepare) is used by
/// the next append and then closed.
#[derive(Debug)]
pub struct FileLedger {
    path: PathBuf,
    pending: Option<File>,
}

impl FileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pending: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<File, LedgerError> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| LedgerError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

impl LedgerWriter for FileLedger {
    fn prepare(&mut self) -> Result<(), LedgerError> {
        if self.pending.is_none() {
            self.pending = Some(self.open()?);
        }
        Ok(())
    }

    fn append(&mut self, entry: &LedgerEntry) -> Result<(), LedgerError> {
        let mut file = match self.pending.take() {
            Some(file) => file,
            None => self.open()?,
        };
        file.write_all(format!("{entry}\n").as_bytes())
            .map_err(|source| LedgerError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

/// In-memory ledger
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    lines: Vec<String>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl LedgerWriter for MemoryLedger {
    fn append(&mut self, entry: &LedgerEntry) -> Result<(), LedgerError> {
        self.lines.push(entry.to_string());
        Ok(())
    }
}
