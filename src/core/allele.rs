use serde::{Deserialize, Serialize};

use crate::utils::validation::is_placeholder_allele;

/// One locus's reported allele(s) for a sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlleleCall {
    /// Locus name (e.g. `gltA`)
    pub locus: String,

    /// Candidate allele identifiers; more than one means the call is ambiguous
    pub alleles: Vec<String>,
}

impl AlleleCall {
    pub fn new(locus: impl Into<String>, alleles: Vec<String>) -> Self {
        Self {
            locus: locus.into(),
            alleles,
        }
    }

    /// Build a call from a comma-separated allele list, dropping empty entries
    pub fn from_list(locus: impl Into<String>, list: &str) -> Self {
        let alleles = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self::new(locus, alleles)
    }

    pub fn is_ambiguous(&self) -> bool {
        self.alleles.len() > 1
    }

    pub fn has_placeholder(&self) -> bool {
        self.alleles.iter().any(|a| is_placeholder_allele(a))
    }
}

/// One allele identifier per locus, in scheme order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Profile(pub Vec<String>);

impl Profile {
    /// A profile is complete when no locus is undetermined
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.0.iter().any(|a| is_placeholder_allele(a))
    }

    /// Whether this profile equals a reference row's locus values.
    ///
    /// Placeholder identifiers never match, even against an identical
    /// reference value.
    #[must_use]
    pub fn matches(&self, reference: &[&str]) -> bool {
        self.0.len() == reference.len()
            && self
                .0
                .iter()
                .zip(reference)
                .all(|(allele, expected)| !is_placeholder_allele(allele) && allele == expected)
    }

    pub fn alleles(&self) -> &[String] {
        &self.0
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join(","))
    }
}
