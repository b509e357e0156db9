//! Resolve the scheme for an SRST2 result from the organism in its filename.
//!
//! SRST2 results are named `<sample>_<Genus>_<species>.<ext>`. Organisms with
//! more than one PubMLST scheme encode the scheme number in the species
//! (`baumannii#1` is Oxford, `baumannii#2` is Pasteur).

use std::path::Path;

use tracing::{debug, info};

use crate::scheme::repository::SchemeRepository;
use crate::scheme::SchemeError;

/// Fixed genus/species → scheme assignments
const SCHEME_RULES: &[(&str, &str, &str)] = &[
    ("Acinetobacter", "baumannii#1", "abaumannii"),
    ("Acinetobacter", "baumannii#2", "abaumannii_2"),
    ("Escherichia", "coli#1", "ecoli"),
    ("Escherichia", "coli#2", "ecoli_2"),
    ("Burkholderia", "cepacia", "bcc"),
];

/// Genera whose species must name a scheme number; they never fall back to
/// probing the repository.
const MULTI_SCHEME_GENERA: [&str; 2] = ["Acinetobacter", "Escherichia"];

/// Extract `(genus, species)` from a result path.
///
/// The genus is the second-to-last `_`-separated piece of the path and the
/// species is the last piece up to its first `.`.
///
/// # Examples
///
/// ```
/// use mlst_reconcile::scheme::taxonomy::taxon_from_path;
///
/// assert_eq!(
///     taxon_from_path("RUN/S1/MLST/S1_Klebsiella_pneumoniae.srst2"),
///     Some(("Klebsiella".to_string(), "pneumoniae".to_string()))
/// );
/// ```
#[must_use]
pub fn taxon_from_path(path: &str) -> Option<(String, String)> {
    let mut pieces = path.rsplit('_');
    let last = pieces.next()?;
    let genus = pieces.next()?;
    let species = last.split('.').next().unwrap_or_default();
    if genus.is_empty() || species.is_empty() {
        return None;
    }
    Some((genus.to_string(), species.to_string()))
}

/// Find the scheme name for a genus and species.
///
/// Fixed rules are consulted first. Otherwise the repository is probed for a
/// species scheme (`kpneumoniae`), then for a genus scheme (`klebsiella`).
///
/// # Errors
///
/// Returns `SchemeError::DatabaseNotFound` if no scheme applies.
pub fn find_scheme(
    genus: &str,
    species: &str,
    repository: &dyn SchemeRepository,
) -> Result<String, SchemeError> {
    if let Some((_, _, scheme)) = SCHEME_RULES
        .iter()
        .find(|(g, s, _)| *g == genus && *s == species)
    {
        debug!(genus, species, scheme, "Scheme assigned by rule");
        return Ok((*scheme).to_string());
    }

    let not_found = || SchemeError::DatabaseNotFound {
        genus: genus.to_string(),
        species: species.to_string(),
    };

    if MULTI_SCHEME_GENERA.contains(&genus) {
        return Err(not_found());
    }

    let species_scheme = format!(
        "{}{species}",
        genus.chars().next().map(|c| c.to_ascii_lowercase()).unwrap_or_default()
    );
    debug!(scheme = %species_scheme, "Probing for species scheme");
    if repository.contains(&species_scheme) {
        info!(scheme = %species_scheme, "Found species scheme");
        return Ok(species_scheme);
    }

    let genus_scheme = genus.to_lowercase();
    if repository.contains(&genus_scheme) {
        info!(scheme = %genus_scheme, "Found genus scheme");
        return Ok(genus_scheme);
    }

    Err(not_found())
}

/// Find the scheme for an SRST2 result file from its name
///
/// # Errors
///
/// Returns `SchemeError::DatabaseNotFound` if the name carries no organism or
/// no scheme applies to it.
pub fn find_scheme_for_path(
    path: &Path,
    repository: &dyn SchemeRepository,
) -> Result<String, SchemeError> {
    let path = path.to_string_lossy();
    let (genus, species) = taxon_from_path(&path).ok_or_else(|| SchemeError::DatabaseNotFound {
        genus: String::new(),
        species: path.to_string(),
    })?;
    find_scheme(&genus, &species, repository)
}
