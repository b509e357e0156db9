//! Centralized validation and helper functions.

use std::cmp::Ordering;

/// Locus counts supported by the typing schemes we reconcile against
pub const SUPPORTED_LOCUS_COUNTS: [usize; 2] = [7, 8];

/// Characters that mark an allele call as undetermined
pub const ALLELE_PLACEHOLDER_CHARS: [char; 4] = ['-', '*', '?', '~'];

/// Whole-token markers used for an undetermined sequence type
pub const TYPE_PLACEHOLDERS: [&str; 3] = ["-", "ND", "NF"];

/// The marker written for a candidate profile with no reference match
pub const UNRESOLVED_TYPE: &str = "-";

/// Check whether an allele identifier is a placeholder.
///
/// Any identifier carrying one of `-`, `*`, `?` or `~` counts, so partial
/// calls such as `12?` or `4~` are undetermined as well.
///
/// # Examples
///
/// ```
/// use mlst_reconcile::utils::validation::is_placeholder_allele;
///
/// assert!(is_placeholder_allele("-"));
/// assert!(is_placeholder_allele("12?"));
/// assert!(!is_placeholder_allele("12"));
/// ```
#[must_use]
pub fn is_placeholder_allele(allele: &str) -> bool {
    allele.contains(&ALLELE_PLACEHOLDER_CHARS[..])
}

/// Check whether a sequence type token is a placeholder (`-`, `ND`, `NF`,
/// or anything carrying an allele placeholder character).
#[must_use]
pub fn is_placeholder_type(token: &str) -> bool {
    TYPE_PLACEHOLDERS.contains(&token) || is_placeholder_allele(token)
}

/// Count placeholder-class markers in a joined type string.
///
/// Occurrences are counted as substrings, so `-/-` holds two markers and
/// `ND/12` holds one.
#[must_use]
pub fn count_type_placeholders(types: &str) -> usize {
    TYPE_PLACEHOLDERS
        .iter()
        .map(|marker| types.matches(marker).count())
        .sum()
}

/// Order two type tokens: numeric tokens ascend numerically and sort before
/// every non-numeric token. Non-numeric tokens compare equal so a stable sort
/// keeps their relative order.
#[must_use]
pub fn compare_type_tokens(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => Ordering::Equal,
    }
}

/// Sort type tokens with [`compare_type_tokens`].
pub fn sort_type_tokens(tokens: &mut [String]) {
    tokens.sort_by(|a, b| compare_type_tokens(a, b));
}

/// Check that a scheme has a supported number of loci.
///
/// Returns an error message if the count is unsupported, None if it is fine.
#[must_use]
pub fn check_locus_count(count: usize) -> Option<String> {
    if SUPPORTED_LOCUS_COUNTS.contains(&count) {
        None
    } else {
        Some(format!(
            "Unsupported scheme size: {count} loci (expected one of {SUPPORTED_LOCUS_COUNTS:?})"
        ))
    }
}

/// Identifier written to the ledgers for an input record path.
///
/// Takes the third- and fourth-from-last path components, which for the
/// usual `<run>/<sample>/MLST/<file>` layout yields `<run>/<sample>`.
///
/// # Examples
///
/// ```
/// use mlst_reconcile::utils::validation::ledger_identifier;
///
/// assert_eq!(
///     ledger_identifier("/data/RUN01/SAMPLE7/MLST/SAMPLE7.tsv"),
///     "RUN01/SAMPLE7"
/// );
/// ```
#[must_use]
pub fn ledger_identifier(path: &str) -> String {
    let components: Vec<&str> = path.split('/').collect();
    let end = components.len().saturating_sub(2);
    let start = components.len().saturating_sub(4);
    components[start..end].join("/")
}
