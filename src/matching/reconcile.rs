use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::allele::Profile;
use crate::core::record::MlstRecord;
use crate::core::types::{FileType, ReportedType};
use crate::matching::candidates::enumerate_candidates;
use crate::matching::lookup::lookup_types;
use crate::matching::ReconcileError;
use crate::parsing::srst2::parse_srst2_file;
use crate::parsing::standard::parse_standard_file;
use crate::persist::ledger::{LedgerEntry, LedgerWriter};
use crate::persist::rewrite::rewrite_atomically;
use crate::scheme::repository::SchemeRepository;
use crate::scheme::taxonomy::find_scheme_for_path;
use crate::utils::validation::{
    count_type_placeholders, is_placeholder_allele, ledger_identifier, sort_type_tokens,
    UNRESOLVED_TYPE,
};

/// Label for a single undefined profile
pub const PROFILE_UNDEFINED: &str = "Profile_undefined";

/// Label for several undefined profiles
pub const PROFILES_UNDEFINED: &str = "Profiles_undefined";

/// Prefix of the label naming an undetermined locus
pub const ALLELE_LABEL_PREFIX: &str = "Allele(s)-";

/// Outcome of comparing the candidate count with the reported type(s)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// One candidate, first reported type concrete
    SingularDefined,
    /// One candidate, first reported type a placeholder
    SingularUndefined,
    /// Several candidates, as many concrete types
    MultipleDefined,
    /// A placeholder among several reported types
    MultipleUndefined,
    /// Fewer reported types than candidates
    TooFewTypes,
    /// More reported types than candidates
    TooManyTypes,
}

impl Verdict {
    /// Whether the reported type must be recomputed from the scheme
    #[must_use]
    pub fn needs_lookup(self) -> bool {
        !matches!(self, Self::SingularDefined | Self::MultipleDefined)
    }

    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::SingularDefined => "singular and defined",
            Self::SingularUndefined => "singular and undefined",
            Self::MultipleDefined => "multiple and defined",
            Self::MultipleUndefined => "multiple and something is undefined",
            Self::TooFewTypes => "not enough types to match profiles",
            Self::TooManyTypes => "not enough profiles to match types",
        }
    }
}

/// Decide whether the reported type(s) agree with the candidate profiles.
///
/// A single candidate is judged on the first reported token alone: any
/// further tokens are ignored.
///
/// # Errors
///
/// Returns `ReconcileError::EmptyCandidateSet` when there are no candidates.
pub fn check_consistency(
    candidate_count: usize,
    reported: &ReportedType,
) -> Result<Verdict, ReconcileError> {
    let verdict = match candidate_count {
        0 => return Err(ReconcileError::EmptyCandidateSet),
        1 if reported.leads_with_placeholder() => Verdict::SingularUndefined,
        1 => Verdict::SingularDefined,
        _ if reported.has_placeholder() => Verdict::MultipleUndefined,
        n if reported.len() < n => Verdict::TooFewTypes,
        n if reported.len() > n => Verdict::TooManyTypes,
        _ => Verdict::MultipleDefined,
    };
    Ok(verdict)
}

/// Turn per-candidate lookup results into sorted type tokens: resolved types
/// ascending, then one `-` per unresolved candidate.
#[must_use]
pub fn resolve_types(types: &[Option<u64>]) -> Vec<String> {
    let mut resolved: Vec<u64> = types.iter().flatten().copied().collect();
    resolved.sort_unstable();

    let unresolved = types.iter().filter(|t| t.is_none()).count();

    resolved
        .into_iter()
        .map(|st| st.to_string())
        .chain(std::iter::repeat(UNRESOLVED_TYPE.to_string()).take(unresolved))
        .collect()
}

/// Why a reconciled type is (partly) undefined
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Anomaly {
    /// Labels in discovery order; the first is either a profile label or
    /// `Allele(s)-<locus>`, later ones are bare locus names
    pub labels: Vec<String>,
}

impl Anomaly {
    /// Classify the placeholders in a reconciled type string.
    ///
    /// Returns None when the type string holds no placeholder markers.
    #[must_use]
    pub fn classify(new_type: &str, candidates: &[Profile], locus_names: &[String]) -> Option<Self> {
        let markers = count_type_placeholders(new_type);
        if markers == 0 {
            return None;
        }

        let generic = if markers == 1 {
            PROFILE_UNDEFINED
        } else {
            PROFILES_UNDEFINED
        };
        let mut labels = vec![generic.to_string()];

        for candidate in candidates.iter().filter(|candidate| !candidate.is_complete()) {
            for (allele, locus) in candidate.alleles().iter().zip(locus_names) {
                if !is_placeholder_allele(allele) {
                    continue;
                }
                let locus_label = format!("{ALLELE_LABEL_PREFIX}{locus}");
                if is_profile_label(&labels[0]) {
                    labels[0] = locus_label;
                } else if !labels.contains(locus) && !labels.contains(&locus_label) {
                    labels.push(locus.clone());
                }
            }
        }

        Some(Self { labels })
    }

    /// Whether the anomaly is a missing profile rather than a bad allele
    #[must_use]
    pub fn is_profile_level(&self) -> bool {
        self.labels.first().is_some_and(|label| is_profile_label(label))
    }

    #[must_use]
    pub fn label(&self) -> String {
        self.labels.join(",")
    }
}

fn is_profile_label(label: &str) -> bool {
    label == PROFILE_UNDEFINED || label == PROFILES_UNDEFINED
}

/// Result of checking one MLST record
#[derive(Debug, Clone, Serialize)]
pub struct Reconciliation {
    pub sample: String,
    pub scheme: String,
    pub file_type: FileType,
    pub verdict: Verdict,
    /// Number of candidate profiles
    pub candidates: usize,
    /// Reported type tokens, in reported order
    pub reported: Vec<String>,
    /// Types resolved from the scheme, when a lookup ran
    pub resolved: Option<Vec<String>>,
    pub anomaly: Option<Anomaly>,
}

impl Reconciliation {
    /// Whether the resolved types differ from the reported ones
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.resolved.as_ref().is_some_and(|resolved| {
            let mut reported = self.reported.clone();
            sort_type_tokens(&mut reported);
            *resolved != reported
        })
    }

    /// Replacement type field, if the record needs one
    #[must_use]
    pub fn new_type(&self) -> Option<String> {
        if self.is_changed() {
            self.resolved.as_ref().map(|resolved| resolved.join("/"))
        } else {
            None
        }
    }

    /// Reported types as written to the ledger
    #[must_use]
    pub fn old_type(&self) -> String {
        self.reported.join(",")
    }
}

/// How strictly reported types are checked
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions {
    /// Look up the scheme even when the reported types already agree with the
    /// candidate count, so concrete types absent from the scheme are repaired
    pub verify_defined: bool,
}

/// Check one record against its scheme. Nothing is written.
///
/// # Errors
///
/// Returns parse errors for a malformed type field,
/// `ReconcileError::MalformedScheme` / `EmptyCandidateSet` for unusable allele
/// calls, and scheme errors if the lookup fails.
pub fn reconcile_record(
    record: &MlstRecord,
    repository: &dyn SchemeRepository,
    options: ReconcileOptions,
) -> Result<Reconciliation, ReconcileError> {
    let reported = record.normalized_type()?;
    let locus_names = record.locus_names();
    debug!(reported = ?reported.tokens(), loci = ?locus_names, "Current MLST type");
    for call in record.loci.iter().filter(|call| call.is_ambiguous()) {
        debug!(locus = %call.locus, alleles = ?call.alleles, "Ambiguous locus");
    }

    let candidates = enumerate_candidates(&record.loci)?;
    debug!(count = candidates.len(), "Enumerated candidate profiles");

    let verdict = check_consistency(candidates.len(), &reported)?;
    info!(sample = %record.sample, "Sample is {}", verdict.describe());

    let resolved = if verdict.needs_lookup() || options.verify_defined {
        let reader = repository.open(&record.scheme)?;
        let types = lookup_types(reader, &record.scheme, &locus_names, &candidates)?;
        Some(resolve_types(&types))
    } else {
        None
    };

    let mut reconciliation = Reconciliation {
        sample: record.sample.clone(),
        scheme: record.scheme.clone(),
        file_type: record.file_type,
        verdict,
        candidates: candidates.len(),
        reported: reported.tokens(),
        resolved,
        anomaly: None,
    };

    if let Some(new_type) = reconciliation.new_type() {
        reconciliation.anomaly = Anomaly::classify(&new_type, &candidates, &locus_names);
    }

    Ok(reconciliation)
}

/// Checks record files and persists repairs to the record and ledgers
pub struct Reconciler<'a> {
    repository: &'a dyn SchemeRepository,
    blanks: &'a mut dyn LedgerWriter,
    updated: &'a mut dyn LedgerWriter,
    options: ReconcileOptions,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        repository: &'a dyn SchemeRepository,
        blanks: &'a mut dyn LedgerWriter,
        updated: &'a mut dyn LedgerWriter,
    ) -> Self {
        Self {
            repository,
            blanks,
            updated,
            options: ReconcileOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ReconcileOptions) -> Self {
        self.options = options;
        self
    }

    /// Read a record file; SRST2 records take their scheme from the filename
    ///
    /// # Errors
    ///
    /// Returns parse errors for unreadable or malformed files and
    /// `SchemeError::DatabaseNotFound` if an SRST2 record's organism has no scheme.
    pub fn load_record(&self, path: &Path, file_type: FileType) -> Result<MlstRecord, ReconcileError> {
        let record = match file_type {
            FileType::Standard => parse_standard_file(path)?,
            FileType::Srst2 => {
                let scheme = find_scheme_for_path(path, self.repository)?;
                parse_srst2_file(path, scheme)?
            }
        };
        Ok(record)
    }

    /// Check a record file and repair it if needed
    ///
    /// # Errors
    ///
    /// Any error aborts before the record or the ledgers are written.
    pub fn check_file(
        &mut self,
        path: &Path,
        file_type: FileType,
    ) -> Result<Reconciliation, ReconcileError> {
        info!(path = %path.display(), "Parsing MLST file");
        let mut record = self.load_record(path, file_type)?;
        let reconciliation = reconcile_record(&record, self.repository, self.options)?;

        if reconciliation.is_changed() {
            self.apply(&mut record, path, &reconciliation)?;
        } else {
            info!(
                path = %path.display(),
                types = ?reconciliation.reported,
                "Record is as good as it gets"
            );
        }

        Ok(reconciliation)
    }

    /// Rewrite the record with its reconciled type and append the ledger lines
    ///
    /// # Errors
    ///
    /// Returns a ledger error if a ledger cannot be opened, in which case the
    /// record is left as it was, `ReconcileError::Rewrite` if the record
    /// cannot be replaced, or a ledger error if an append fails.
    pub fn apply(
        &mut self,
        record: &mut MlstRecord,
        path: &Path,
        reconciliation: &Reconciliation,
    ) -> Result<(), ReconcileError> {
        let Some(new_type) = reconciliation.new_type() else {
            return Ok(());
        };
        let identifier = ledger_identifier(&path.to_string_lossy());

        info!(
            path = %path.display(),
            "Updating MLST types from {} to {new_type}",
            reconciliation.old_type()
        );

        let blank = reconciliation.anomaly.as_ref().map(|anomaly| {
            if anomaly.is_profile_level() {
                warn!("Must submit profile(s) for: {identifier}");
            } else if record.file_type == FileType::Standard {
                warn!("Investigate/Submit allele or maybe try srst2 to fix allele issue on: {identifier}");
            } else {
                warn!("Investigate/Submit allele to fix allele issue on: {identifier}");
            }
            LedgerEntry::Blank {
                identifier: identifier.clone(),
                labels: anomaly.labels.clone(),
                fields: record.trailing_fields().to_vec(),
            }
        });

        if blank.is_some() {
            self.blanks.prepare()?;
        }
        self.updated.prepare()?;

        record.set_type(&new_type);
        rewrite_atomically(path, &record.to_text()).map_err(|source| ReconcileError::Rewrite {
            path: path.display().to_string(),
            source,
        })?;

        if let Some(entry) = blank {
            self.blanks.append(&entry)?;
        }
        self.updated.append(&LedgerEntry::Updated {
            identifier,
            scheme: reconciliation.scheme.clone(),
            old_type: reconciliation.old_type(),
            new_type,
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::standard::parse_standard_text;
    use crate::scheme::repository::MemorySchemeRepository;

    const SCHEME: &str = "ST\tgltA\tgyrB\tgdhB\trecA\tcpn60\tgpi\trpoD\tclonal_complex\n\
2\t1\t3\t3\t2\t2\t96\t3\tCC2\n\
10\t1\t3\t189\t2\t2\t96\t3\t\n\
11\t1\t3\t189\t2\t2\t107\t3\t\n";

    fn repository() -> MemorySchemeRepository {
        MemorySchemeRepository::new().with_scheme("abaumannii", SCHEME)
    }

    fn record(st: &str, gdh: &str, gpi: &str) -> MlstRecord {
        parse_standard_text(&format!(
            "S1\tabaumannii\t{st}\tgltA(1)\tgyrB(3)\tgdhB({gdh})\trecA(2)\tcpn60(2)\tgpi({gpi})\trpoD(3)\n"
        ))
        .unwrap()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_consistency_rules() {
        let single = |s: &str| ReportedType::normalize(s).unwrap();
        assert!(matches!(
            check_consistency(0, &single("1")),
            Err(ReconcileError::EmptyCandidateSet)
        ));
        assert_eq!(check_consistency(1, &single("5")).unwrap(), Verdict::SingularDefined);
        assert_eq!(check_consistency(1, &single("-")).unwrap(), Verdict::SingularUndefined);
        assert_eq!(check_consistency(1, &single("1/2")).unwrap(), Verdict::SingularDefined);
        assert_eq!(check_consistency(1, &single("5/-")).unwrap(), Verdict::SingularDefined);
        assert_eq!(check_consistency(1, &single("-/5")).unwrap(), Verdict::SingularUndefined);
        assert_eq!(check_consistency(1, &single("ND")).unwrap(), Verdict::SingularUndefined);
        assert_eq!(check_consistency(2, &single("10/11")).unwrap(), Verdict::MultipleDefined);
        assert_eq!(check_consistency(2, &single("10/-")).unwrap(), Verdict::MultipleUndefined);
        assert_eq!(check_consistency(4, &single("10/11")).unwrap(), Verdict::TooFewTypes);
        assert_eq!(check_consistency(2, &single("5")).unwrap(), Verdict::TooFewTypes);
        assert_eq!(check_consistency(2, &single("1,2,3")).unwrap(), Verdict::TooManyTypes);
    }

    #[test]
    fn test_resolve_types_sorting() {
        assert_eq!(
            resolve_types(&[None, Some(11), Some(10), None, Some(2)]),
            vec!["2", "10", "11", "-", "-"]
        );
        assert_eq!(resolve_types(&[None]), vec!["-"]);
    }

    #[test]
    fn test_anomaly_single_profile() {
        let candidates = vec![Profile(names(&["1", "3", "3", "2", "2", "4", "3"]))];
        let loci = names(&["gltA", "gyrB", "gdhB", "recA", "cpn60", "gpi", "rpoD"]);
        let anomaly = Anomaly::classify("-", &candidates, &loci).unwrap();
        assert_eq!(anomaly.labels, vec![PROFILE_UNDEFINED]);
        assert!(anomaly.is_profile_level());
    }

    #[test]
    fn test_anomaly_multiple_profiles() {
        let anomaly = Anomaly::classify("-/-", &[], &[]).unwrap();
        assert_eq!(anomaly.label(), PROFILES_UNDEFINED);
    }

    #[test]
    fn test_anomaly_names_loci() {
        let loci = names(&["gltA", "gyrB", "gdhB", "recA", "cpn60", "gpi", "rpoD"]);
        let candidates = vec![
            Profile(names(&["1", "3", "~3", "2", "2", "96", "3"])),
            Profile(names(&["1", "3", "~3", "2", "2", "12?", "3"])),
        ];
        let anomaly = Anomaly::classify("-/-", &candidates, &loci).unwrap();
        assert_eq!(anomaly.labels, vec!["Allele(s)-gdhB", "gpi"]);
        assert!(!anomaly.is_profile_level());
    }

    #[test]
    fn test_anomaly_none_when_resolved() {
        assert!(Anomaly::classify("10/11", &[], &[]).is_none());
    }

    #[test]
    fn test_reconcile_consistent_multiple() {
        let reconciliation =
            reconcile_record(&record("10/11", "189", "96,107"), &repository(), ReconcileOptions::default())
                .unwrap();
        assert_eq!(reconciliation.verdict, Verdict::MultipleDefined);
        assert!(reconciliation.resolved.is_none());
        assert!(!reconciliation.is_changed());
    }

    #[test]
    fn test_reconcile_swapped_order_is_consistent() {
        let options = ReconcileOptions {
            verify_defined: true,
        };
        let reconciliation =
            reconcile_record(&record("11/10", "189", "107,96"), &repository(), options).unwrap();
        assert_eq!(
            reconciliation.resolved,
            Some(vec!["10".to_string(), "11".to_string()])
        );
        assert!(!reconciliation.is_changed());
    }

    #[test]
    fn test_reconcile_fills_missing_types() {
        let reconciliation =
            reconcile_record(&record("10", "189", "96,107"), &repository(), ReconcileOptions::default())
                .unwrap();
        assert_eq!(reconciliation.verdict, Verdict::TooFewTypes);
        assert_eq!(reconciliation.new_type().as_deref(), Some("10/11"));
        assert!(reconciliation.anomaly.is_none());
    }

    #[test]
    fn test_reconcile_single_profile_extra_types_untouched() {
        let reconciliation =
            reconcile_record(&record("2/5", "3", "96"), &repository(), ReconcileOptions::default())
                .unwrap();
        assert_eq!(reconciliation.verdict, Verdict::SingularDefined);
        assert!(reconciliation.resolved.is_none());
        assert!(!reconciliation.is_changed());
    }

    #[test]
    fn test_reconcile_placeholder_allele() {
        let reconciliation =
            reconcile_record(&record("-", "3", "~96"), &repository(), ReconcileOptions::default())
                .unwrap();
        assert_eq!(reconciliation.verdict, Verdict::SingularUndefined);
        assert_eq!(reconciliation.resolved, Some(vec!["-".to_string()]));
        assert!(!reconciliation.is_changed());
        assert!(reconciliation.anomaly.is_none());
    }

    #[test]
    fn test_reconcile_verify_defined_repairs_unknown_type() {
        let options = ReconcileOptions {
            verify_defined: true,
        };
        let reconciliation = reconcile_record(&record("5", "3", "4"), &repository(), options).unwrap();
        assert_eq!(reconciliation.new_type().as_deref(), Some("-"));
        assert_eq!(
            reconciliation.anomaly.map(|a| a.labels),
            Some(vec![PROFILE_UNDEFINED.to_string()])
        );
    }

    #[test]
    fn test_reconcile_unknown_scheme() {
        let mut record = record("-", "3", "96");
        record.scheme = "ecoli".to_string();
        let result = reconcile_record(&record, &repository(), ReconcileOptions::default());
        assert_eq!(
            result.unwrap_err().exit_code(),
            crate::matching::exit_code::DATABASE_NOT_FOUND
        );
    }
}
