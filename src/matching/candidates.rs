use itertools::Itertools;

use crate::core::allele::{AlleleCall, Profile};
use crate::matching::ReconcileError;
use crate::utils::validation::check_locus_count;

/// Expand ambiguous allele calls into every candidate profile.
///
/// The candidates are the Cartesian product of each locus's allele list, in
/// locus order, so their count is the product of the per-locus list lengths.
/// A locus with no alleles yields no candidates at all.
///
/// # Errors
///
/// Returns `ReconcileError::MalformedScheme` unless the record has 7 or 8 loci.
pub fn enumerate_candidates(loci: &[AlleleCall]) -> Result<Vec<Profile>, ReconcileError> {
    if let Some(message) = check_locus_count(loci.len()) {
        return Err(ReconcileError::MalformedScheme(message));
    }

    let mut candidates = Vec::with_capacity(candidate_count(loci));
    candidates.extend(
        loci.iter()
            .map(|call| call.alleles.iter().cloned())
            .multi_cartesian_product()
            .map(Profile),
    );
    Ok(candidates)
}

/// Number of candidates [`enumerate_candidates`] would produce
#[must_use]
pub fn candidate_count(loci: &[AlleleCall]) -> usize {
    loci.iter().map(|call| call.alleles.len()).product()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loci(lists: &[&str]) -> Vec<AlleleCall> {
        lists
            .iter()
            .enumerate()
            .map(|(i, list)| AlleleCall::from_list(format!("locus{i}"), list))
            .collect()
    }

    #[test]
    fn test_single_profile() {
        let candidates = enumerate_candidates(&loci(&["1", "3", "3", "2", "2", "96", "3"])).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].alleles(), ["1", "3", "3", "2", "2", "96", "3"]);
    }

    #[test]
    fn test_ambiguous_expansion_order() {
        let calls = loci(&["1", "3", "189,3", "2", "2", "96,107", "3"]);
        let candidates = enumerate_candidates(&calls).unwrap();
        assert_eq!(candidates.len(), 4);
        assert_eq!(candidate_count(&calls), 4);

        let by_locus: Vec<(&str, &str)> = candidates
            .iter()
            .map(|p| (p.alleles()[2].as_str(), p.alleles()[5].as_str()))
            .collect();
        assert_eq!(
            by_locus,
            vec![("189", "96"), ("189", "107"), ("3", "96"), ("3", "107")]
        );
    }

    #[test]
    fn test_cardinality_is_product() {
        let calls = loci(&["1,2", "1,2,3", "1", "1", "4,5", "1", "1", "7,8"]);
        let candidates = enumerate_candidates(&calls).unwrap();
        assert_eq!(candidates.len(), 2 * 3 * 2 * 2);
        assert_eq!(candidates.len(), candidate_count(&calls));
        assert!(candidates.iter().all(|p| p.alleles().len() == 8));
    }

    #[test]
    fn test_empty_locus_yields_no_candidates() {
        let calls = loci(&["1", "", "1", "1", "1", "1", "1"]);
        assert!(enumerate_candidates(&calls).unwrap().is_empty());
    }

    #[test]
    fn test_unsupported_arity() {
        for n in [0, 1, 6, 9, 12] {
            let calls = loci(&vec!["1"; n]);
            assert!(matches!(
                enumerate_candidates(&calls),
                Err(ReconcileError::MalformedScheme(_))
            ));
        }
    }
}
