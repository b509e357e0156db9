use std::io::BufRead;

use tracing::debug;

use crate::core::allele::Profile;
use crate::scheme::SchemeError;

/// First column of the header row
const HEADER_MARKER: &str = "ST";

/// Trailing annotation columns that end the locus list
const ANNOTATION_COLUMNS: [&str; 2] = ["clonal_complex", "species"];

/// Look up the sequence type of every candidate profile in a scheme table.
///
/// The table is streamed once. Each candidate takes the ST of the first row
/// whose locus values equal it; every row is still compared against all
/// candidates that remain unassigned, so two candidates may share an ST.
/// The returned vector is aligned with `candidates`.
///
/// # Errors
///
/// Returns `SchemeError::SchemeMismatch` if the header loci differ from
/// `locus_names`, `SchemeError::MissingHeader` if a profile row precedes the
/// header or the table has none, `SchemeError::InvalidRow` if an ST is not an
/// integer, or `SchemeError::Io` on read failure.
pub fn lookup_types<R: BufRead>(
    reader: R,
    scheme: &str,
    locus_names: &[String],
    candidates: &[Profile],
) -> Result<Vec<Option<u64>>, SchemeError> {
    let mut types: Vec<Option<u64>> = vec![None; candidates.len()];
    let mut locus_count: Option<usize> = None;

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();

        if fields[0] == HEADER_MARKER {
            let loci: Vec<String> = fields[1..]
                .iter()
                .take_while(|name| !ANNOTATION_COLUMNS.contains(*name))
                .map(|name| (*name).to_string())
                .collect();
            if loci != locus_names {
                return Err(SchemeError::SchemeMismatch {
                    expected: locus_names.to_vec(),
                    found: loci,
                });
            }
            debug!(scheme, loci = ?loci, "Scheme loci match record");
            locus_count = Some(loci.len());
            continue;
        }

        let n = locus_count.ok_or_else(|| SchemeError::MissingHeader(scheme.to_string()))?;

        let st: u64 = fields[0].parse().map_err(|_| SchemeError::InvalidRow {
            scheme: scheme.to_string(),
            line: i + 1,
            message: format!("sequence type '{}' is not an integer", fields[0]),
        })?;

        let Some(row) = fields.get(1..=n) else {
            continue;
        };

        for (index, candidate) in candidates.iter().enumerate() {
            if types[index].is_none() && candidate.matches(row) {
                debug!(st, profile = %candidate, "Match");
                types[index] = Some(st);
            }
        }
    }

    if locus_count.is_none() {
        return Err(SchemeError::MissingHeader(scheme.to_string()));
    }

    Ok(types)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEME: &str = "ST\tgltA\tgyrB\tgdhB\trecA\tcpn60\tgpi\trpoD\tclonal_complex\n\
1\t1\t1\t1\t1\t5\t1\t1\tCC1\n\
2\t1\t3\t3\t2\t2\t96\t3\tCC2\n\
10\t1\t3\t189\t2\t2\t96\t3\t\n\
11\t1\t3\t189\t2\t2\t107\t3\t\n\
99\t1\t3\t3\t2\t2\t96\t3\tCC2\n";

    fn names() -> Vec<String> {
        ["gltA", "gyrB", "gdhB", "recA", "cpn60", "gpi", "rpoD"]
            .iter()
            .map(|s| (*s).to_string())
            .collect()
    }

    fn profile(alleles: &str) -> Profile {
        Profile(alleles.split(',').map(str::to_string).collect())
    }

    #[test]
    fn test_lookup_assigns_types() {
        let candidates = vec![profile("1,3,189,2,2,107,3"), profile("1,1,1,1,5,1,1")];
        let types = lookup_types(SCHEME.as_bytes(), "ab", &names(), &candidates).unwrap();
        assert_eq!(types, vec![Some(11), Some(1)]);
    }

    #[test]
    fn test_first_matching_row_wins() {
        let candidates = vec![profile("1,3,3,2,2,96,3")];
        let types = lookup_types(SCHEME.as_bytes(), "ab", &names(), &candidates).unwrap();
        assert_eq!(types, vec![Some(2)]);
    }

    #[test]
    fn test_unmatched_and_placeholder_candidates() {
        let candidates = vec![profile("1,3,3,2,2,4,3"), profile("1,3,3,2,2,96,-")];
        let types = lookup_types(SCHEME.as_bytes(), "ab", &names(), &candidates).unwrap();
        assert_eq!(types, vec![None, None]);
    }

    #[test]
    fn test_duplicate_candidates_share_type() {
        let candidates = vec![profile("1,1,1,1,5,1,1"), profile("1,1,1,1,5,1,1")];
        let types = lookup_types(SCHEME.as_bytes(), "ab", &names(), &candidates).unwrap();
        assert_eq!(types, vec![Some(1), Some(1)]);
    }

    #[test]
    fn test_species_column_ends_loci() {
        let table = "ST\ta\tb\tspecies\n7\t1\t2\tE. coli\n";
        let names = vec!["a".to_string(), "b".to_string()];
        let types = lookup_types(table.as_bytes(), "x", &names, &[profile("1,2")]).unwrap();
        assert_eq!(types, vec![Some(7)]);
    }

    #[test]
    fn test_scheme_mismatch() {
        let mut reordered = names();
        reordered.swap(0, 1);
        let result = lookup_types(SCHEME.as_bytes(), "ab", &reordered, &[]);
        assert!(matches!(result, Err(SchemeError::SchemeMismatch { .. })));
    }

    #[test]
    fn test_missing_header() {
        let result = lookup_types("1\t1\t1\n".as_bytes(), "ab", &names(), &[]);
        assert!(matches!(result, Err(SchemeError::MissingHeader(_))));

        let result = lookup_types("".as_bytes(), "ab", &names(), &[]);
        assert!(matches!(result, Err(SchemeError::MissingHeader(_))));
    }

    #[test]
    fn test_invalid_st() {
        let table = "ST\ta\nX1\t1\n";
        let names = vec!["a".to_string()];
        let result = lookup_types(table.as_bytes(), "x", &names, &[profile("1")]);
        assert!(matches!(
            result,
            Err(SchemeError::InvalidRow { line: 2, .. })
        ));
    }
}
