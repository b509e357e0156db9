//! Core data types for MLST reconciliation.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`AlleleCall`]: One locus's reported allele identifiers for a sample
//! - [`Profile`]: One allele identifier per locus, in scheme order
//! - [`MlstRecord`]: A parsed MLST result file that can be written back
//! - [`ReportedType`], [`FileType`]: Reported sequence types and record layouts
//!
//! ## Placeholders
//!
//! Typing tools mark undetermined calls in several ways:
//!
//! | Marker | Meaning | Applies to |
//! |--------|---------|------------|
//! | `-`    | Missing / no match | alleles, types |
//! | `*`    | Novel allele (closest hit) | alleles |
//! | `?`    | Low-depth or partial hit | alleles |
//! | `~`    | Partial match | alleles |
//! | `ND`   | Not determined | types |
//! | `NF`   | Not found | types |
//!
//! [`AlleleCall`]: allele::AlleleCall
//! [`Profile`]: allele::Profile
//! [`MlstRecord`]: record::MlstRecord
//! [`ReportedType`]: types::ReportedType
//! [`FileType`]: types::FileType

pub mod allele;
pub mod record;
pub mod types;
