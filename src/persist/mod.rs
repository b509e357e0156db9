//! Durable outputs of a reconciliation: the record rewrite and the shared
//! append-only ledgers.
//!
//! - [`ledger`]: the "blanks" and "updated types" ledgers behind a
//!   [`LedgerWriter`](ledger::LedgerWriter) trait
//! - [`rewrite`]: temp-file-then-rename replacement of a record file

pub mod ledger;
pub mod rewrite;
