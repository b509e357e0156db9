//! Shared helpers for placeholder detection, type ordering and ledger naming.

pub mod validation;
