//! Verification finding types.

use serde::Serialize;

/// A single field mismatch between a mapped pair of tickets.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    /// Source ticket number.
    pub old: u64,

    /// Destination ticket number.
    pub new: u64,

    /// Name of the mismatched field.
    pub field: &'static str,

    /// Value on the source side, if representable.
    pub expected: Option<String>,

    /// Value on the destination side, if representable.
    pub got: Option<String>,
}

/// Accumulated result of a full verification pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VerificationReport {
    /// Number of mapped pairs compared.
    pub pairs_checked: usize,

    /// Every field mismatch found, across all pairs.
    pub findings: Vec<Finding>,
}

impl VerificationReport {
    /// True iff no pair had any mismatched field.
    #[must_use]
    pub fn is_parity(&self) -> bool {
        self.findings.is_empty()
    }
}
