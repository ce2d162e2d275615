//! Run outcomes and exit signaling.

use crate::verify::VerificationReport;

/// Outcome of one migration run, per invocation mode.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Creation run finished; mapping written.
    Migrated {
        /// Tickets created.
        created: usize,
    },

    /// Dry-run preview finished; no side effects.
    DryRun {
        /// Tickets that would be created.
        candidates: usize,
    },

    /// Comment replay finished; log written.
    Comments {
        /// Pairs that had source comments.
        pairs: usize,
        /// Comments created by this run.
        migrated: usize,
        /// Comments already present.
        skipped: usize,
    },

    /// Verification finished.
    Verified {
        /// Accumulated findings across all pairs.
        report: VerificationReport,
    },

    /// Attribution cleanup finished.
    Cleaned {
        /// Comments actually rewritten.
        updated: usize,
    },
}

impl RunOutcome {
    /// Process exit code for this outcome.
    ///
    /// Verification findings signal `1`, distinct from the `2` used for
    /// fatal errors; everything else is `0`.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Verified { report } if !report.is_parity() => 1,
            _ => 0,
        }
    }

    /// Prints a human-readable summary to stdout.
    pub fn print(&self) {
        match self {
            Self::Migrated { created } => {
                if *created == 0 {
                    println!("Nothing to migrate.");
                } else {
                    println!("Migrated {created} ticket(s); mapping written.");
                }
            }
            Self::DryRun { candidates } => {
                println!("[DRY RUN] {candidates} ticket(s) would be migrated.");
            }
            Self::Comments {
                pairs,
                migrated,
                skipped,
            } => {
                println!(
                    "Replayed comments for {pairs} pair(s): {migrated} migrated, {skipped} skipped."
                );
            }
            Self::Verified { report } => {
                if report.is_parity() {
                    println!("Verified {} pair(s); full parity.", report.pairs_checked);
                } else {
                    println!(
                        "Verified {} pair(s); {} mismatch(es):",
                        report.pairs_checked,
                        report.findings.len()
                    );
                    for finding in &report.findings {
                        println!(
                            "  #{} -> #{} {}: expected {:?}, got {:?}",
                            finding.old,
                            finding.new,
                            finding.field,
                            finding.expected.as_deref().unwrap_or("(none)"),
                            finding.got.as_deref().unwrap_or("(none)")
                        );
                    }
                }
            }
            Self::Cleaned { updated } => {
                println!("Cleaned attribution on {updated} comment(s).");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::Finding;

    #[test]
    fn verification_findings_signal_exit_code_one() {
        let mut report = VerificationReport::default();
        report.pairs_checked = 1;
        assert_eq!(RunOutcome::Verified { report: report.clone() }.exit_code(), 0);

        report.findings.push(Finding {
            old: 5,
            new: 42,
            field: "labels",
            expected: None,
            got: None,
        });
        assert_eq!(RunOutcome::Verified { report }.exit_code(), 1);
    }

    #[test]
    fn other_outcomes_exit_zero() {
        assert_eq!(RunOutcome::Migrated { created: 3 }.exit_code(), 0);
        assert_eq!(RunOutcome::DryRun { candidates: 3 }.exit_code(), 0);
        assert_eq!(
            RunOutcome::Comments {
                pairs: 1,
                migrated: 0,
                skipped: 3
            }
            .exit_code(),
            0
        );
        assert_eq!(RunOutcome::Cleaned { updated: 0 }.exit_code(), 0);
    }
}
