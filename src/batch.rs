//! The batch pipeline shared by all four resource kinds.
//!
//! Rows move through `Pending -> {Invalid | Valid} -> {Created | Failed}`;
//! preview stops after validation. One row's fate never affects another's, and
//! the report keeps every row in input order so operators always see the full
//! account of a run.

use crate::client::MailcowApi;
use crate::password::generate_password;
use crate::resource::ResourceKind;
use crate::row::Row;
use crate::validate::{validate, Validation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Preview,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Created { id: String },
    Failed { error: String },
}

#[derive(Debug)]
pub struct BatchEntry {
    pub row: Row,
    pub validation: Validation,
    pub outcome: Option<SubmissionOutcome>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn created_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, Some(SubmissionOutcome::Created { .. })))
            .count()
    }

    /// Rows that did not make it: invalid ones plus failed submissions.
    pub fn failed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| {
                !e.validation.is_valid()
                    || matches!(e.outcome, Some(SubmissionOutcome::Failed { .. }))
            })
            .count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }
}

pub struct BatchOptions {
    pub kind: ResourceKind,
    pub mode: Mode,
    /// Externally supplied field values (domain, host1, imapsync defaults, …)
    /// filled into each row without overwriting what the row brings.
    pub defaults: Row,
    /// Mailbox only: fill blank password fields with generated credentials.
    pub generate_passwords: bool,
}

/// Runs one batch to completion and returns the report, one entry per input
/// row, in input order.
///
/// Preview mode performs no API calls at all. In create mode, valid rows are
/// submitted sequentially; an API or transport failure is recorded on its row
/// and the batch moves on. Invalid rows are never submitted.
pub async fn run_batch(api: &dyn MailcowApi, rows: Vec<Row>, options: &BatchOptions) -> BatchReport {
    let mut report = BatchReport::default();

    for mut row in rows {
        row.merge_defaults(&options.defaults);

        let validation = validate(&row, options.kind);
        if !validation.is_valid() || options.mode == Mode::Preview {
            report.entries.push(BatchEntry {
                row,
                validation,
                outcome: None,
            });
            continue;
        }

        if options.kind == ResourceKind::Mailbox && row.is_blank("password") {
            if options.generate_passwords {
                // Recorded in the row so the credential is echoed in the report.
                row.set("password", generate_password());
            } else {
                report.entries.push(BatchEntry {
                    row,
                    validation,
                    outcome: Some(SubmissionOutcome::Failed {
                        error: "row has no password (use --gen-password)".to_string(),
                    }),
                });
                continue;
            }
        }

        let outcome = match api.create(options.kind, &row).await {
            Ok(id) => SubmissionOutcome::Created { id },
            Err(e) => SubmissionOutcome::Failed {
                error: e.to_string(),
            },
        };

        report.entries.push(BatchEntry {
            row,
            validation,
            outcome: Some(outcome),
        });
    }

    report
}
