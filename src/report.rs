//! Batch validation reports.

use crate::error::{ValidationError, ValidationErrorKind};
use crate::model::Tweet;
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of validating every record from one source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// File path, or `<stdin>`.
    pub source: String,
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub by_kind: BTreeMap<ValidationErrorKind, usize>,
    pub failures: Vec<Failure>,
}

/// One rejected record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    /// Position of the record in its source.
    pub index: usize,
    pub error: ValidationError,
}

impl BatchReport {
    #[must_use]
    pub fn from_results(
        source: impl Into<String>,
        results: &[Result<Tweet, ValidationError>],
    ) -> Self {
        let mut report = Self {
            source: source.into(),
            total: results.len(),
            ..Self::default()
        };

        for (index, result) in results.iter().enumerate() {
            match result {
                Ok(_) => report.valid += 1,
                Err(error) => {
                    report.invalid += 1;
                    *report.by_kind.entry(error.kind()).or_insert(0) += 1;
                    report.failures.push(Failure {
                        index,
                        error: error.clone(),
                    });
                }
            }
        }
        report
    }

    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.invalid > 0
    }

    /// Keep only the first failure (for `--fail-fast`).
    pub fn truncate_failures(&mut self) {
        self.failures.truncate(1);
    }
}

/// Totals across several reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub sources: usize,
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
}

impl Totals {
    #[must_use]
    pub fn from_reports(reports: &[BatchReport]) -> Self {
        reports.iter().fold(Self::default(), |acc, report| Self {
            sources: acc.sources + 1,
            total: acc.total + report.total,
            valid: acc.valid + report.valid,
            invalid: acc.invalid + report.invalid,
        })
    }
}
