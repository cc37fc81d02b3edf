//! Record transformation
//!
//! Maps source rows onto [`MedicineDocument`]s. Every row yields either a
//! document or a [`RecordRejection`]; nothing here can abort the run.

use bson::Document;
use chrono::{DateTime, Utc};
use std::fmt;
use tracing::{debug, instrument};

use crate::models::MedicineDocument;
use crate::source::{RawRecord, SourceRow};

/// Source column names
pub mod columns {
    pub const NAME: &str = "name";
    pub const PRICE: &str = "price";
    pub const MANUFACTURER: &str = "manufacturer_name";
    pub const TYPE: &str = "type";
    pub const PACK_SIZE: &str = "pack_size_label";
    pub const COMPOSITION_1: &str = "short_composition1";
    pub const COMPOSITION_2: &str = "short_composition2";
    pub const DESCRIPTION: &str = "medicine_desc";
    pub const SIDE_EFFECTS: &str = "side_effects";
    pub const DISCONTINUED: &str = "Is_discontinued";
}

/// Why a row produced no document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// `name` is absent or blank after trimming
    MissingName,
    /// The row could not be decoded
    Malformed(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::MissingName => write!(f, "missing name"),
            RejectReason::Malformed(reason) => write!(f, "malformed row: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRejection {
    pub line: u64,
    pub reason: RejectReason,
}

/// Result of transforming a whole file, in input order
#[derive(Debug, Default)]
pub struct TransformOutcome {
    pub accepted: Vec<MedicineDocument>,
    pub rejected: Vec<RecordRejection>,
}

impl TransformOutcome {
    pub fn total(&self) -> usize {
        self.accepted.len() + self.rejected.len()
    }

    /// Rejections because of a blank name
    pub fn missing_names(&self) -> usize {
        self.rejected
            .iter()
            .filter(|r| r.reason == RejectReason::MissingName)
            .count()
    }

    /// Rejections because the row could not be decoded
    pub fn malformed_rows(&self) -> usize {
        self.rejected
            .iter()
            .filter(|r| matches!(r.reason, RejectReason::Malformed(_)))
            .count()
    }
}

/// Stamps every document of a run with the same timestamp
#[derive(Debug, Clone, Copy)]
pub struct MedicineTransformer {
    stamped_at: DateTime<Utc>,
}

impl MedicineTransformer {
    pub fn new(stamped_at: DateTime<Utc>) -> Self {
        Self { stamped_at }
    }

    pub fn stamped_at(&self) -> DateTime<Utc> {
        self.stamped_at
    }

    /// Map one record.
    pub fn transform(&self, record: &RawRecord) -> Result<MedicineDocument, RejectReason> {
        let name = text(record, columns::NAME);
        if name.is_empty() {
            return Err(RejectReason::MissingName);
        }

        Ok(MedicineDocument {
            name,
            price: parse_price(record.get(columns::PRICE)),
            manufacturer: text(record, columns::MANUFACTURER),
            medicine_type: text(record, columns::TYPE),
            pack_size: text(record, columns::PACK_SIZE),
            composition: join_composition(
                record.get(columns::COMPOSITION_1),
                record.get(columns::COMPOSITION_2),
            ),
            description: text(record, columns::DESCRIPTION),
            side_effects: split_side_effects(record.get(columns::SIDE_EFFECTS)),
            interactions: Document::new(),
            is_discontinued: parse_discontinued(record.get(columns::DISCONTINUED)),
            created_at: self.stamped_at,
            updated_at: self.stamped_at,
        })
    }

    /// Map every row, keeping accepted and rejected rows apart.
    #[instrument(skip_all, fields(rows = rows.len()))]
    pub fn transform_all(&self, rows: &[SourceRow]) -> TransformOutcome {
        let mut outcome = TransformOutcome {
            accepted: Vec::with_capacity(rows.len()),
            rejected: Vec::new(),
        };

        for row in rows {
            let (line, result) = match row {
                Ok(record) => (record.line(), self.transform(record)),
                Err(malformed) => (
                    malformed.line,
                    Err(RejectReason::Malformed(malformed.reason.clone())),
                ),
            };

            match result {
                Ok(document) => outcome.accepted.push(document),
                Err(reason) => {
                    debug!(line, reason = %reason, "Skipping record");
                    outcome.rejected.push(RecordRejection { line, reason });
                },
            }
        }

        outcome
    }
}

fn text(record: &RawRecord, column: &str) -> String {
    record.get(column).map(str::trim).unwrap_or_default().to_string()
}

/// Parse a price cell; anything that is not a finite number becomes 0,
/// including `inf`, `infinity` and `NaN`.
pub fn parse_price(raw: Option<&str>) -> f64 {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|price| price.is_finite())
        .unwrap_or(0.0)
}

/// Split on commas and trim each piece. Empty pieces are kept.
pub fn split_side_effects(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(value) => value.split(',').map(|s| s.trim().to_string()).collect(),
        None => Vec::new(),
    }
}

/// Join the two composition cells with one space, ignoring absent parts.
pub fn join_composition(first: Option<&str>, second: Option<&str>) -> String {
    let first = first.map(str::trim).unwrap_or_default();
    let second = second.map(str::trim).unwrap_or_default();
    format!("{} {}", first, second).trim().to_string()
}

/// `true` only for a case-insensitive `TRUE`.
pub fn parse_discontinued(raw: Option<&str>) -> bool {
    raw.is_some_and(|value| value.to_uppercase() == "TRUE")
}
