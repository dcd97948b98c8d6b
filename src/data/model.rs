use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::error::LoadError;

// ---------------------------------------------------------------------------
// Outcome – the binary `class` column
// ---------------------------------------------------------------------------

/// Launch outcome as recorded in the `class` column (1 = success, 0 = failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    /// Decode the numeric class flag. Anything other than 0/1 is rejected.
    pub fn from_class(class: i64) -> Option<Self> {
        match class {
            1 => Some(Outcome::Success),
            0 => Some(Outcome::Failure),
            _ => None,
        }
    }

    /// The flag as plotted on the y axis of the scatter chart.
    pub fn as_class(self) -> u8 {
        match self {
            Outcome::Success => 1,
            Outcome::Failure => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Success => "Success",
            Outcome::Failure => "Failure",
        }
    }

    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single launch (one row of the source table). Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    /// `Flight Number`, if the source has it.
    pub flight_number: Option<u32>,
    /// `Launch Site` – the primary grouping key.
    pub site: String,
    /// `Payload Mass (kg)` – non-negative and finite.
    pub payload_mass_kg: f64,
    /// `class`
    pub outcome: Outcome,
    /// `Booster Version`, if the source has it.
    pub booster_version: Option<String>,
    /// `Booster Version Category` – drives point colouring.
    pub booster_category: String,
}

// ---------------------------------------------------------------------------
// LaunchDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// Inclusive payload bounds observed in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayloadBounds {
    pub min: f64,
    pub max: f64,
}

/// The full parsed dataset with pre-computed indices.
#[derive(Debug, Clone)]
pub struct LaunchDataset {
    /// All launches in file order.
    pub records: Vec<LaunchRecord>,
    /// Distinct launch sites in order of first occurrence.
    pub sites: Vec<String>,
    /// Sorted set of booster version categories.
    pub booster_categories: BTreeSet<String>,
    /// Global payload minimum / maximum, used to bound the range selector.
    pub payload_bounds: PayloadBounds,
}

impl LaunchDataset {
    /// Validate the records and build the site / category indices.
    pub fn from_records(records: Vec<LaunchRecord>) -> Result<Self, LoadError> {
        if records.is_empty() {
            return Err(LoadError::Empty);
        }

        let mut sites: Vec<String> = Vec::new();
        let mut booster_categories = BTreeSet::new();
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for (row, rec) in records.iter().enumerate() {
            if !rec.payload_mass_kg.is_finite() || rec.payload_mass_kg < 0.0 {
                return Err(LoadError::InvalidPayload {
                    row,
                    value: rec.payload_mass_kg.to_string(),
                });
            }
            if !sites.iter().any(|s| s == &rec.site) {
                sites.push(rec.site.clone());
            }
            booster_categories.insert(rec.booster_category.clone());
            min = min.min(rec.payload_mass_kg);
            max = max.max(rec.payload_mass_kg);
        }

        Ok(LaunchDataset {
            records,
            sites,
            booster_categories,
            payload_bounds: PayloadBounds { min, max },
        })
    }

    /// Number of launches.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty. Never true for a successfully loaded dataset.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_site(&self, site: &str) -> bool {
        self.sites.iter().any(|s| s == site)
    }
}
