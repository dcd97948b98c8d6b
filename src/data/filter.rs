use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::model::{LaunchRecord, Outcome};

// ---------------------------------------------------------------------------
// Selector values
// ---------------------------------------------------------------------------

/// Value the site selector sends for "All Sites".
pub const ALL_SITES: &str = "ALL";

/// Current value of the site selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    pub fn as_str(&self) -> &str {
        match self {
            SiteSelection::All => ALL_SITES,
            SiteSelection::Site(s) => s.as_str(),
        }
    }

    /// Whether a launch from `site` passes this selection.
    pub fn matches(&self, site: &str) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(s) => s == site,
        }
    }
}

impl From<String> for SiteSelection {
    fn from(value: String) -> Self {
        if value == ALL_SITES {
            SiteSelection::All
        } else {
            SiteSelection::Site(value)
        }
    }
}

impl From<SiteSelection> for String {
    fn from(value: SiteSelection) -> Self {
        match value {
            SiteSelection::All => ALL_SITES.to_string(),
            SiteSelection::Site(s) => s,
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive payload range `[low, high]` from the range slider.
/// Serialised as the two-element array the slider emits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct PayloadRange {
    pub low: f64,
    pub high: f64,
}

impl PayloadRange {
    pub fn new(low: f64, high: f64) -> Self {
        PayloadRange { low, high }
    }

    pub fn contains(&self, payload: f64) -> bool {
        self.low <= payload && payload <= self.high
    }

    /// An inverted range selects nothing.
    pub fn is_empty(&self) -> bool {
        self.low > self.high || self.low.is_nan() || self.high.is_nan()
    }
}

impl From<[f64; 2]> for PayloadRange {
    fn from([low, high]: [f64; 2]) -> Self {
        PayloadRange { low, high }
    }
}

impl From<PayloadRange> for [f64; 2] {
    fn from(range: PayloadRange) -> Self {
        [range.low, range.high]
    }
}

// ---------------------------------------------------------------------------
// Outcome distribution (pie chart data)
// ---------------------------------------------------------------------------

/// Success statistics of one launch site.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteSuccess {
    pub site: String,
    pub successes: usize,
    pub total: usize,
    /// `successes / total * 100`
    pub percentage: f64,
}

/// One `(label, value)` slice of the proportion chart.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionEntry {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeDistribution {
    /// All sites selected: per-site success percentage, first-occurrence order.
    BySite(Vec<SiteSuccess>),
    /// A single site selected: raw success / failure counts.
    SiteOutcomes {
        site: String,
        successes: usize,
        failures: usize,
    },
}

impl OutcomeDistribution {
    /// Flatten into chart slices. A single site always yields exactly
    /// `Success` then `Failure`.
    pub fn entries(&self) -> Vec<DistributionEntry> {
        match self {
            OutcomeDistribution::BySite(sites) => sites
                .iter()
                .map(|s| DistributionEntry {
                    label: s.site.clone(),
                    value: s.percentage,
                })
                .collect(),
            OutcomeDistribution::SiteOutcomes {
                successes,
                failures,
                ..
            } => vec![
                DistributionEntry {
                    label: Outcome::Success.label().to_string(),
                    value: *successes as f64,
                },
                DistributionEntry {
                    label: Outcome::Failure.label().to_string(),
                    value: *failures as f64,
                },
            ],
        }
    }
}

/// Compute the pie chart data for the selected site.
///
/// An unknown site is not an error: it yields two zero-valued slices.
pub fn outcome_distribution(
    records: &[LaunchRecord],
    selection: &SiteSelection,
) -> OutcomeDistribution {
    match selection {
        SiteSelection::All => OutcomeDistribution::BySite(success_by_site(records)),
        SiteSelection::Site(site) => {
            let (successes, failures) = records
                .iter()
                .filter(|r| &r.site == site)
                .fold((0, 0), |(s, f), r| {
                    if r.outcome.is_success() {
                        (s + 1, f)
                    } else {
                        (s, f + 1)
                    }
                });
            OutcomeDistribution::SiteOutcomes {
                site: site.clone(),
                successes,
                failures,
            }
        }
    }
}

fn success_by_site(records: &[LaunchRecord]) -> Vec<SiteSuccess> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();

    for r in records {
        let entry = counts.entry(r.site.as_str()).or_insert_with(|| {
            order.push(r.site.as_str());
            (0, 0)
        });
        if r.outcome.is_success() {
            entry.0 += 1;
        }
        entry.1 += 1;
    }

    order
        .into_iter()
        .map(|site| {
            let (successes, total) = counts[&site];
            SiteSuccess {
                site: site.to_string(),
                successes,
                total,
                percentage: successes as f64 / total as f64 * 100.0,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Correlation subset (scatter chart data)
// ---------------------------------------------------------------------------

/// Records whose payload lies in `range` (inclusive) and whose site passes
/// `selection`, in dataset order.
pub fn correlation_subset<'a>(
    records: &'a [LaunchRecord],
    selection: &SiteSelection,
    range: PayloadRange,
) -> Vec<&'a LaunchRecord> {
    if range.is_empty() {
        return Vec::new();
    }
    records
        .iter()
        .filter(|r| range.contains(r.payload_mass_kg) && selection.matches(&r.site))
        .collect()
}
