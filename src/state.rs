use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::color::ColorMap;
use crate::data::filter::{correlation_subset, outcome_distribution, PayloadRange, SiteSelection};
use crate::data::model::{LaunchDataset, PayloadBounds};
use crate::ui::plot::{pie_chart, scatter_chart, PieChart, ScatterChart};

/// Step of the payload range control, in kg.
pub const PAYLOAD_STEP: f64 = 1000.0;

// ---------------------------------------------------------------------------
// Inputs, outputs and the current selection
// ---------------------------------------------------------------------------

/// A user-controlled input of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Input {
    #[serde(rename = "site-dropdown")]
    SiteDropdown,
    #[serde(rename = "payload-slider")]
    PayloadSlider,
}

/// A derived chart of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Output {
    PieChart,
    ScatterChart,
}

impl Input {
    /// Outputs that must be recomputed when this input changes.
    pub fn drives(self) -> &'static [Output] {
        match self {
            Input::SiteDropdown => &[Output::PieChart, Output::ScatterChart],
            Input::PayloadSlider => &[Output::ScatterChart],
        }
    }
}

/// Current values of both inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub site: SiteSelection,
    pub payload: PayloadRange,
}

/// Charts recomputed for one input change. `None` means "unchanged".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outputs {
    pub pie: Option<PieChart>,
    pub scatter: Option<ScatterChart>,
}

// ---------------------------------------------------------------------------
// Selector options sent to the page
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderSpec {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// Positions that get a tick label.
    pub marks: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardOptions {
    pub sites: Vec<SiteOption>,
    pub payload: SliderSpec,
    pub default_selection: Selection,
}

/// Top stop of the payload range control.
///
/// A `type=range` input only lands on `min + k * step`, so the data maximum
/// is rounded up onto that grid; otherwise the browser snaps it down and the
/// heaviest launches fall outside every reachable range.
pub fn slider_max(bounds: PayloadBounds, step: f64) -> f64 {
    let steps = ((bounds.max - bounds.min) / step).ceil();
    bounds.min + steps * step
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Process-wide state: the immutable dataset and the colour map derived from
/// it. Shared read-only by every request.
pub struct AppState {
    dataset: Arc<LaunchDataset>,
    colors: ColorMap,
}

impl AppState {
    pub fn new(dataset: LaunchDataset) -> Self {
        let colors = ColorMap::new(&dataset.booster_categories);
        AppState {
            dataset: Arc::new(dataset),
            colors,
        }
    }

    pub fn payload_bounds(&self) -> PayloadBounds {
        self.dataset.payload_bounds
    }

    /// All sites, and a payload range whose upper end is the range control's
    /// top stop so the heaviest launch is included.
    pub fn default_selection(&self) -> Selection {
        let bounds = self.payload_bounds();
        Selection {
            site: SiteSelection::All,
            payload: PayloadRange::new(bounds.min, slider_max(bounds, PAYLOAD_STEP)),
        }
    }

    pub fn options(&self) -> DashboardOptions {
        let bounds = self.payload_bounds();
        let max = slider_max(bounds, PAYLOAD_STEP);
        let sites = std::iter::once(SiteOption {
            label: "All Sites".to_string(),
            value: SiteSelection::All.to_string(),
        })
        .chain(self.dataset.sites.iter().map(|s| SiteOption {
            label: s.clone(),
            value: s.clone(),
        }))
        .collect();

        DashboardOptions {
            sites,
            payload: SliderSpec {
                min: bounds.min,
                max,
                step: PAYLOAD_STEP,
                marks: vec![bounds.min, max],
            },
            default_selection: self.default_selection(),
        }
    }

    pub fn pie(&self, site: &SiteSelection) -> PieChart {
        let distribution = outcome_distribution(&self.dataset.records, site);
        pie_chart(&distribution, site)
    }

    pub fn scatter(&self, site: &SiteSelection, payload: PayloadRange) -> ScatterChart {
        let subset = correlation_subset(&self.dataset.records, site, payload);
        scatter_chart(&subset, site, &self.colors)
    }

    /// Recompute the outputs driven by `changed`. An empty `changed` is the
    /// initial render and computes everything.
    pub fn recompute(&self, selection: &Selection, changed: &[Input]) -> Outputs {
        if let SiteSelection::Site(site) = &selection.site {
            if !self.dataset.has_site(site) {
                log::warn!("Unknown launch site '{site}', rendering empty charts");
            }
        }

        let wants = |output: Output| {
            changed.is_empty() || changed.iter().any(|i| i.drives().contains(&output))
        };

        Outputs {
            pie: wants(Output::PieChart).then(|| self.pie(&selection.site)),
            scatter: wants(Output::ScatterChart)
                .then(|| self.scatter(&selection.site, selection.payload)),
        }
    }
}
