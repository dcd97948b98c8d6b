use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::color::{ColorMap, Rgb};
use crate::data::filter::{OutcomeDistribution, SiteSelection};
use crate::data::model::LaunchRecord;
use crate::ui::page::escape_html;

pub const PAYLOAD_AXIS_LABEL: &str = "Payload Mass (kg)";
pub const OUTCOME_AXIS_LABEL: &str = "Launch Outcome";

// Seaborn-like plot background, as the original dashboard's figures used.
const PLOT_BACKGROUND: &str = "#eaeaf2";
const GRID_COLOR: &str = "#ffffff";

// ---------------------------------------------------------------------------
// Pie chart (outcome distribution)
// ---------------------------------------------------------------------------

/// Raw counts behind an all-sites slice, shown on hover.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceHover {
    pub successes: usize,
    pub total: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub hover: Option<SliceHover>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub title: String,
    /// Legend heading: what the slice labels name.
    pub legend_title: &'static str,
    pub slices: Vec<PieSlice>,
}

pub fn pie_title(selection: &SiteSelection) -> String {
    match selection {
        SiteSelection::All => "Total Success for Each Launch Site".to_string(),
        SiteSelection::Site(site) => format!("Success vs Failure for {site}"),
    }
}

/// Map an outcome distribution to a pie chart: one slice per entry.
pub fn pie_chart(distribution: &OutcomeDistribution, selection: &SiteSelection) -> PieChart {
    let slices = match distribution {
        OutcomeDistribution::BySite(sites) => sites
            .iter()
            .map(|s| PieSlice {
                label: s.site.clone(),
                value: s.percentage,
                hover: Some(SliceHover {
                    successes: s.successes,
                    total: s.total,
                    percentage: s.percentage,
                }),
            })
            .collect(),
        OutcomeDistribution::SiteOutcomes { .. } => distribution
            .entries()
            .into_iter()
            .map(|e| PieSlice {
                label: e.label,
                value: e.value,
                hover: None,
            })
            .collect(),
    };

    let legend_title = match distribution {
        OutcomeDistribution::BySite(_) => "Launch Site",
        OutcomeDistribution::SiteOutcomes { .. } => OUTCOME_AXIS_LABEL,
    };

    PieChart {
        title: pie_title(selection),
        legend_title,
        slices,
    }
}

impl PieChart {
    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value).sum()
    }

    /// Plotly figure (`data` + `layout`) for the browser.
    pub fn figure(&self) -> Value {
        let labels: Vec<&str> = self.slices.iter().map(|s| s.label.as_str()).collect();
        let values: Vec<f64> = self.slices.iter().map(|s| s.value).collect();

        let mut trace = json!({
            "type": "pie",
            "labels": labels,
            "values": values,
            "sort": false,
        });

        if self.slices.iter().all(|s| s.hover.is_some()) && !self.slices.is_empty() {
            let custom: Vec<Value> = self
                .slices
                .iter()
                .filter_map(|s| s.hover)
                .map(|h| json!([h.successes, h.total, h.percentage]))
                .collect();
            trace["customdata"] = Value::Array(custom);
            trace["hovertemplate"] = json!(
                "%{label}<br>successes: %{customdata[0][0]} of %{customdata[0][1]}<br>\
                 success rate: %{customdata[0][2]:.1f}%<extra></extra>"
            );
        }

        json!({
            "data": [trace],
            "layout": base_layout(&self.title, self.legend_title),
        })
    }
}

// ---------------------------------------------------------------------------
// Scatter chart (payload vs outcome)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub payload_mass_kg: f64,
    /// Outcome flag, 0 or 1.
    pub outcome: u8,
    pub hover: String,
}

/// All points of one booster version category.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub name: String,
    pub color: Rgb,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterChart {
    pub title: String,
    pub series: Vec<ScatterSeries>,
}

pub fn scatter_title(selection: &SiteSelection) -> String {
    match selection {
        SiteSelection::All => "Payload vs Launch Outcome".to_string(),
        SiteSelection::Site(site) => format!("Payload vs Launch Outcome for {site}"),
    }
}

/// Map a correlation subset to a scatter chart, one series per booster
/// category in sorted order.
pub fn scatter_chart(
    subset: &[&LaunchRecord],
    selection: &SiteSelection,
    colors: &ColorMap,
) -> ScatterChart {
    let mut grouped: BTreeMap<&str, Vec<ScatterPoint>> = BTreeMap::new();
    for rec in subset {
        grouped
            .entry(rec.booster_category.as_str())
            .or_default()
            .push(ScatterPoint {
                payload_mass_kg: rec.payload_mass_kg,
                outcome: rec.outcome.as_class(),
                hover: point_hover(rec),
            });
    }

    let series = grouped
        .into_iter()
        .map(|(name, points)| ScatterSeries {
            name: name.to_string(),
            color: colors.color_for(name),
            points,
        })
        .collect();

    ScatterChart {
        title: scatter_title(selection),
        series,
    }
}

/// Plotly renders hover text as HTML, so data fields are escaped.
fn point_hover(rec: &LaunchRecord) -> String {
    let mut text = String::new();
    if let Some(flight) = rec.flight_number {
        text.push_str(&format!("Flight {flight}<br>"));
    }
    text.push_str(&escape_html(&rec.site));
    if let Some(version) = &rec.booster_version {
        text.push_str(&format!("<br>{}", escape_html(version)));
    }
    text.push_str(&format!("<br>{}", rec.outcome));
    text
}

impl ScatterChart {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    pub fn figure(&self) -> Value {
        let traces: Vec<Value> = self
            .series
            .iter()
            .map(|s| {
                let x: Vec<f64> = s.points.iter().map(|p| p.payload_mass_kg).collect();
                let y: Vec<u8> = s.points.iter().map(|p| p.outcome).collect();
                let text: Vec<&str> = s.points.iter().map(|p| p.hover.as_str()).collect();
                json!({
                    "type": "scatter",
                    "mode": "markers",
                    "name": s.name,
                    "x": x,
                    "y": y,
                    "text": text,
                    "hovertemplate": "%{text}<br>payload: %{x} kg<extra>%{fullData.name}</extra>",
                    "marker": { "color": s.color, "size": 10, "opacity": 0.85 },
                })
            })
            .collect();

        let mut layout = base_layout(&self.title, "Booster Version Category");
        layout["xaxis"] = json!({
            "title": { "text": PAYLOAD_AXIS_LABEL },
            "gridcolor": GRID_COLOR,
            "zeroline": false,
        });
        layout["yaxis"] = json!({
            "title": { "text": OUTCOME_AXIS_LABEL },
            "tickvals": [0, 1],
            "range": [-0.25, 1.25],
            "gridcolor": GRID_COLOR,
        });

        json!({ "data": traces, "layout": layout })
    }
}

fn base_layout(title: &str, legend_title: &str) -> Value {
    json!({
        "title": { "text": title },
        "legend": { "title": { "text": legend_title } },
        "plot_bgcolor": PLOT_BACKGROUND,
        "paper_bgcolor": "#ffffff",
        "font": { "family": "Arial, sans-serif" },
    })
}
