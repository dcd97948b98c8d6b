use std::fmt::Write as _;

use crate::state::DashboardOptions;

pub const PAGE_TITLE: &str = "SpaceX Launch Records Dashboard";
const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const DASHBOARD_CSS: &str = include_str!("../../assets/dashboard.css");
const DASHBOARD_JS: &str = include_str!("../../assets/dashboard.js");

// ---------------------------------------------------------------------------
// Dashboard page layout
// ---------------------------------------------------------------------------

/// Render the dashboard page.
///
/// Layout, top to bottom: heading, searchable site selector, pie chart,
/// payload range control, scatter chart. Charts are filled in by the page
/// script from `/api/update`.
pub fn render_page(options: &DashboardOptions) -> String {
    let mut html = String::with_capacity(8 * 1024);
    let slider = &options.payload;
    let default = &options.default_selection;

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape_html(PAGE_TITLE));
    let _ = writeln!(html, "<script src=\"{PLOTLY_CDN}\"></script>");
    let _ = writeln!(html, "<style>\n{DASHBOARD_CSS}</style>");
    html.push_str("</head>\n<body>\n");

    // ---- Heading ----
    let _ = writeln!(
        html,
        "<h1 style=\"text-align: center; color: #503D36; font-size: 40px\">{}</h1>",
        escape_html(PAGE_TITLE)
    );

    // ---- Site selector (searchable) ----
    html.push_str("<div class=\"site-selector\">\n");
    html.push_str(
        "<input id=\"site-search\" type=\"search\" autocomplete=\"off\" \
         placeholder=\"Select a Launch Site here\">\n",
    );
    html.push_str("<select id=\"site-dropdown\">\n");
    for opt in &options.sites {
        let selected = if opt.value == default.site.as_str() {
            " selected"
        } else {
            ""
        };
        let _ = writeln!(
            html,
            "<option value=\"{}\"{selected}>{}</option>",
            escape_html(&opt.value),
            escape_html(&opt.label)
        );
    }
    html.push_str("</select>\n</div>\n<br>\n");

    // ---- Pie chart ----
    html.push_str("<div><div id=\"success-pie-chart\" class=\"chart\"></div></div>\n<br>\n");

    // ---- Payload range control ----
    html.push_str("<p>Payload range (Kg):</p>\n");
    let _ = writeln!(
        html,
        "<div id=\"payload-slider\" class=\"range\" data-min=\"{min}\" data-max=\"{max}\" data-step=\"{step}\">",
        min = slider.min,
        max = slider.max,
        step = slider.step
    );
    for (id, value) in [("payload-low", default.payload.low), ("payload-high", default.payload.high)] {
        let _ = writeln!(
            html,
            "<input id=\"{id}\" type=\"range\" min=\"{}\" max=\"{}\" step=\"{}\" value=\"{value}\">",
            slider.min, slider.max, slider.step
        );
    }
    html.push_str("<div class=\"marks\">");
    for mark in &slider.marks {
        let _ = write!(html, "<span>{mark}</span>");
    }
    html.push_str("</div>\n");
    let _ = writeln!(
        html,
        "<output id=\"payload-value\">{} – {} kg</output>",
        default.payload.low, default.payload.high
    );
    html.push_str("</div>\n");

    // ---- Scatter chart ----
    html.push_str(
        "<div><div id=\"success-payload-scatter-chart\" class=\"chart\"></div></div>\n",
    );

    let _ = writeln!(html, "<script>\n{DASHBOARD_JS}</script>");
    html.push_str("</body>\n</html>\n");
    html
}

/// Minimal escaping for text and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
