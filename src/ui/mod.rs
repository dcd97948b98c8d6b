//! Presentation layer: chart specifications and the dashboard page.

pub mod page;
pub mod plot;
