//! Polar performance plots for sailing VPP (velocity prediction program) data.
//!
//! A [`vpp::VppDataset`] holds boat speed per true wind angle and wind speed.
//! [`chart::PolarChartModel`] turns it into one curve per wind speed on a
//! half-disc plot and draws it onto a [`surface::Surface`]: an SVG document,
//! or the braille preview in terminal mode.

pub mod chart;
pub mod cli;
pub mod color;
pub mod config;
pub mod display;
pub mod error;
pub mod events;
pub mod geometry;
pub mod series;
pub mod surface;
pub mod viewport;
pub mod vpp;
pub mod watch;

pub use chart::{Highlight, PolarChartModel};
pub use error::{PlotError, Result};
pub use vpp::VppDataset;
