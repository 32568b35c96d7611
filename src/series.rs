//! Per wind speed point series derived from a VPP dataset.

use tracing::warn;

use crate::geometry::{fmt_num, vmg_to_sog, PolarPoint};
use crate::vpp::VppDataset;

/// The polar curve of one true wind speed.
#[derive(Debug, Clone, PartialEq)]
pub struct PlottedSeries {
    pub speed: f64,
    pub index: usize,
    /// Sorted by angle, zero boat speeds removed, beat/run points included.
    pub points: Vec<PolarPoint>,
    pub beat: Option<PolarPoint>,
    pub run: Option<PolarPoint>,
}

impl PlottedSeries {
    /// Class tag shared by everything drawn for this wind speed, e.g. `tws-6`.
    pub fn tag(&self) -> String {
        tws_tag(self.speed)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

pub fn tws_tag(speed: f64) -> String {
    format!("tws-{}", fmt_num(speed))
}

pub fn twa_tag(angle: f64) -> String {
    format!("twa-{}", fmt_num(angle))
}

/// Build one series per wind speed, in `speeds` order.
pub fn build_series(vpp: &VppDataset) -> Vec<PlottedSeries> {
    vpp.speeds
        .iter()
        .enumerate()
        .map(|(i, &speed)| {
            let mut points: Vec<PolarPoint> = vpp
                .angles
                .iter()
                .zip(vpp.column(i))
                .filter(|(_, sog)| *sog > 0.0)
                .map(|(&angle, sog)| PolarPoint::from_degrees(angle, sog))
                .collect();

            let beat = vpp
                .beat
                .as_ref()
                .and_then(|b| b.get(i))
                .and_then(|(angle, vmg)| optimum_point("beat", speed, angle, vmg));
            let run = vpp
                .run
                .as_ref()
                .and_then(|r| r.get(i))
                .and_then(|(angle, vmg)| optimum_point("run", speed, angle, -vmg));

            if let Some(point) = beat {
                points.insert(0, point);
            }
            if let Some(point) = run {
                points.push(point);
            }
            points.sort_by(|a, b| a.angle.total_cmp(&b.angle));

            PlottedSeries {
                speed,
                index: i,
                points,
                beat,
                run,
            }
        })
        .collect()
}

fn optimum_point(kind: &str, speed: f64, angle: f64, vmg: f64) -> Option<PolarPoint> {
    match vmg_to_sog(angle, vmg) {
        Ok(sog) => Some(PolarPoint::from_degrees(angle, sog)),
        Err(e) => {
            warn!("Skipping {} point for {} kts: {}", kind, speed, e);
            None
        }
    }
}
