use thiserror::Error;

/// Errors raised while loading or plotting a VPP dataset.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("invalid dataset shape: {0}")]
    InvalidDatasetShape(String),

    /// `vmg / cos(angle)` has no finite positive answer at this angle.
    #[error("cannot convert VMG {vmg} at {angle}° to boat speed")]
    DegenerateVmgAngle { angle: f64, vmg: f64 },

    #[error("malformed dataset JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PlotError>;
