pub mod braille;
pub mod svg;
pub mod table;
#[cfg(feature = "terminal")]
pub mod terminal;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Svg,
    Terminal,
}
