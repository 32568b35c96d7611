use clap::Parser;
use std::path::PathBuf;

use crate::color::ColorScheme;
use crate::display::DisplayMode;

#[derive(Parser, Debug)]
#[command(name = "vpp-polar")]
#[command(author, version, about = "Polar performance plots from VPP data")]
pub struct Args {
    /// VPP dataset (JSON). Reads stdin when omitted or "-"
    pub input: Option<PathBuf>,

    /// Display mode: svg or terminal
    #[arg(short, long)]
    pub mode: Option<DisplayMode>,

    /// Write the SVG here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Width of the containing element in pixels
    #[arg(long)]
    pub width: Option<f64>,

    /// Window width used for the mobile/desktop height rule
    #[arg(long)]
    pub window_width: Option<f64>,

    /// Window height used for the height rule
    #[arg(long)]
    pub window_height: Option<f64>,

    /// Highlight one table entry before writing, as TWA,TWS (e.g. 45,6)
    #[arg(long, value_parser = parse_highlight)]
    pub highlight: Option<(f64, f64)>,

    /// Color scheme: spectrum, rainbow, fire, ocean, forest, purple, monochrome
    #[arg(long)]
    pub colors: Option<ColorScheme>,

    /// Write stroke/fill attributes into the SVG
    #[arg(long, conflicts_with = "no_inline_style")]
    pub inline_style: bool,

    /// Leave styling to an external stylesheet
    #[arg(long)]
    pub no_inline_style: bool,

    /// Re-render whenever the input file changes
    #[arg(short, long)]
    pub watch: bool,

    /// Write a commented default config file and exit
    #[arg(long)]
    pub init_config: bool,

    /// Print shell completions and exit
    #[arg(long, value_enum)]
    pub completions: Option<clap_complete::Shell>,
}

/// Parse "TWA,TWS" into (angle, speed).
pub fn parse_highlight(s: &str) -> Result<(f64, f64), String> {
    let (twa, tws) = s
        .split_once(',')
        .ok_or_else(|| format!("expected TWA,TWS, got '{}'", s))?;
    let twa: f64 = twa
        .trim()
        .parse()
        .map_err(|_| format!("invalid wind angle '{}'", twa.trim()))?;
    let tws: f64 = tws
        .trim()
        .parse()
        .map_err(|_| format!("invalid wind speed '{}'", tws.trim()))?;
    Ok((twa, tws))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_highlight_pairs() {
        assert_eq!(parse_highlight("45,6"), Ok((45.0, 6.0)));
        assert_eq!(parse_highlight(" 52.5 , 10 "), Ok((52.5, 10.0)));
        assert!(parse_highlight("45").is_err());
        assert!(parse_highlight("a,6").is_err());
    }

    #[test]
    fn input_is_optional() {
        let args = Args::parse_from(["vpp-polar"]);
        assert!(args.input.is_none());
        assert!(!args.watch);

        let args = Args::parse_from(["vpp-polar", "polar.json", "--highlight", "45,6"]);
        assert_eq!(args.input, Some(PathBuf::from("polar.json")));
        assert_eq!(args.highlight, Some((45.0, 6.0)));
    }
}
