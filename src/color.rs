use palette::{Hsl, IntoColor, Srgb};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Spectrum,
    Rainbow,
    Fire,
    Ocean,
    Forest,
    Purple,
    Monochrome,
}

impl FromStr for ColorScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spectrum" => Ok(Self::Spectrum),
            "rainbow" => Ok(Self::Rainbow),
            "fire" => Ok(Self::Fire),
            "ocean" => Ok(Self::Ocean),
            "forest" => Ok(Self::Forest),
            "purple" => Ok(Self::Purple),
            "mono" | "monochrome" => Ok(Self::Monochrome),
            _ => Err(format!("Unknown color scheme: {}", s)),
        }
    }
}

impl ColorScheme {
    /// Get color for a given position (0.0 to 1.0) along the scheme
    pub fn get_color(&self, position: f32) -> (u8, u8, u8) {
        let (h, s, l) = match self {
            ColorScheme::Spectrum => {
                // Light air purple through to heavy air red
                let hue = 270.0 - (position * 270.0);
                (hue, 0.9, 0.55)
            }
            ColorScheme::Rainbow => (position * 360.0, 0.85, 0.6),
            ColorScheme::Fire => (position * 60.0, 0.95, 0.5),
            ColorScheme::Ocean => (180.0 + position * 60.0, 0.8, 0.475),
            ColorScheme::Forest => (80.0 + position * 60.0, 0.75, 0.425),
            ColorScheme::Purple => (270.0 + position * 60.0, 0.8, 0.5),
            // Gray ramp, darker for light air
            ColorScheme::Monochrome => (0.0, 0.0, 0.35 + position * 0.45),
        };

        let hsl = Hsl::new(h, s, l);
        let rgb: Srgb = hsl.into_color();

        (
            (rgb.red * 255.0) as u8,
            (rgb.green * 255.0) as u8,
            (rgb.blue * 255.0) as u8,
        )
    }

    /// Stroke color for series `index` of `count` wind speeds.
    pub fn series_color(&self, index: usize, count: usize) -> (u8, u8, u8) {
        let position = if count > 1 {
            index as f32 / (count - 1) as f32
        } else {
            0.5
        };
        self.get_color(position)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColorScheme::Spectrum => "spectrum",
            ColorScheme::Rainbow => "rainbow",
            ColorScheme::Fire => "fire",
            ColorScheme::Ocean => "ocean",
            ColorScheme::Forest => "forest",
            ColorScheme::Purple => "purple",
            ColorScheme::Monochrome => "monochrome",
        }
    }

    pub fn all() -> &'static [ColorScheme] {
        &[
            ColorScheme::Spectrum,
            ColorScheme::Rainbow,
            ColorScheme::Fire,
            ColorScheme::Ocean,
            ColorScheme::Forest,
            ColorScheme::Purple,
            ColorScheme::Monochrome,
        ]
    }

    pub fn next(&self) -> Self {
        let all = Self::all();
        let current = all.iter().position(|c| c == self).unwrap_or(0);
        all[(current + 1) % all.len()]
    }
}

/// `#rrggbb` for SVG presentation attributes.
pub fn hex(color: (u8, u8, u8)) -> String {
    format!("#{:02x}{:02x}{:02x}", color.0, color.1, color.2)
}
