//! Chart styling, passed explicitly to the renderer.

use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use anyhow::{anyhow, bail};
use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl FromStr for Rgb {
    type Err = anyhow::Error;

    /// Parses "#RRGGBB".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| anyhow!("colour must start with '#': {s:?}"))?;
        if hex.len() != 6 || !hex.is_ascii() {
            bail!("colour must be of the form #RRGGBB: {s:?}")
        }
        let byte = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| anyhow!("invalid hex digits in colour {s:?}: {e}"))
        };
        Ok(Rgb(byte(0)?, byte(2)?, byte(4)?))
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Rgb(r, g, b) = self;
        write!(f, "#{r:02X}{g:02X}{b:02X}")
    }
}

impl TryFrom<String> for Rgb {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

impl From<Rgb> for RGBColor {
    fn from(Rgb(r, g, b): Rgb) -> Self {
        RGBColor(r, g, b)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Theme {
    pub font_family: String,
    pub title_font_size: u32,
    pub panel_title_font_size: u32,
    pub label_font_size: u32,
    /// Size of one panel of a figure, in pixels
    pub panel_width: u32,
    pub panel_height: u32,
    pub background: Rgb,
    pub text: Rgb,
    pub grid: Rgb,
    /// For reference lines and "no data" markers
    pub accent: Rgb,
    /// Speedup bars at or above 1
    pub faster: Rgb,
    /// Speedup bars below 1
    pub slower: Rgb,
    /// Fixed colours for known engines, keyed by lowercase name
    pub engine_colors: BTreeMap<String, Rgb>,
    /// Colours for other series, in turn
    pub palette: Vec<Rgb>,
}

impl Default for Theme {
    fn default() -> Self {
        let tidesdb = Rgb(0x7F, 0xAA, 0xDC);
        let rocksdb = Rgb(0xE8, 0xA8, 0x7C);
        Theme {
            font_family: "sans-serif".into(),
            title_font_size: 24,
            panel_title_font_size: 16,
            label_font_size: 12,
            panel_width: 640,
            panel_height: 420,
            background: Rgb(0xFF, 0xFF, 0xFF),
            text: Rgb(0x33, 0x33, 0x33),
            grid: Rgb(0xE0, 0xE0, 0xE0),
            accent: Rgb(0x88, 0x88, 0x88),
            faster: tidesdb,
            slower: rocksdb,
            engine_colors: [("tidesdb".into(), tidesdb), ("rocksdb".into(), rocksdb)]
                .into_iter()
                .collect(),
            palette: vec![
                Rgb(0x9D, 0xB4, 0xC0),
                Rgb(0xC5, 0xC3, 0xC6),
                Rgb(0x8F, 0xC9, 0x9B),
                Rgb(0xD4, 0x9A, 0xB8),
                Rgb(0xB8, 0xA9, 0xE0),
                Rgb(0xE0, 0xD0, 0x7C),
            ],
        }
    }
}

impl Theme {
    /// The colour for the series `label` at position `index` of its
    /// chart.
    pub fn series_color(&self, label: &str, index: usize) -> RGBColor {
        if let Some(color) = self.engine_colors.get(label) {
            return (*color).into();
        }
        if self.palette.is_empty() {
            return self.accent.into();
        }
        self.palette[index % self.palette.len()].into()
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use super::*;

    #[test]
    fn t_rgb() -> Result<()> {
        let c: Rgb = "#7FAADC".parse()?;
        assert_eq!(c, Rgb(0x7F, 0xAA, 0xDC));
        assert_eq!(c.to_string(), "#7FAADC");
        assert!("7FAADC".parse::<Rgb>().is_err());
        assert!("#7FAAD".parse::<Rgb>().is_err());
        assert!("#7FAADX".parse::<Rgb>().is_err());
        Ok(())
    }

    #[test]
    fn t_series_color() {
        let theme = Theme::default();
        assert_eq!(theme.series_color("tidesdb", 5), RGBColor(0x7F, 0xAA, 0xDC));
        assert_eq!(theme.series_color("other", 0), RGBColor(0x9D, 0xB4, 0xC0));
        assert_eq!(theme.series_color("other", 7), RGBColor(0xC5, 0xC3, 0xC6));
    }
}
