use crate::counts::EventCountIndex;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub(crate) const PALETTE_SIZE: usize = 8;

/// Input domain of the intensity scale.  Fixed, independent of the counts
/// actually observed.
const COUNT_DOMAIN: [f64; 2] = [0.0, 8.0];

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Rgb {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
}

impl Rgb {
    pub(crate) const fn new(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    /// Parses `#rgb` or `#rrggbb`
    fn from_str(s: &str) -> Result<Rgb, ColorError> {
        let bad = || ColorError(s.to_owned());
        let hex = s.strip_prefix('#').ok_or_else(bad)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let channel = |i: usize, width: usize| -> Result<u8, ColorError> {
            let digits = hex.get(i * width..(i + 1) * width).ok_or_else(bad)?;
            let v = u8::from_str_radix(digits, 16).map_err(|_| bad())?;
            Ok(if width == 1 { v * 0x11 } else { v })
        };
        match hex.len() {
            3 => Ok(Rgb::new(channel(0, 1)?, channel(1, 1)?, channel(2, 1)?)),
            6 => Ok(Rgb::new(channel(0, 2)?, channel(1, 2)?, channel(2, 2)?)),
            _ => Err(bad()),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorError;

    fn try_from(s: String) -> Result<Rgb, ColorError> {
        s.parse()
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Rgb, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::try_from(s).map_err(serde::de::Error::custom)
    }
}

impl From<Rgb> for ratatui::style::Color {
    fn from(c: Rgb) -> ratatui::style::Color {
        ratatui::style::Color::Rgb(c.r, c.g, c.b)
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid color {0:?}: expected #rgb or #rrggbb")]
pub(crate) struct ColorError(String);

/// Eight colors ordered from the lowest bucket (lightest) to the highest
/// (darkest)
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq)]
#[serde(transparent)]
pub(crate) struct Palette(pub(crate) [Rgb; PALETTE_SIZE]);

impl Palette {
    pub(crate) fn colors(&self) -> &[Rgb] {
        &self.0
    }
}

impl Default for Palette {
    fn default() -> Palette {
        Palette([
            Rgb::new(0xf7, 0xfc, 0xb9),
            Rgb::new(0xd9, 0xf0, 0xa3),
            Rgb::new(0xad, 0xdd, 0x8e),
            Rgb::new(0x78, 0xc6, 0x79),
            Rgb::new(0x41, 0xab, 0x5d),
            Rgb::new(0x23, 0x84, 0x43),
            Rgb::new(0x00, 0x68, 0x37),
            Rgb::new(0x00, 0x45, 0x29),
        ])
    }
}

/// Maps a continuous input onto a discrete range by splitting a sample
/// domain into equally populated quantiles
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct QuantileScale<T> {
    thresholds: Vec<f64>,
    range: Vec<T>,
}

impl<T: Clone> QuantileScale<T> {
    /// `range` must not be empty.  The `range.len() - 1` thresholds are the
    /// quantiles of the sorted `domain`, interpolating linearly between
    /// neighbouring samples.  Non-finite samples are ignored.
    pub(crate) fn new(domain: &[f64], range: Vec<T>) -> QuantileScale<T> {
        let mut sorted = domain
            .iter()
            .copied()
            .filter(|x| x.is_finite())
            .collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        let n = range.len();
        let thresholds = (1..n)
            .filter_map(|i| quantile(&sorted, ratio(i, n)))
            .collect();
        QuantileScale { thresholds, range }
    }

    #[cfg(test)]
    pub(crate) fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    pub(crate) fn scale(&self, x: f64) -> Option<T> {
        let i = self.thresholds.partition_point(|&t| t <= x);
        self.range.get(i).cloned()
    }
}

fn ratio(i: usize, n: usize) -> f64 {
    let i = u32::try_from(i).unwrap_or(u32::MAX);
    let n = u32::try_from(n).unwrap_or(u32::MAX);
    f64::from(i) / f64::from(n)
}

/// Quantile `p` of an ascending slice
fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    let (&first, rest) = sorted.split_first()?;
    if rest.is_empty() {
        return Some(first);
    }
    let last_index = u32::try_from(sorted.len() - 1).unwrap_or(u32::MAX);
    let h = f64::from(last_index) * p;
    let lower = h.floor();
    // `lower` is a non-negative integer no greater than `last_index`
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let i = lower as usize;
    let lo = *sorted.get(i)?;
    let hi = sorted.get(i + 1).copied().unwrap_or(lo);
    Some((hi - lo).mul_add(h - lower, lo))
}

/// The intensity scale used for every render: a quantile scale over the
/// fixed count domain onto the palette's eight buckets
pub(crate) fn build_color_scale(palette: &Palette) -> QuantileScale<Rgb> {
    QuantileScale::new(&COUNT_DOMAIN, palette.colors().to_vec())
}

/// Color of the cell for `iso_date`.  Dates missing from the index keep the
/// `empty` fill; a date that is present goes through the scale even if its
/// count is zero.
pub(crate) fn color_for(
    iso_date: &str,
    index: &EventCountIndex,
    scale: &QuantileScale<Rgb>,
    empty: Rgb,
) -> Rgb {
    index
        .get(iso_date)
        .and_then(|count| scale.scale(f64::from(count)))
        .unwrap_or(empty)
}
