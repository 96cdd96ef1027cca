use serde::{Serialize, Serializer};
use std::fmt;

use crate::error_handling::GraphError;

/// Minimum number of palette entries the layout accepts.
pub const MIN_PALETTE_LEN: usize = 8;

pub const DEFAULT_PALETTE: [&str; 10] = [
    "#1f77b4", // Blue
    "#ff7f0e", // Orange
    "#2ca02c", // Green
    "#d62728", // Red
    "#9467bd", // Purple
    "#8c564b", // Brown
    "#e377c2", // Pink
    "#7f7f7f", // Gray
    "#bcbd22", // Olive
    "#17becf", // Cyan
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`.
    pub fn from_hex(hex: &str) -> Result<Self, GraphError> {
        let digits = hex
            .strip_prefix('#')
            .filter(|d| d.len() == 6 && d.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| GraphError::invalid_input(hex, "Colour must have the form #rrggbb"))?;

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|e| GraphError::invalid_input(hex, e.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Fixed ordered colour list. Indices wrap modulo its length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    pub fn new(colors: Vec<Rgb>) -> Result<Self, GraphError> {
        if colors.len() < MIN_PALETTE_LEN {
            return Err(GraphError::configuration(
                "palette",
                format!("needs at least {} colours, got {}", MIN_PALETTE_LEN, colors.len()),
            ));
        }
        Ok(Self { colors })
    }

    pub fn from_hex_list<S: AsRef<str>>(hex: &[S]) -> Result<Self, GraphError> {
        let colors = hex
            .iter()
            .map(|h| Rgb::from_hex(h.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(colors)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, idx: usize) -> Rgb {
        self.colors[idx % self.colors.len()]
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        let colors = DEFAULT_PALETTE
            .iter()
            .filter_map(|hex| Rgb::from_hex(hex).ok())
            .collect();
        Self { colors }
    }
}

/// 64-bit FNV-1a. Stable across runs and platforms, unlike `DefaultHasher`.
pub fn fnv1a(text: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    text.bytes()
        .fold(OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME))
}

/// Picks palette indices for lanes.
pub struct ColorAssigner<'a> {
    palette: &'a Palette,
}

impl<'a> ColorAssigner<'a> {
    pub fn new(palette: &'a Palette) -> Self {
        Self { palette }
    }

    /// Colour for a branch lane, keyed on the ref name.
    ///
    /// When the hashed colour equals the previous lane's colour it moves forward
    /// through the palette until it differs.
    pub fn branch_color(&self, name: &str, previous: Option<usize>) -> usize {
        let len = self.palette.len();
        let base = (fnv1a(name) % len as u64) as usize;
        (0..len)
            .map(|shift| (base + shift) % len)
            .find(|&candidate| Some(candidate) != previous)
            .unwrap_or(base)
    }

    /// Colour bound to a swimlane column at the moment the lane opens.
    pub fn lane_color(&self, column: usize) -> usize {
        column % self.palette.len()
    }

    pub fn palette(&self) -> &Palette {
        self.palette
    }
}
