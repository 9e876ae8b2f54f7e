use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

/// Canonical `#RRGGBB` form; the only form the core accepts.
static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid hex color regex"));

/// Errors produced while turning user input into a [`Color`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("Invalid color {0:?}: expected #RRGGBB")]
    InvalidColor(String),
}

/// An sRGB color with 8-bit channels.
///
/// Interpolation in this crate happens directly on these byte values; there is
/// no linearization or gamma handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RRGGBB` string.
    ///
    /// Validity is strict: a leading `#`, exactly seven characters, six hex
    /// digits. Shorthand (`#RGB`) and anything else is rejected without any
    /// attempt at partial parsing.
    pub fn parse(s: &str) -> Result<Self, ColorError> {
        if !HEX_COLOR.is_match(s) {
            return Err(ColorError::InvalidColor(s.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&s[range], 16).map_err(|_| ColorError::InvalidColor(s.to_string()))
        };

        Ok(Self {
            r: channel(1..3)?,
            g: channel(3..5)?,
            b: channel(5..7)?,
        })
    }

    /// Whether a partially typed entry is already a complete color.
    ///
    /// Input fields call this on every keystroke; `#abc` counts as still
    /// being typed rather than as a shorthand color.
    pub fn is_complete_hex(s: &str) -> bool {
        HEX_COLOR.is_match(s)
    }

    /// A uniformly random 24-bit color
    pub fn random() -> Self {
        Self::from_rng(&mut rand::thread_rng())
    }

    pub fn from_rng<R: Rng>(rng: &mut R) -> Self {
        let value: u32 = rng.gen_range(0..=0xFF_FFFF);
        Self::new((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(&self) -> String {
        self.to_string()
    }

    /// Lowercase `rrggbb`, as used in export file names
    pub fn hex_digits(&self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Color::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_parse_canonical() {
        assert_eq!(Color::parse("#FF0000").unwrap(), Color::new(255, 0, 0));
        assert_eq!(Color::parse("#c5022f").unwrap(), Color::new(0xc5, 0x02, 0x2f));
        assert_eq!(Color::parse("#8Ef9E0").unwrap(), Color::new(0x8e, 0xf9, 0xe0));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in ["", "#", "FF0000", "#FF000", "#FF00000", "#GG0000", "#abc", " #FF0000", "#FF0000 "] {
            assert_eq!(
                Color::parse(input),
                Err(ColorError::InvalidColor(input.to_string())),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_shorthand_is_not_complete() {
        assert!(!Color::is_complete_hex("#abc"));
        assert!(!Color::is_complete_hex("#abcd"));
        assert!(Color::is_complete_hex("#aabbcc"));
    }

    #[test]
    fn test_hex_formatting() {
        let color = Color::new(0x11, 0x22, 0x33);
        assert_eq!(color.to_hex(), "#112233");
        assert_eq!(color.hex_digits(), "112233");
        assert_eq!(Color::new(0xAB, 0xCD, 0xEF).to_string(), "#abcdef");
    }

    #[test]
    fn test_random_is_reproducible_with_seed() {
        let a = Color::from_rng(&mut StdRng::seed_from_u64(7));
        let b = Color::from_rng(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_serde_uses_hex_string() {
        let yaml = serde_yaml_ng::to_string(&Color::new(1, 2, 3)).unwrap();
        assert!(yaml.contains("#010203"));
        assert_eq!(serde_yaml_ng::from_str::<Color>(&yaml).unwrap(), Color::new(1, 2, 3));

        let parsed: Color = serde_yaml_ng::from_str("'#0a0b0c'").unwrap();
        assert_eq!(parsed, Color::new(10, 11, 12));

        assert!(serde_yaml_ng::from_str::<Color>("'#xyz'").is_err());
    }
}
