use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Aspect-ratio lock applied while editing image dimensions
///
/// With a ratio selected, typing one dimension recomputes the other
/// (truncating toward zero). `Custom` leaves both dimensions alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "Custom")]
    Custom,
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "4:3")]
    FourThree,
    #[serde(rename = "3:4")]
    ThreeFour,
    #[serde(rename = "16:9")]
    SixteenNine,
    #[serde(rename = "9:16")]
    NineSixteen,
    #[serde(rename = "2:1")]
    TwoOne,
    #[serde(rename = "1:2")]
    OneTwo,
    #[serde(rename = "3:2")]
    ThreeTwo,
    #[serde(rename = "2:3")]
    TwoThree,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 10] = [
        AspectRatio::Custom,
        AspectRatio::Square,
        AspectRatio::FourThree,
        AspectRatio::ThreeFour,
        AspectRatio::SixteenNine,
        AspectRatio::NineSixteen,
        AspectRatio::TwoOne,
        AspectRatio::OneTwo,
        AspectRatio::ThreeTwo,
        AspectRatio::TwoThree,
    ];

    /// `(width_part, height_part)`, or `None` for `Custom`
    pub fn parts(&self) -> Option<(u32, u32)> {
        match self {
            AspectRatio::Custom => None,
            AspectRatio::Square => Some((1, 1)),
            AspectRatio::FourThree => Some((4, 3)),
            AspectRatio::ThreeFour => Some((3, 4)),
            AspectRatio::SixteenNine => Some((16, 9)),
            AspectRatio::NineSixteen => Some((9, 16)),
            AspectRatio::TwoOne => Some((2, 1)),
            AspectRatio::OneTwo => Some((1, 2)),
            AspectRatio::ThreeTwo => Some((3, 2)),
            AspectRatio::TwoThree => Some((2, 3)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AspectRatio::Custom => "Custom",
            AspectRatio::Square => "1:1",
            AspectRatio::FourThree => "4:3",
            AspectRatio::ThreeFour => "3:4",
            AspectRatio::SixteenNine => "16:9",
            AspectRatio::NineSixteen => "9:16",
            AspectRatio::TwoOne => "2:1",
            AspectRatio::OneTwo => "1:2",
            AspectRatio::ThreeTwo => "3:2",
            AspectRatio::TwoThree => "2:3",
        }
    }

    /// Height locked to `width`, or `None` when unconstrained
    pub fn height_for_width(&self, width: u32) -> Option<u32> {
        let (w, h) = self.parts()?;
        Some((width as u64 * h as u64 / w as u64) as u32)
    }

    /// Width locked to `height`, or `None` when unconstrained
    pub fn width_for_height(&self, height: u32) -> Option<u32> {
        let (w, h) = self.parts()?;
        Some((height as u64 * w as u64 / h as u64) as u32)
    }

    /// Apply the lock after the user edited the width
    pub fn fit_width(&self, width: u32, height: u32) -> (u32, u32) {
        (width, self.height_for_width(width).unwrap_or(height))
    }

    /// Apply the lock after the user edited the height
    pub fn fit_height(&self, width: u32, height: u32) -> (u32, u32) {
        (self.width_for_height(height).unwrap_or(width), height)
    }
}

/// Exchange width and height. Any ratio lock is released.
pub fn swap_dimensions(width: u32, height: u32) -> (u32, u32, AspectRatio) {
    (height, width, AspectRatio::Custom)
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ratio| ratio.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown aspect ratio {s:?}"))
    }
}
