//! Normal-to-color mapping styles.
//!
//! Each style is a pure function from a unit normal to an RGBA pixel, plus a
//! fixed background color for uncovered pixels. The set is closed: styles
//! are enum variants, not runtime registrations.

use clap::ValueEnum;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Style {
    /// Wikipedia-style encoding: X in red, Y in green, Z in blue,
    /// opaque alpha.
    #[default]
    Standard,
    /// War Thunder's packing: X in alpha, inverted Y in green, Z unused.
    WarThunder,
}

impl Style {
    /// Background color for pixels no triangle covers.
    pub fn background(self) -> [u8; 4] {
        match self {
            Style::Standard => [128, 128, 255, 0],
            Style::WarThunder => [0, 128, 0, 128],
        }
    }

    /// Map a unit normal to a pixel color. The normal must already be
    /// normalized; components outside [-1, 1] would overflow the channels.
    pub fn shade(self, normal: [f64; 3]) -> [u8; 4] {
        let [nx, ny, nz] = normal;
        match self {
            Style::Standard => [
                channel((nx + 1.0) * 127.5),
                channel((ny + 1.0) * 127.5),
                channel((nz + 1.0) * 127.5),
                255,
            ],
            Style::WarThunder => [
                0,
                channel((1.0 - ny) * 127.5),
                0,
                channel((nx + 1.0) * 127.5),
            ],
        }
    }
}

fn channel(value: f64) -> u8 {
    value.round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_flat_up() {
        assert_eq!(Style::Standard.shade([0.0, 0.0, 1.0]), [128, 128, 255, 255]);
    }

    #[test]
    fn test_standard_axes() {
        assert_eq!(Style::Standard.shade([1.0, 0.0, 0.0]), [255, 128, 128, 255]);
        assert_eq!(Style::Standard.shade([-1.0, 0.0, 0.0]), [0, 128, 128, 255]);
        assert_eq!(Style::Standard.shade([0.0, 1.0, 0.0]), [128, 255, 128, 255]);
        assert_eq!(Style::Standard.shade([0.0, 0.0, -1.0]), [128, 128, 0, 255]);
    }

    #[test]
    fn test_standard_background_is_flat_up_with_zero_alpha() {
        let shaded = Style::Standard.shade([0.0, 0.0, 1.0]);
        let background = Style::Standard.background();
        assert_eq!(&shaded[..3], &background[..3]);
        assert_eq!(background[3], 0);
    }

    #[test]
    fn test_war_thunder_packing() {
        // X lands in alpha, Y inverted in green, red and blue stay zero
        assert_eq!(
            Style::WarThunder.shade([1.0, -1.0, 0.3]),
            [0, 255, 0, 255]
        );
        assert_eq!(Style::WarThunder.shade([0.0, 0.0, 1.0]), [0, 128, 0, 128]);
        assert_eq!(Style::WarThunder.shade([-1.0, 1.0, 0.0]), [0, 0, 0, 0]);
    }

    #[test]
    fn test_war_thunder_background() {
        assert_eq!(Style::WarThunder.background(), [0, 128, 0, 128]);
    }
}
