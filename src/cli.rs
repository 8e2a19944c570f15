// SPDX-License-Identifier: MIT
//
// Command-line surface. Every subcommand prints one JSON document to stdout.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use n_color::Rgb;
use n_theme::contrast::DEFAULT_PRECISION;
use n_theme::harmony::{DEFAULT_SPREAD, DEFAULT_TETRADIC_ANGLE};
use n_theme::HarmonyKind;

/// Multi-theme color palette generator.
#[derive(Parser, Debug)]
#[command(name = "n-palette")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Print single-line JSON instead of pretty-printed.
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a palette from a JSON configuration file
    Palette {
        /// Palette configuration (JSON)
        config: PathBuf,

        /// Emit one row per shade instead of the nested tree
        #[arg(long)]
        flat: bool,
    },

    /// Score text against a background
    Contrast {
        /// Background color (hex)
        #[arg(value_parser = Rgb::from_hex)]
        background: Rgb,

        /// Text color (hex)
        text: String,

        /// Also solve for the background lightness reaching this WCAG ratio
        #[arg(long)]
        target: Option<f64>,

        /// Lightness bracket width at which the solver stops
        #[arg(long, default_value_t = DEFAULT_PRECISION)]
        precision: f64,
    },

    /// Generate hue harmonies around a base color
    Harmony {
        /// Base color (hex)
        #[arg(value_parser = Rgb::from_hex)]
        base: Rgb,

        /// Only this harmony (ANALOGOUS, COMPLEMENTARY, TRIADIC, TETRADIC, SQUARE)
        #[arg(short, long, value_parser = HarmonyKind::from_str)]
        kind: Option<HarmonyKind>,

        /// Analogous spread in degrees
        #[arg(long, default_value_t = DEFAULT_SPREAD)]
        spread: f64,

        /// Tetradic rectangle angle in degrees
        #[arg(long, default_value_t = DEFAULT_TETRADIC_ANGLE)]
        tetradic_angle: f64,
    },

    /// Extract dominant colors from an image file
    Extract {
        /// Image file (PNG, JPEG, GIF, BMP, ...)
        image: PathBuf,

        /// Number of colors to extract
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,

        /// Lloyd iteration cap
        #[arg(long, default_value_t = 50)]
        max_iterations: usize,

        /// Stop once no centroid moves more than this
        #[arg(long, default_value_t = 0.01)]
        tolerance: f64,

        /// Cluster transparent pixels too
        #[arg(long)]
        keep_transparent: bool,

        /// Seed the centroid picker for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_harmony() {
        let cli = Cli::try_parse_from(["n-palette", "harmony", "#ff0000", "--kind", "triadic"]).unwrap();
        match cli.command {
            Command::Harmony { base, kind, spread, .. } => {
                assert_eq!(base, Rgb::new(255.0, 0.0, 0.0));
                assert_eq!(kind, Some(HarmonyKind::Triadic));
                assert!((spread - DEFAULT_SPREAD).abs() < f64::EPSILON);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_hex() {
        assert!(Cli::try_parse_from(["n-palette", "contrast", "#zzzzzz", "#000"]).is_err());
    }

    #[test]
    fn rejects_unknown_harmony() {
        assert!(Cli::try_parse_from(["n-palette", "harmony", "#123456", "-k", "pentagram"]).is_err());
    }
}
