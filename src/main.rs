// SPDX-License-Identifier: MIT
//
// n-palette: command-line front end over the palette engine.
//
// Wires the two library crates to the shell:
//
//   n-color → color spaces, transforms, vision simulation
//   n-theme → palette builder, contrast, harmonies, dominant colors
//
// Each subcommand reads its input, runs one engine entry point and prints
// the result as JSON on stdout. Logs go to stderr (see logging.rs).

mod cli;
mod logging;

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use n_color::Rgb;
use n_theme::contrast::FontSizes;
use n_theme::dominant::{self, ExtractOptions};
use n_theme::{ColorHarmony, Contrast, PaletteBuilder, PaletteConfig, Usage, WcagScore};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::info;

use crate::cli::{Cli, Command};

// ─── Contrast report ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContrastReport {
    background: String,
    text: String,
    wcag_ratio: f64,
    wcag_score: WcagScore,
    wcag_score_color: String,
    apca_lc: f64,
    usage: Usage,
    apca_score_color: String,
    font_sizes: FontSizes,
    #[serde(skip_serializing_if = "Option::is_none")]
    solved_lightness: Option<f64>,
}

fn contrast_report(
    background: Rgb,
    text: &str,
    target: Option<f64>,
    precision: f64,
) -> Result<ContrastReport> {
    let contrast = Contrast::new(background, text)
        .with_context(|| format!("invalid text color {text:?}"))?;
    Ok(ContrastReport {
        background: background.to_hex(),
        text: contrast.text().to_hex(),
        wcag_ratio: contrast.wcag_contrast(),
        wcag_score: contrast.wcag_score(),
        wcag_score_color: contrast.wcag_score_color().to_hex(),
        apca_lc: contrast.apca_contrast(),
        usage: contrast.recommended_usage(),
        apca_score_color: contrast.apca_score_color().to_hex(),
        font_sizes: contrast.min_font_sizes(),
        solved_lightness: target.map(|t| contrast.lightness_for_contrast_ratio(t, precision)),
    })
}

// ─── Subcommands ────────────────────────────────────────────────────────────

fn load_config(path: &Path) -> Result<PaletteConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid palette config {}", path.display()))
}

fn run(command: Command) -> Result<serde_json::Value> {
    let value = match command {
        Command::Palette { config, flat } => {
            let config = load_config(&config)?;
            let palette = PaletteBuilder::from_config(&config).build();
            info!(themes = palette.themes.len(), "palette built");
            if flat {
                serde_json::to_value(palette.library_entries())?
            } else {
                serde_json::to_value(palette)?
            }
        }
        Command::Contrast {
            background,
            text,
            target,
            precision,
        } => serde_json::to_value(contrast_report(background, &text, target, precision)?)?,
        Command::Harmony {
            base,
            kind,
            spread,
            tetradic_angle,
        } => {
            let harmony = ColorHarmony::new(base)
                .with_spread(spread)
                .with_tetradic_angle(tetradic_angle);
            match kind {
                Some(kind) => serde_json::to_value(harmony.generate(kind))?,
                None => serde_json::to_value(harmony.all_harmonies())?,
            }
        }
        Command::Extract {
            image,
            count,
            max_iterations,
            tolerance,
            keep_transparent,
            seed,
        } => {
            let bytes = fs::read(&image)
                .with_context(|| format!("failed to read {}", image.display()))?;
            let options = ExtractOptions::default()
                .with_color_count(count)
                .with_max_iterations(max_iterations)
                .with_tolerance(tolerance)
                .with_skip_transparent(!keep_transparent);
            let colors = match seed {
                Some(seed) => {
                    let decoded = dominant::decode_rgba(&bytes)
                        .with_context(|| format!("failed to decode {}", image.display()))?;
                    decoded
                        .extractor(options)
                        .extract_with_rng(&mut StdRng::seed_from_u64(seed))
                }
                None => dominant::extract_from_encoded(&bytes, options)
                    .with_context(|| format!("failed to decode {}", image.display()))?,
            };
            serde_json::to_value(colors)?
        }
    };
    Ok(value)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init();

    let value = run(cli.command)?;
    let json = if cli.compact {
        serde_json::to_string(&value)?
    } else {
        serde_json::to_string_pretty(&value)?
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}").context("failed to write output")?;
    Ok(())
}
