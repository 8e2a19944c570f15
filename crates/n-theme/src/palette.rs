//! Palette generation: source colors × themes × scale stops.
//!
//! [`PaletteBuilder`] expands every source color against every theme's
//! scale and materializes each stop as a [`PaletteShade`] carrying all the
//! color-space representations a serializer might want. Each color also
//! gets one synthetic `"source"` shade holding the unmodified input.
//!
//! After a color's stops are computed, the stop nearest the source (by RGB
//! distance) is singled out. With locking on it is replaced by the source
//! color itself; otherwise it is flagged when the two are close enough to
//! pass for each other.

use n_color::{AlgorithmVersion, ColorSpace, ColorTransform, Rgb, Rgba};
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::config::{PaletteConfig, SourceColor, Theme, ThemeKind, DEFAULT_PALETTE_NAME};

/// RGB distance below which a stop is considered indistinguishable from
/// its source color.
pub const CLOSEST_TO_REF_THRESHOLD: f64 = 4.0;

/// Name of the synthetic shade every color starts with.
pub const SOURCE_SHADE_NAME: &str = "source";

// ---------------------------------------------------------------------------
// Output tree
// ---------------------------------------------------------------------------

/// A fully materialized palette.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub name: String,
    pub description: String,
    pub themes: Vec<PaletteTheme>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteTheme {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ThemeKind,
    pub colors: Vec<PaletteColor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteColor {
    pub id: String,
    pub name: String,
    pub description: String,
    /// The source shade first, then one per scale stop, highest target first.
    pub shades: Vec<PaletteShade>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ShadeKind {
    #[serde(rename = "source color")]
    Source,
    #[serde(rename = "color shade")]
    Shade,
}

/// One stop of one color in one theme.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteShade {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ShadeKind,
    pub hex: String,
    /// 0–255 channels.
    pub rgb: [f64; 3],
    /// 0–1 channels plus alpha.
    pub gl: [f64; 4],
    pub lch: [f64; 3],
    pub oklch: [f64; 3],
    pub lab: [f64; 3],
    pub oklab: [f64; 3],
    pub hsl: [f64; 3],
    pub hsluv: [f64; 3],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<[f64; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mixed_color: Option<[f64; 3]>,
    pub is_closest_to_ref: bool,
    pub is_source_color_locked: bool,
    pub is_transparent: bool,
}

impl PaletteShade {
    /// A shade whose representations all derive from `rgb`.
    fn from_rgb(name: &str, description: String, kind: ShadeKind, rgb: Rgb) -> Self {
        Self {
            name: name.to_string(),
            description,
            kind,
            hex: rgb.to_hex(),
            rgb: rgb.rounded().to_array(),
            gl: rgb.to_gl(),
            lch: rgb.to_lch(),
            oklch: rgb.to_oklch(),
            lab: rgb.to_lab(),
            oklab: rgb.to_oklab(),
            hsl: rgb.to_hsl(),
            hsluv: rgb.to_hsluv(),
            alpha: None,
            background_color: None,
            mixed_color: None,
            is_closest_to_ref: false,
            is_source_color_locked: false,
            is_transparent: false,
        }
    }

    /// Replace the opacity-dependent fields for a translucent shade.
    fn with_alpha(mut self, fg: Rgba, background: Rgb, mixed: Rgb) -> Self {
        self.hex = fg.to_hex();
        self.gl = fg.to_gl();
        self.alpha = Some(fg.alpha);
        self.background_color = Some(background.to_array());
        self.mixed_color = Some(mixed.to_array());
        self.is_transparent = true;
        self
    }
}

/// One flattened row of a palette, keyed by theme, color and shade.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    /// `"{theme id}:{color id}:{shade name}"`.
    pub id: String,
    pub palette_name: String,
    pub theme_name: String,
    pub color_name: String,
    pub shade_name: String,
    pub alpha: f64,
    pub hex: String,
    pub gl: [f64; 4],
    /// The color's description.
    pub description: String,
}

impl Palette {
    /// Every shade of every color of every theme, in tree order.
    #[must_use]
    pub fn library_entries(&self) -> Vec<LibraryEntry> {
        self.themes
            .iter()
            .flat_map(|theme| {
                theme.colors.iter().flat_map(move |color| {
                    color.shades.iter().map(move |shade| LibraryEntry {
                        id: format!("{}:{}:{}", theme.id, color.id, shade.name),
                        palette_name: self.name.clone(),
                        theme_name: theme.name.clone(),
                        color_name: color.name.clone(),
                        shade_name: shade.name.clone(),
                        alpha: shade.alpha.unwrap_or(1.0),
                        hex: shade.hex.clone(),
                        gl: shade.gl,
                        description: color.description.clone(),
                    })
                })
            })
            .collect()
    }

    /// Look up a shade by theme id, color id and shade name.
    #[must_use]
    pub fn shade(&self, theme_id: &str, color_id: &str, shade_name: &str) -> Option<&PaletteShade> {
        self.themes
            .iter()
            .find(|t| t.id == theme_id)?
            .colors
            .iter()
            .find(|c| c.id == color_id)?
            .shades
            .iter()
            .find(|s| s.name == shade_name)
    }
}

// ---------------------------------------------------------------------------
// PaletteBuilder
// ---------------------------------------------------------------------------

/// A computed stop before it is turned into a [`PaletteShade`].
struct Candidate<'s> {
    label: &'s str,
    target: f64,
    /// Foreground with opacity; alpha is 1 for lightness stops.
    color: Rgba,
    /// Transformed background, for opacity stops only.
    background: Option<Rgb>,
}

/// Builds a [`Palette`] from borrowed source colors and themes.
///
/// ```
/// use n_theme::config::{Scale, SourceColor, Theme, UnitRgb};
/// use n_theme::palette::PaletteBuilder;
///
/// let colors = [SourceColor::new("red", UnitRgb::new(1.0, 0.0, 0.0))];
/// let themes = [Theme::new("light", [("100", 100.0), ("50", 50.0)].into_iter().collect::<Scale>())];
/// let palette = PaletteBuilder::new(&colors, &themes).build();
/// assert_eq!(palette.themes[0].colors[0].shades.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct PaletteBuilder<'a> {
    name: String,
    description: String,
    colors: &'a [SourceColor],
    themes: &'a [Theme],
    color_space: ColorSpace,
    algorithm: AlgorithmVersion,
    locked: bool,
}

impl<'a> PaletteBuilder<'a> {
    #[must_use]
    pub fn new(colors: &'a [SourceColor], themes: &'a [Theme]) -> Self {
        Self {
            name: DEFAULT_PALETTE_NAME.to_string(),
            description: String::new(),
            colors,
            themes,
            color_space: ColorSpace::default(),
            algorithm: AlgorithmVersion::default(),
            locked: false,
        }
    }

    /// Builder carrying every setting of `config`.
    #[must_use]
    pub fn from_config(config: &'a PaletteConfig) -> Self {
        Self::new(&config.colors, &config.themes)
            .with_name(config.name.clone())
            .with_description(config.description.clone())
            .with_color_space(config.color_space)
            .with_algorithm_version(config.algorithm_version)
            .with_locked_source_colors(config.are_source_colors_locked)
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Space the stops are generated in.
    #[must_use]
    pub const fn with_color_space(mut self, space: ColorSpace) -> Self {
        self.color_space = space;
        self
    }

    #[must_use]
    pub const fn with_algorithm_version(mut self, version: AlgorithmVersion) -> Self {
        self.algorithm = version;
        self
    }

    /// Pin the stop nearest each source color to the source itself.
    #[must_use]
    pub const fn with_locked_source_colors(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// Materialize the palette.
    #[must_use]
    pub fn build(&self) -> Palette {
        debug!(
            name = %self.name,
            colors = self.colors.len(),
            themes = self.themes.len(),
            space = %self.color_space,
            algorithm = %self.algorithm,
            locked = self.locked,
            "building palette"
        );

        Palette {
            name: self.name.clone(),
            description: self.description.clone(),
            themes: self
                .themes
                .iter()
                .map(|theme| PaletteTheme {
                    id: theme.id.clone(),
                    name: theme.name.clone(),
                    description: theme.description.clone(),
                    kind: theme.kind,
                    colors: self
                        .colors
                        .iter()
                        .map(|color| self.build_color(theme, color))
                        .collect(),
                })
                .collect(),
        }
    }

    fn base_transform(&self, theme: &Theme, rgb: Rgb) -> ColorTransform {
        ColorTransform::new(rgb)
            .with_algorithm(self.algorithm)
            .with_vision(theme.vision_simulation_mode)
    }

    fn build_color(&self, theme: &Theme, color: &SourceColor) -> PaletteColor {
        let source = color.rgb.to_rgb();
        let base = self
            .base_transform(theme, source)
            .with_hue_shift(color.hue.shift)
            .with_chroma_shift(color.chroma.shift);
        let alpha_enabled = color.alpha.is_enabled;

        let candidates = if alpha_enabled {
            self.opacity_candidates(theme, color, base)
        } else {
            self.lightness_candidates(theme, base)
        };

        // First minimum wins.
        let closest = candidates
            .iter()
            .enumerate()
            .map(|(i, c)| (i, source.distance(c.color.rgb)))
            .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
                Some((_, bd)) if bd <= d => best,
                _ => Some((i, d)),
            });

        let mut shades = Vec::with_capacity(candidates.len() + 1);
        let mut source_shade = PaletteShade::from_rgb(
            SOURCE_SHADE_NAME,
            "Source color".to_string(),
            ShadeKind::Source,
            source,
        );
        source_shade.rgb = source.to_array();
        source_shade.hsluv = base.source_hsluv();
        shades.push(source_shade);

        let pin = !alpha_enabled && self.locked;
        let axis = if alpha_enabled { "opacity" } else { "lightness" };

        for (index, candidate) in candidates.into_iter().enumerate() {
            let nearest = closest.filter(|(i, _)| *i == index);
            let locked_here = pin && nearest.is_some();
            let rgb = if locked_here {
                base.source()
            } else {
                candidate.color.rgb
            };
            let description = format!("Shade/Tint color with {:.1}% of {axis}", candidate.target);

            let mut shade = PaletteShade::from_rgb(candidate.label, description, ShadeKind::Shade, rgb);
            if let Some(background) = candidate.background {
                let mixed = base.mix_colors_rgb(candidate.color, background.with_alpha(1.0));
                shade = shade.with_alpha(candidate.color, background, mixed);
            }
            shade.is_source_color_locked = locked_here;
            shade.is_closest_to_ref =
                !self.locked && nearest.is_some_and(|(_, d)| d < CLOSEST_TO_REF_THRESHOLD);

            trace!(
                theme = %theme.id,
                color = %color.id,
                shade = %shade.name,
                hex = %shade.hex,
                locked = shade.is_source_color_locked,
                closest = shade.is_closest_to_ref,
                "shade"
            );
            shades.push(shade);
        }

        PaletteColor {
            id: color.id.clone(),
            name: color.name.clone(),
            description: color.description.clone(),
            shades,
        }
    }

    fn lightness_candidates<'t>(&self, theme: &'t Theme, base: ColorTransform) -> Vec<Candidate<'t>> {
        theme
            .scale
            .descending()
            .into_iter()
            .map(|(label, target)| Candidate {
                label,
                target,
                color: base
                    .with_lightness(target)
                    .convert(self.color_space)
                    .with_alpha(1.0),
                background: None,
            })
            .collect()
    }

    fn opacity_candidates<'t>(
        &self,
        theme: &'t Theme,
        color: &SourceColor,
        base: ColorTransform,
    ) -> Vec<Candidate<'t>> {
        let background = Rgb::from_hex(&color.alpha.background_color).unwrap_or_else(|err| {
            warn!(color = %color.id, %err, "invalid background color, using white");
            Rgb::WHITE
        });
        let background = self.base_transform(theme, background);

        theme
            .scale
            .descending()
            .into_iter()
            .map(|(label, target)| {
                let fg = base.with_alpha(target.round() / 100.0);
                let (fg, bg) = if self.locked {
                    (fg.source_with_alpha(), background.source_with_alpha())
                } else {
                    (
                        fg.convert_with_alpha(self.color_space),
                        background.convert_with_alpha(self.color_space),
                    )
                };
                Candidate {
                    label,
                    target,
                    color: fg,
                    background: Some(bg.rgb),
                }
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
