use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::label::{HAlign, LabelStyle, VAlign};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrightStarOptions {
    pub enabled: bool,
    /// Keep only this many of the brightest stars; `0` keeps all.
    pub limit: usize,
    /// Only stars with a proper name, labelled by that name alone.
    pub common_only: bool,
    /// Label with the proper name alone, but still list unnamed stars.
    pub print_common_only: bool,
    /// Proper names never labelled.
    pub excluded_names: Vec<String>,
}

impl Default for BrightStarOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            limit: 0,
            common_only: false,
            print_common_only: false,
            excluded_names: vec!["Maia".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeepSkyOptions {
    pub enabled: bool,
    /// Objects smaller than this fraction of the image's short side are skipped.
    pub min_size_fraction: f64,
    /// Keep only Messier designations.
    pub only_messier: bool,
}

impl Default for DeepSkyOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            min_size_fraction: 0.02,
            only_messier: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToggleOptions {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    /// Line spacing in arcminutes; `None` disables the grid.
    pub spacing_arcmin: Option<f64>,
    pub color: Color,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            spacing_arcmin: None,
            color: Color::GRID_GREY,
        }
    }
}

/// Everything that shapes an annotation pass. Lengths are output pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotateConfig {
    pub scale: f64,
    pub font_size: f64,
    pub title_font_size: f64,
    pub ephemeris_font_size: f64,
    pub line_width: f64,
    pub end_trim: f64,
    pub label_margin: f64,
    pub label_offset: f64,
    pub marker_radius: f64,
    pub ngc_line_width: f64,
    pub halign: HAlign,
    pub valign: VAlign,
    /// Draw every label in white instead of its overlay colour.
    pub white_text: bool,
    /// Figure line colour; `None` picks a stable colour per constellation.
    pub line_color: Option<Color>,
    pub figure_marker: char,
    pub draw_markers: bool,
    pub json: bool,
    pub constellations: ToggleOptions,
    pub bright_stars: BrightStarOptions,
    pub ngc: DeepSkyOptions,
    pub hd: ToggleOptions,
    pub grid: GridOptions,
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            font_size: 25.0,
            title_font_size: 34.0,
            ephemeris_font_size: 31.0,
            line_width: 1.69,
            end_trim: 25.0,
            label_margin: 2.0,
            label_offset: 15.0,
            marker_radius: 17.5,
            ngc_line_width: 2.0,
            halign: HAlign::Left,
            valign: VAlign::Center,
            white_text: false,
            line_color: Some(Color::WHITE),
            figure_marker: '#',
            draw_markers: false,
            json: false,
            constellations: ToggleOptions::default(),
            bright_stars: BrightStarOptions::default(),
            ngc: DeepSkyOptions::default(),
            hd: ToggleOptions::default(),
            grid: GridOptions::default(),
        }
    }
}

impl AnnotateConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = common::load_file(path)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded annotate config");
        Ok(config)
    }

    /// Rejects sizes the renderer cannot work with: non-finite lengths,
    /// non-positive scale, font sizes or line widths, and negative spacings.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("scale", self.scale),
            ("font_size", self.font_size),
            ("title_font_size", self.title_font_size),
            ("ephemeris_font_size", self.ephemeris_font_size),
            ("line_width", self.line_width),
            ("ngc_line_width", self.ngc_line_width),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfig {
                    field,
                    value,
                    requirement: "finite and positive",
                });
            }
        }

        let non_negative = [
            ("end_trim", self.end_trim),
            ("label_margin", self.label_margin),
            ("marker_radius", self.marker_radius),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidConfig {
                    field,
                    value,
                    requirement: "finite and non-negative",
                });
            }
        }

        if !self.label_offset.is_finite() {
            return Err(Error::InvalidConfig {
                field: "label_offset",
                value: self.label_offset,
                requirement: "finite",
            });
        }
        Ok(())
    }

    pub fn metrics(&self) -> RenderMetrics {
        RenderMetrics::new(self)
    }

    /// Any overlay at all is switched on.
    pub fn any_catalog_overlay(&self) -> bool {
        self.constellations.enabled
            || self.bright_stars.enabled
            || self.ngc.enabled
            || self.hd.enabled
            || self.grid.spacing_arcmin.is_some()
    }
}

/// Config lengths converted to logical canvas units (divided by `scale` once).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderMetrics {
    pub font_size: f64,
    pub title_font_size: f64,
    pub ephemeris_font_size: f64,
    pub line_width: f64,
    pub end_trim: f64,
    pub label_margin: f64,
    pub label_offset: f64,
    pub marker_radius: f64,
    pub ngc_line_width: f64,
    pub halign: HAlign,
    pub valign: VAlign,
}

impl RenderMetrics {
    pub fn new(config: &AnnotateConfig) -> Self {
        let s = config.scale;
        Self {
            font_size: config.font_size / s,
            title_font_size: config.title_font_size / s,
            ephemeris_font_size: config.ephemeris_font_size / s,
            line_width: config.line_width / s,
            end_trim: config.end_trim / s,
            label_margin: config.label_margin / s,
            label_offset: config.label_offset / s,
            marker_radius: config.marker_radius / s,
            ngc_line_width: config.ngc_line_width / s,
            halign: config.halign,
            valign: config.valign,
        }
    }

    /// Normal label style at `size` in `color`, using the configured alignment.
    pub fn label_style(&self, size: f64, color: Color) -> LabelStyle {
        LabelStyle {
            size,
            color,
            halign: self.halign,
            valign: self.valign,
            margin: self.label_margin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = AnnotateConfig::default();
        assert_eq!(c.font_size, 25.0);
        assert_eq!(c.title_font_size, 34.0);
        assert_eq!(c.end_trim, 25.0);
        assert_eq!(c.bright_stars.excluded_names, ["Maia"]);
        assert_eq!(c.ngc.min_size_fraction, 0.02);
        assert_eq!(c.grid.color, Color::GRID_GREY);
        assert_eq!(c.figure_marker, '#');
        assert!(!c.any_catalog_overlay());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let c: AnnotateConfig = common::deserialize(
            "scale: 2.0\nhalign: C\nvalign: B\nbright_stars:\n  enabled: true\n  limit: 10\ngrid:\n  spacing_arcmin: 30\n",
            common::FileFormat::Yaml,
        )
        .unwrap();
        assert_eq!(c.scale, 2.0);
        assert_eq!(c.halign, HAlign::Center);
        assert_eq!(c.valign, VAlign::Bottom);
        assert!(c.bright_stars.enabled);
        assert_eq!(c.bright_stars.limit, 10);
        assert_eq!(c.bright_stars.excluded_names, ["Maia"]);
        assert_eq!(c.grid.spacing_arcmin, Some(30.0));
        assert_eq!(c.line_width, 1.69);
        assert!(c.any_catalog_overlay());
    }

    #[test]
    fn test_metrics_divide_by_scale_once() {
        let c = AnnotateConfig {
            scale: 2.0,
            ..Default::default()
        };
        let m = c.metrics();
        assert_eq!(m.font_size, 12.5);
        assert_eq!(m.title_font_size, 17.0);
        assert_eq!(m.end_trim, 12.5);
        assert_eq!(m.label_margin, 1.0);
    }

    #[test]
    fn test_load_json_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotate.json");
        std::fs::write(&path, r#"{ "white_text": true, "line_color": null }"#).unwrap();
        let c = AnnotateConfig::load(&path).unwrap();
        assert!(c.white_text);
        assert_eq!(c.line_color, None);
    }

    #[test]
    fn test_validate_rejects_unusable_sizes() {
        assert!(AnnotateConfig::default().validate().is_ok());

        let zero_font = AnnotateConfig {
            font_size: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            zero_font.validate(),
            Err(Error::InvalidConfig { field: "font_size", .. })
        ));

        let nan_title = AnnotateConfig {
            title_font_size: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            nan_title.validate(),
            Err(Error::InvalidConfig { field: "title_font_size", .. })
        ));

        let negative_trim = AnnotateConfig {
            end_trim: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            negative_trim.validate(),
            Err(Error::InvalidConfig { field: "end_trim", .. })
        ));
    }

    #[test]
    fn test_load_rejects_zero_font_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotate.yaml");
        std::fs::write(&path, "ephemeris_font_size: 0\n").unwrap();
        assert!(matches!(
            AnnotateConfig::load(&path),
            Err(Error::InvalidConfig { field: "ephemeris_font_size", .. })
        ));
    }
}
