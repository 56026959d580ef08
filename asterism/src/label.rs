//! Label placement: alignment, on-canvas clamping, exclusion box and mask cutout.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::canvas::LayeredCanvas;
use crate::color::Color;
use crate::geometry::LabelBox;
use crate::projection::Projector;
use crate::sky::SkyPoint;
use crate::text::{TextExtents, TextRenderer};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum HAlign {
    #[default]
    #[serde(alias = "L", alias = "left")]
    #[strum(serialize = "Left", serialize = "L")]
    Left,
    #[serde(alias = "C", alias = "center")]
    #[strum(serialize = "Center", serialize = "C")]
    Center,
    #[serde(alias = "R", alias = "right")]
    #[strum(serialize = "Right", serialize = "R")]
    Right,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum VAlign {
    #[serde(alias = "T", alias = "top")]
    #[strum(serialize = "Top", serialize = "T")]
    Top,
    #[default]
    #[serde(alias = "C", alias = "center")]
    #[strum(serialize = "Center", serialize = "C")]
    Center,
    #[serde(alias = "B", alias = "bottom")]
    #[strum(serialize = "Bottom", serialize = "B")]
    Bottom,
}

/// How a single label is drawn. Lengths are logical canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    pub size: f64,
    pub color: Color,
    pub halign: HAlign,
    pub valign: VAlign,
    /// Grows the exclusion box on every side.
    pub margin: f64,
}

/// Where a label ended up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    /// Baseline origin the text was drawn at.
    pub position: DVec2,
    /// Clamped text box plus margin; `None` when the text has no area.
    pub label_box: Option<LabelBox>,
}

/// Aligns `anchor` for text with `extents` and pulls it inward just far enough
/// for the text box to fit `[0, width] x [0, height]`.
///
/// Returns the baseline origin and the unexpanded text box.
pub fn layout_label(
    extents: &TextExtents,
    anchor: DVec2,
    halign: HAlign,
    valign: VAlign,
    width: f64,
    height: f64,
) -> (DVec2, LabelBox) {
    let mut pos = anchor;
    match valign {
        VAlign::Top => pos.y -= 0.5 * extents.y_bearing,
        VAlign::Center => {}
        VAlign::Bottom => pos.y += 0.5 * extents.y_bearing,
    }
    match halign {
        HAlign::Left => {}
        HAlign::Center => pos.x -= extents.width / 2.0,
        HAlign::Right => pos.x -= extents.width,
    }

    let left = pos.x + extents.x_bearing;
    if left < 0.0 {
        pos.x -= left;
    }
    let right = pos.x + extents.x_bearing + extents.width;
    if right > width {
        pos.x -= right - width;
    }
    let top = pos.y + extents.y_bearing;
    if top < 0.0 {
        pos.y -= top;
    }
    let bottom = pos.y + extents.y_bearing + extents.height;
    if bottom > height {
        pos.y -= bottom - height;
    }

    let text_box = LabelBox::new(
        pos.x + extents.x_bearing,
        pos.y + extents.y_bearing,
        extents.width,
        extents.height,
    );
    (pos, text_box)
}

/// Lays out, draws and masks one label at a canvas position.
///
/// Glyphs always go to the foreground. Unless the text box is degenerate, the
/// margin-expanded box is cut out of the shapes mask so strokes beneath it
/// disappear at composite time, whatever order they were drawn in.
pub fn place_label(
    canvas: &mut LayeredCanvas,
    renderer: &mut dyn TextRenderer,
    text: &str,
    anchor: DVec2,
    style: &LabelStyle,
) -> LabelPlacement {
    let extents = canvas.text_extents(renderer, text, style.size);
    let (position, text_box) = layout_label(
        &extents,
        anchor,
        style.halign,
        style.valign,
        canvas.width(),
        canvas.height(),
    );

    canvas.draw_text(renderer, text, position, style.size, style.color);

    let label_box = if text_box.is_degenerate() {
        tracing::trace!(text, "Label has no area, skipping mask cutout");
        None
    } else {
        let expanded = text_box.expanded(style.margin);
        canvas.cut_out(&expanded);
        Some(expanded)
    };

    LabelPlacement {
        position,
        label_box,
    }
}

/// [`place_label`] at a sky position. `None` when the anchor does not project.
pub fn place_label_at_sky<P: Projector + ?Sized>(
    canvas: &mut LayeredCanvas,
    renderer: &mut dyn TextRenderer,
    projector: &P,
    text: &str,
    anchor: SkyPoint,
    style: &LabelStyle,
) -> Option<LabelPlacement> {
    let Some(pixel) = projector.sky_to_pixel(anchor) else {
        tracing::trace!(text, ra = anchor.ra, dec = anchor.dec, "Label anchor does not project");
        return None;
    };
    Some(place_label(canvas, renderer, text, pixel, style))
}
