use image::{Rgba, RgbaImage};

use super::surface::{Mask, Surface};
use crate::color::Color;
use crate::error::{Error, Result};

/// Flattens the layers onto `base`, or onto opaque black when there is none.
///
/// Order is fixed: background through `mask`, shapes through `mask`, then the
/// foreground masked by its own alpha.
pub(crate) fn flatten(
    background: &Surface,
    shapes: &Surface,
    mask: &Mask,
    foreground: &Surface,
    base: Option<&RgbaImage>,
) -> Result<RgbaImage> {
    debug_assert!(
        background.same_size(mask) && shapes.same_size(mask) && foreground.same_size(mask)
    );
    let (width, height) = (mask.width(), mask.height());
    let mut out = match base {
        Some(image) => {
            let (w, h) = (image.width() as usize, image.height() as usize);
            if (w, h) != (width, height) {
                return Err(Error::SizeMismatch {
                    width,
                    height,
                    actual_width: w,
                    actual_height: h,
                });
            }
            image.clone()
        }
        None => RgbaImage::from_pixel(width as u32, height as u32, Rgba([0, 0, 0, 255])),
    };

    for (i, pixel) in out.pixels_mut().enumerate() {
        let m = mask[i];
        let fg = foreground[i];
        let mut c = Color::from_rgba8(pixel.0);
        c = background[i].over(c, m);
        c = shapes[i].over(c, m);
        c = fg.over(c, fg.a);
        *pixel = Rgba(c.to_rgba8());
    }
    Ok(out)
}
