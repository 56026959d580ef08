//! Sky <-> pixel projection.
//!
//! The annotation engine only needs the [`Projector`] capability. [`Wcs`] is the
//! gnomonic (TAN) implementation used by the command-line tool; any other
//! projection (SIP, a test stub) can be plugged in through the trait.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::sky::SkyPoint;

/// Maps sky coordinates to image pixels and back.
///
/// `None` means the point has no defined image-plane location. Callers skip
/// the affected point; it is never an error.
pub trait Projector {
    fn sky_to_pixel(&self, sky: SkyPoint) -> Option<DVec2>;

    fn pixel_to_sky(&self, pixel: DVec2) -> Option<SkyPoint>;

    /// Pixel scale in arcseconds per pixel near `at`.
    ///
    /// The default estimates it from the sky distance to the neighbouring pixels.
    fn pixel_scale_arcsec(&self, at: DVec2) -> Option<f64> {
        let center = self.pixel_to_sky(at)?;
        let right = self.pixel_to_sky(at + DVec2::X)?;
        let down = self.pixel_to_sky(at + DVec2::Y)?;
        let scale =
            (center.angular_distance_arcsec(right) + center.angular_distance_arcsec(down)) / 2.0;
        scale.is_finite().then_some(scale)
    }
}

impl<P: Projector + ?Sized> Projector for &P {
    fn sky_to_pixel(&self, sky: SkyPoint) -> Option<DVec2> {
        (**self).sky_to_pixel(sky)
    }

    fn pixel_to_sky(&self, pixel: DVec2) -> Option<SkyPoint> {
        (**self).pixel_to_sky(pixel)
    }

    fn pixel_scale_arcsec(&self, at: DVec2) -> Option<f64> {
        (**self).pixel_scale_arcsec(at)
    }
}

/// Tangent-plane World Coordinate System.
///
/// Pixel to intermediate: `(xi, eta) = CD x (x - CRPIX1, y - CRPIX2)`, then
/// de-projected from the tangent plane at `crval`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wcs {
    /// Reference pixel (CRPIX1, CRPIX2).
    pub crpix: [f64; 2],
    /// Reference sky position in degrees (CRVAL1 = RA, CRVAL2 = Dec).
    pub crval: [f64; 2],
    /// [[CD1_1, CD1_2], [CD2_1, CD2_2]] in degrees per pixel.
    pub cd: [[f64; 2]; 2],
    /// Image size the solution was computed for, if known.
    #[serde(default)]
    pub image_size: Option<[u32; 2]>,
}

impl Wcs {
    pub fn new(crpix: [f64; 2], crval: [f64; 2], cd: [[f64; 2]; 2]) -> Self {
        Self {
            crpix,
            crval,
            cd,
            image_size: None,
        }
    }

    /// Builds a CD matrix from a pixel scale (arcsec/pixel) and a position angle
    /// (degrees, North through East).
    pub fn from_scale_rotation(
        crpix: [f64; 2],
        crval: [f64; 2],
        pixel_scale: f64,
        rotation: f64,
        mirrored: bool,
    ) -> Self {
        let scale_deg = pixel_scale / 3600.0;
        let (sin_r, cos_r) = rotation.to_radians().sin_cos();
        let sign = if mirrored { -1.0 } else { 1.0 };

        let cd = [
            [sign * scale_deg * cos_r, -scale_deg * sin_r],
            [sign * scale_deg * sin_r, scale_deg * cos_r],
        ];

        Self::new(crpix, crval, cd)
    }

    pub fn with_image_size(mut self, width: u32, height: u32) -> Self {
        self.image_size = Some([width, height]);
        self
    }

    fn determinant(&self) -> f64 {
        self.cd[0][0] * self.cd[1][1] - self.cd[0][1] * self.cd[1][0]
    }
}

impl Projector for Wcs {
    fn sky_to_pixel(&self, sky: SkyPoint) -> Option<DVec2> {
        let ra = sky.ra.to_radians();
        let dec = sky.dec.to_radians();
        let ra0 = self.crval[0].to_radians();
        let dec0 = self.crval[1].to_radians();

        let (sin_dec, cos_dec) = dec.sin_cos();
        let (sin_dec0, cos_dec0) = dec0.sin_cos();
        let (sin_dra, cos_dra) = (ra - ra0).sin_cos();

        // Cosine of the angle to the tangent point; the far hemisphere has no image.
        let d = sin_dec * sin_dec0 + cos_dec * cos_dec0 * cos_dra;
        if d <= 0.0 {
            return None;
        }

        let xi = (cos_dec * sin_dra / d).to_degrees();
        let eta = ((sin_dec * cos_dec0 - cos_dec * sin_dec0 * cos_dra) / d).to_degrees();

        let det = self.determinant();
        if det.abs() < 1e-15 {
            return None;
        }

        let dx = (self.cd[1][1] * xi - self.cd[0][1] * eta) / det;
        let dy = (-self.cd[1][0] * xi + self.cd[0][0] * eta) / det;
        let pixel = DVec2::new(self.crpix[0] + dx, self.crpix[1] + dy);

        pixel.is_finite().then_some(pixel)
    }

    fn pixel_to_sky(&self, pixel: DVec2) -> Option<SkyPoint> {
        let dx = pixel.x - self.crpix[0];
        let dy = pixel.y - self.crpix[1];

        let xi = (self.cd[0][0] * dx + self.cd[0][1] * dy).to_radians();
        let eta = (self.cd[1][0] * dx + self.cd[1][1] * dy).to_radians();

        let ra0 = self.crval[0].to_radians();
        let (sin_dec0, cos_dec0) = self.crval[1].to_radians().sin_cos();
        let denom = cos_dec0 - eta * sin_dec0;

        let ra = ra0 + xi.atan2(denom);
        let dec = (sin_dec0 + eta * cos_dec0).atan2((xi * xi + denom * denom).sqrt());

        let mut ra_deg = ra.to_degrees();
        if ra_deg < 0.0 {
            ra_deg += 360.0;
        } else if ra_deg >= 360.0 {
            ra_deg -= 360.0;
        }

        let sky = SkyPoint::new(ra_deg, dec.to_degrees());
        (sky.ra.is_finite() && sky.dec.is_finite()).then_some(sky)
    }

    fn pixel_scale_arcsec(&self, _at: DVec2) -> Option<f64> {
        let scale_x = (self.cd[0][0].powi(2) + self.cd[1][0].powi(2)).sqrt();
        let scale_y = (self.cd[0][1].powi(2) + self.cd[1][1].powi(2)).sqrt();
        Some((scale_x + scale_y) / 2.0 * 3600.0)
    }
}

/// RA/Dec extent of a field, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyBounds {
    pub ra_min: f64,
    pub ra_max: f64,
    pub dec_min: f64,
    pub dec_max: f64,
}

/// Samples the image on a grid of `step` pixels (edges included) and returns
/// the RA/Dec bounding range of the samples that de-project.
///
/// RA wrap-around at 0/360 is not unwrapped; fields straddling it report the
/// full RA range.
pub fn sky_bounds<P: Projector + ?Sized>(
    projector: &P,
    width: f64,
    height: f64,
    step: f64,
) -> Option<SkyBounds> {
    let step = step.max(1.0);
    let axis = |extent: f64| {
        let n = (extent / step).ceil().max(1.0) as usize;
        (0..=n).map(move |i| (i as f64 * step).min(extent))
    };

    let mut bounds: Option<SkyBounds> = None;
    for y in axis(height) {
        for x in axis(width) {
            let Some(sky) = projector.pixel_to_sky(DVec2::new(x, y)) else {
                continue;
            };
            let b = bounds.get_or_insert(SkyBounds {
                ra_min: sky.ra,
                ra_max: sky.ra,
                dec_min: sky.dec,
                dec_max: sky.dec,
            });
            b.ra_min = b.ra_min.min(sky.ra);
            b.ra_max = b.ra_max.max(sky.ra);
            b.dec_min = b.dec_min.min(sky.dec);
            b.dec_max = b.dec_max.max(sky.dec);
        }
    }
    bounds
}
