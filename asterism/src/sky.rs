//! Celestial coordinates and the spherical-mean label anchor.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Equatorial position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SkyPoint {
    pub ra: f64,
    pub dec: f64,
}

impl SkyPoint {
    pub const fn new(ra: f64, dec: f64) -> Self {
        Self { ra, dec }
    }

    /// Embeds the point on the unit sphere (x toward RA 0, z toward the north pole).
    pub fn to_unit_vector(self) -> DVec3 {
        let (sin_ra, cos_ra) = self.ra.to_radians().sin_cos();
        let (sin_dec, cos_dec) = self.dec.to_radians().sin_cos();
        DVec3::new(cos_dec * cos_ra, cos_dec * sin_ra, sin_dec)
    }

    /// Inverse of [`SkyPoint::to_unit_vector`]. The vector need not be normalized.
    /// Returns `None` for a zero or non-finite vector.
    pub fn from_vector(v: DVec3) -> Option<Self> {
        let len = v.length();
        if !len.is_finite() || len <= 0.0 {
            return None;
        }
        let unit = v / len;
        let mut ra = unit.y.atan2(unit.x).to_degrees();
        if ra < 0.0 {
            ra += 360.0;
        }
        if ra >= 360.0 {
            ra -= 360.0;
        }
        let dec = unit.z.clamp(-1.0, 1.0).asin().to_degrees();
        Some(Self { ra, dec })
    }

    /// Great-circle separation in degrees.
    pub fn angular_distance_deg(self, other: SkyPoint) -> f64 {
        let a = self.to_unit_vector();
        let b = other.to_unit_vector();
        // atan2 form stays accurate for both tiny and near-antipodal separations.
        a.cross(b).length().atan2(a.dot(b)).to_degrees()
    }

    pub fn angular_distance_arcsec(self, other: SkyPoint) -> f64 {
        self.angular_distance_deg(other) * 3600.0
    }
}

/// Sums shorter than this are rounding residue of points that cancel out.
const DEGENERATE_SUM: f64 = 1e-12;

/// Running sum of unit vectors; the normalized sum is the spherical mean.
///
/// Every point of a figure is added regardless of whether it lands on screen,
/// so the finalized anchor does not move as members enter or leave the view.
#[derive(Debug, Clone, Default)]
pub struct CentroidAccumulator {
    sum: DVec3,
    count: usize,
}

impl CentroidAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, point: SkyPoint) {
        self.sum += point.to_unit_vector();
        self.count += 1;
    }

    /// Spherical mean of everything added so far, or `None` when the sum has
    /// zero magnitude (nothing added, or points cancel out exactly).
    pub fn finalize(&self) -> Option<SkyPoint> {
        if self.count == 0 || self.sum.length() <= DEGENERATE_SUM {
            return None;
        }
        SkyPoint::from_vector(self.sum)
    }

    pub fn reset(&mut self) {
        self.sum = DVec3::ZERO;
        self.count = 0;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
