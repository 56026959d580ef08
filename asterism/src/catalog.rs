//! In-memory sky catalogs and user point lists.
//!
//! Catalog contents are supplied by the caller (YAML or JSON through
//! [`common::load_file`]); this module only defines the records and the
//! queries the overlays need.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sky::SkyPoint;

/// A constellation stick figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constellation {
    pub short_name: String,
    pub long_name: String,
    /// Pairs of star positions, each pair one line of the figure.
    #[serde(default)]
    pub lines: Vec<[SkyPoint; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrightStar {
    /// Catalog designation, e.g. "α Tau".
    pub name: String,
    /// Proper name, empty when the star has none.
    #[serde(default)]
    pub common_name: String,
    pub ra: f64,
    pub dec: f64,
    /// Visual magnitude.
    pub vmag: f64,
}

impl BrightStar {
    pub fn position(&self) -> SkyPoint {
        SkyPoint::new(self.ra, self.dec)
    }

    pub fn has_common_name(&self) -> bool {
        !self.common_name.is_empty()
    }
}

/// NGC/IC object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeepSkyObject {
    /// All designations, e.g. `["NGC 1976", "M 42"]`.
    pub names: Vec<String>,
    pub ra: f64,
    pub dec: f64,
    /// Apparent size in arcminutes.
    pub size_arcmin: f64,
}

impl DeepSkyObject {
    pub fn position(&self) -> SkyPoint {
        SkyPoint::new(self.ra, self.dec)
    }
}

/// Henry Draper catalog star.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HdStar {
    pub hd: u32,
    pub ra: f64,
    pub dec: f64,
}

impl HdStar {
    pub fn position(&self) -> SkyPoint {
        SkyPoint::new(self.ra, self.dec)
    }
}

/// Read access to the reference catalogs.
pub trait SkyCatalog {
    fn constellations(&self) -> &[Constellation];

    fn bright_stars(&self) -> &[BrightStar];

    fn deep_sky_objects(&self) -> &[DeepSkyObject];

    /// HD stars within `radius_arcsec` of `center`.
    fn hd_stars_near(&self, center: SkyPoint, radius_arcsec: f64) -> Vec<HdStar>;
}

/// All catalogs held in memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub constellations: Vec<Constellation>,
    pub bright_stars: Vec<BrightStar>,
    pub deep_sky: Vec<DeepSkyObject>,
    pub hd_stars: Vec<HdStar>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self> {
        let catalog: Self = common::load_file(path)?;
        tracing::info!(
            path = %path.display(),
            constellations = catalog.constellations.len(),
            bright_stars = catalog.bright_stars.len(),
            deep_sky = catalog.deep_sky.len(),
            hd = catalog.hd_stars.len(),
            "Loaded catalog"
        );
        Ok(catalog)
    }

    pub fn merge(&mut self, other: Catalog) {
        self.constellations.extend(other.constellations);
        self.bright_stars.extend(other.bright_stars);
        self.deep_sky.extend(other.deep_sky);
        self.hd_stars.extend(other.hd_stars);
    }
}

impl SkyCatalog for Catalog {
    fn constellations(&self) -> &[Constellation] {
        &self.constellations
    }

    fn bright_stars(&self) -> &[BrightStar] {
        &self.bright_stars
    }

    fn deep_sky_objects(&self) -> &[DeepSkyObject] {
        &self.deep_sky
    }

    fn hd_stars_near(&self, center: SkyPoint, radius_arcsec: f64) -> Vec<HdStar> {
        self.hd_stars
            .iter()
            .filter(|s| center.angular_distance_arcsec(s.position()) <= radius_arcsec)
            .copied()
            .collect()
    }
}

/// A named position from a user list (ephemeris objects, custom targets).
#[derive(Debug, Clone, PartialEq)]
pub struct UserPoint {
    pub name: String,
    pub position: SkyPoint,
}

/// Parses `name ra dec` lines. Lines that do not start with those three
/// fields are skipped; anything after them is ignored.
pub fn parse_user_points(text: &str) -> Vec<UserPoint> {
    text.lines()
        .filter_map(|line| {
            let mut tokens = line.split_whitespace();
            let name = tokens.next()?;
            let ra = tokens.next()?.parse::<f64>().ok()?;
            let dec = tokens.next()?.parse::<f64>().ok()?;
            if !ra.is_finite() || !dec.is_finite() {
                return None;
            }
            Some(UserPoint {
                name: name.to_string(),
                position: SkyPoint::new(ra, dec),
            })
        })
        .collect()
}

pub fn read_user_points(path: &Path) -> Result<Vec<UserPoint>> {
    let text = fs::read_to_string(path).map_err(|source| Error::ResourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let points = parse_user_points(&text);
    tracing::debug!(path = %path.display(), count = points.len(), "Read user points");
    Ok(points)
}
