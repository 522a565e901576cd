use crate::config::RegionConfig;
use anyhow::{Result, bail};
use rand::prelude::*;
use rand_distr::Uniform;

/// Kilometers per degree of latitude (and of longitude at the equator).
const KM_PER_DEG: f64 = 111.32;

/// Redraws before giving up when the disk barely overlaps the bounds.
const MAX_ATTEMPTS: usize = 10_000;

/// Rectangular latitude/longitude box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat)
            && (self.min_lon..=self.max_lon).contains(&lon)
    }
}

impl From<&RegionConfig> for Bounds {
    fn from(region: &RegionConfig) -> Self {
        Self {
            min_lat: region.min_lat,
            max_lat: region.max_lat,
            min_lon: region.min_lon,
            max_lon: region.max_lon,
        }
    }
}

/// Rejection sampler for points within a radius of a center coordinate,
/// constrained to a bounding box.
pub struct GeoSampler {
    center_lat: f64,
    center_lon: f64,
    radius_km: f64,
    bounds: Bounds,
    unit: Uniform<f64>,
}

impl GeoSampler {
    pub fn new(region: &RegionConfig) -> Result<Self> {
        Ok(Self {
            center_lat: region.center_lat,
            center_lon: region.center_lon,
            radius_km: region.radius_km,
            bounds: Bounds::from(region),
            unit: Uniform::new(0.0, 1.0)?,
        })
    }

    /// Draw a point uniformly from the disk around the center, rejecting
    /// points outside the bounding box.
    ///
    /// # Errors
    /// Fails if no point inside the bounds is found within [`MAX_ATTEMPTS`]
    /// draws, which means the disk and the bounds are incompatible.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Result<(f64, f64)> {
        for _ in 0..MAX_ATTEMPTS {
            // sqrt keeps the sample uniform in area.
            let r = self.radius_km * self.unit.sample(rng).sqrt();
            let theta = self.unit.sample(rng) * 2.0 * std::f64::consts::PI;

            let dx = r * theta.cos();
            let dy = r * theta.sin();

            // Local flat-Earth approximation.
            let lat = self.center_lat + dy / KM_PER_DEG;
            let lon = self.center_lon + dx / (KM_PER_DEG * self.center_lat.to_radians().cos());

            if self.bounds.contains(lat, lon) {
                return Ok((lat, lon));
            }
        }

        bail!(
            "no point within {} km of ({}, {}) fell inside the bounds after {MAX_ATTEMPTS} draws",
            self.radius_km,
            self.center_lat,
            self.center_lon
        );
    }
}
