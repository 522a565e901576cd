use crate::config::{Config, parse_date};
use crate::geo::{Bounds, GeoSampler};
use crate::patients::{self, PatientRecord};
use crate::seir::{self, Trajectory};
use crate::weather::{self, WeatherRecord};
use anyhow::{Context, Result};
use rand::prelude::*;
use rand_chacha::ChaCha12Rng;

/// Output of an outbreak run.
pub struct OutbreakData {
    pub trajectory: Trajectory,
    pub patients: Vec<PatientRecord>,
}

/// Scenario engine.
///
/// Holds the configuration and random number generator and drives the
/// outbreak and weather pipelines. Each engine owns its generator, so two
/// engines built from the same seed produce identical scenarios.
pub struct Engine {
    cfg: Config,
    rng: ChaCha12Rng,
}

impl Engine {
    /// Create a new `Engine`, seeded from the OS unless a seed is given.
    pub fn new(cfg: Config, seed: Option<u64>) -> Result<Self> {
        let rng = match seed {
            Some(seed) => ChaCha12Rng::seed_from_u64(seed),
            None => ChaCha12Rng::try_from_os_rng()?,
        };
        Ok(Self { cfg, rng })
    }

    /// Integrate the SEIR model and expand the infected trajectory into a
    /// patient line-list.
    pub fn run_outbreak(&mut self) -> Result<OutbreakData> {
        let trajectory = seir::simulate(&self.cfg.model).context("failed to run SEIR model")?;

        let start_date = parse_date(&self.cfg.outbreak.start_date)?;
        let geo = GeoSampler::new(&self.cfg.region).context("failed to build geo sampler")?;

        let patients = patients::expand(
            &trajectory,
            self.cfg.model.initial_infected,
            &self.cfg.outbreak.disease_name,
            start_date,
            &geo,
            &mut self.rng,
        )
        .context("failed to expand patient records")?;

        log::info!(
            "expanded {} patient records from {} trajectory points",
            patients.len(),
            trajectory.len()
        );

        Ok(OutbreakData {
            trajectory,
            patients,
        })
    }

    /// Synthesize the hourly weather records.
    pub fn run_weather(&mut self) -> Result<Vec<WeatherRecord>> {
        let start_date = parse_date(&self.cfg.weather.start_date)?;
        let bounds = Bounds::from(&self.cfg.region);

        let records = weather::synthesize(
            start_date,
            self.cfg.weather.duration_days,
            &bounds,
            &mut self.rng,
        )
        .context("failed to synthesize weather records")?;

        log::info!("synthesized {} hourly weather records", records.len());

        Ok(records)
    }
}
