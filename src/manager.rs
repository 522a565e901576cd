use crate::config::Config;
use crate::engine::Engine;
use crate::report;
use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Ties the configuration, engine and report layer to a scenario directory.
pub struct Manager {
    sim_dir: PathBuf,
    cfg: Config,
    seed: Option<u64>,
}

impl Manager {
    pub fn new<P: AsRef<Path>>(sim_dir: P, seed: Option<u64>) -> Result<Self> {
        let sim_dir = sim_dir.as_ref().to_path_buf();

        let cfg =
            Config::from_file(sim_dir.join("config.toml")).context("failed to construct cfg")?;
        log::info!("{cfg:#?}");

        Ok(Self { sim_dir, cfg, seed })
    }

    /// Run the outbreak pipeline and write its tables and summary.
    pub fn run_outbreak(&self) -> Result<()> {
        let out_dir = self.output_dir("outbreak")?;

        let mut engine = Engine::new(self.cfg.clone(), self.seed)
            .context("failed to construct engine")?;
        let data = engine.run_outbreak().context("failed to run outbreak")?;

        report::write_trajectory(out_dir.join("trajectory.csv"), &data.trajectory)
            .context("failed to write trajectory table")?;
        report::write_patients(out_dir.join("patients.csv"), &data.patients)
            .context("failed to write patient table")?;
        report::write_outbreak_summary(
            out_dir.join("summary.json"),
            &data.trajectory,
            &data.patients,
        )
        .context("failed to write outbreak summary")?;

        log::info!("wrote outbreak results to {out_dir:?}");

        Ok(())
    }

    /// Run the weather pipeline and write its table and summary.
    pub fn run_weather(&self) -> Result<()> {
        let out_dir = self.output_dir("weather")?;

        let mut engine = Engine::new(self.cfg.clone(), self.seed)
            .context("failed to construct engine")?;
        let records = engine.run_weather().context("failed to run weather")?;

        report::write_weather(out_dir.join("weather.csv"), &records)
            .context("failed to write weather table")?;
        report::write_weather_summary(out_dir.join("summary.json"), &records)
            .context("failed to write weather summary")?;

        log::info!("wrote weather results to {out_dir:?}");

        Ok(())
    }

    fn output_dir(&self, name: &str) -> Result<PathBuf> {
        let out_dir = self.sim_dir.join(name);
        fs::create_dir_all(&out_dir).with_context(|| format!("failed to create {out_dir:?}"))?;
        Ok(out_dir)
    }
}
