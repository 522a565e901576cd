use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

/// Scenario configuration.
///
/// Loaded from a TOML file and validated before use.
/// See [`Config::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Config {
    pub model: ModelConfig,
    pub outbreak: OutbreakConfig,
    pub region: RegionConfig,
    pub weather: WeatherConfig,
}

/// SEIR model parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Transmission rate (beta, per day).
    pub beta: f64,
    /// Incubation rate (sigma, per day).
    pub sigma: f64,
    /// Recovery rate (gamma, per day).
    pub gamma: f64,

    /// Total population size.
    pub population: f64,

    /// Initially exposed individuals.
    pub initial_exposed: f64,
    /// Initially infected individuals.
    pub initial_infected: f64,
    /// Initially recovered individuals.
    pub initial_recovered: f64,

    /// Simulated horizon in days.
    pub duration_days: usize,
}

/// Patient line-list generation parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct OutbreakConfig {
    /// Disease label attached to every patient record.
    pub disease_name: String,
    /// First simulated day, `YYYY-MM-DD`.
    pub start_date: String,
}

/// Geographic region the records are placed in.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct RegionConfig {
    pub center_lat: f64,
    pub center_lon: f64,
    /// Sampling disk radius around the center, in kilometers.
    pub radius_km: f64,

    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Weather synthesis parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// First simulated day, `YYYY-MM-DD`.
    pub start_date: String,
    /// Number of simulated days (24 hourly records each).
    pub duration_days: usize,
}

impl Config {
    /// Load a [`Config`] from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.model.validate().context("invalid model parameters")?;

        parse_date(&self.outbreak.start_date).context("invalid outbreak start date")?;
        parse_date(&self.weather.start_date).context("invalid weather start date")?;

        check_num(self.weather.duration_days, 1..36_500)
            .context("invalid weather duration")?;

        self.region.validate().context("invalid region")?;

        Ok(())
    }
}

impl ModelConfig {
    /// Validate the model parameters.
    ///
    /// Rejects non-positive rates or population, negative initial
    /// compartments, and initial compartments exceeding the population.
    pub fn validate(&self) -> Result<()> {
        check_positive(self.beta).context("invalid transmission rate")?;
        check_positive(self.sigma).context("invalid incubation rate")?;
        check_positive(self.gamma).context("invalid recovery rate")?;
        check_positive(self.population).context("invalid population")?;
        check_num(self.initial_exposed, 0.0..f64::INFINITY)
            .context("invalid initial exposed count")?;
        check_num(self.initial_infected, 0.0..f64::INFINITY)
            .context("invalid initial infected count")?;
        check_num(self.initial_recovered, 0.0..f64::INFINITY)
            .context("invalid initial recovered count")?;

        let initial = self.initial_exposed + self.initial_infected + self.initial_recovered;
        if initial > self.population {
            bail!(
                "initial compartments sum to {initial}, which exceeds the population {}",
                self.population
            );
        }

        check_num(self.duration_days, 0..36_500).context("invalid duration")?;

        Ok(())
    }

    /// Initially susceptible individuals.
    pub fn initial_susceptible(&self) -> f64 {
        self.population - self.initial_exposed - self.initial_infected - self.initial_recovered
    }
}

impl RegionConfig {
    fn validate(&self) -> Result<()> {
        check_positive(self.radius_km).context("invalid sampling radius")?;
        check_num(self.radius_km, 0.0..20_000.0).context("sampling radius too large")?;

        if self.min_lat >= self.max_lat {
            bail!("latitude bounds are empty: [{}, {}]", self.min_lat, self.max_lat);
        }
        if self.min_lon >= self.max_lon {
            bail!("longitude bounds are empty: [{}, {}]", self.min_lon, self.max_lon);
        }

        check_num(self.center_lat, -90.0..=90.0).context("invalid center latitude")?;
        check_num(self.center_lon, -180.0..=180.0).context("invalid center longitude")?;

        Ok(())
    }
}

/// Parse a `YYYY-MM-DD` date string.
pub fn parse_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .with_context(|| format!("failed to parse date {date:?}"))
}

fn check_positive(num: f64) -> Result<()> {
    if !num.is_finite() || num <= 0.0 {
        bail!("number must be positive, but is {num}");
    }
    Ok(())
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}
