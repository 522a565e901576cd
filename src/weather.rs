use crate::geo::Bounds;
use anyhow::{Context, Result};
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use rand::prelude::*;
use rand_distr::{Bernoulli, Uniform};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Daily base temperature range, degrees Celsius.
const BASE_TEMP_RANGE: (f64, f64) = (24.0, 32.0);
/// Diurnal temperature sinusoid amplitude, degrees Celsius.
const DIURNAL_AMPLITUDE: f64 = 3.0;
/// Flat temperature reduction applied during night hours.
const NIGHT_REDUCTION: f64 = 3.0;
/// Diurnal wind sinusoid amplitude, km/h.
const WIND_AMPLITUDE: f64 = 5.0;

/// Monsoon regime, keyed by calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Southwest,
    Northeast,
    InterMonsoon,
    Normal,
}

/// Seasonal parameter profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonProfile {
    pub rainfall_probability: f64,
    /// Hourly rainfall intensity range, mm.
    pub rainfall_mm: (f64, f64),
    /// Wind speed range, km/h.
    pub wind_kmh: (f64, f64),
    /// Relative humidity range, percent.
    pub humidity_pct: (f64, f64),
}

impl Season {
    /// Classify a calendar month (1-12) into a monsoon season.
    pub fn from_month(month: u32) -> Season {
        match month {
            5..=9 => Season::Southwest,
            12 | 1 | 2 => Season::Northeast,
            3 | 4 | 10 | 11 => Season::InterMonsoon,
            _ => Season::Normal,
        }
    }

    /// True for the two monsoon regimes proper.
    pub fn is_monsoon(self) -> bool {
        matches!(self, Season::Southwest | Season::Northeast)
    }

    pub fn label(self) -> &'static str {
        match self {
            Season::Southwest => "southwest",
            Season::Northeast => "northeast",
            Season::InterMonsoon => "inter_monsoon",
            Season::Normal => "normal",
        }
    }

    pub fn profile(self) -> SeasonProfile {
        match self {
            Season::Southwest => SeasonProfile {
                rainfall_probability: 0.8,
                rainfall_mm: (20.0, 150.0),
                wind_kmh: (15.0, 45.0),
                humidity_pct: (75.0, 95.0),
            },
            Season::Northeast => SeasonProfile {
                rainfall_probability: 0.6,
                rainfall_mm: (10.0, 100.0),
                wind_kmh: (10.0, 35.0),
                humidity_pct: (70.0, 90.0),
            },
            Season::InterMonsoon => SeasonProfile {
                rainfall_probability: 0.4,
                rainfall_mm: (5.0, 50.0),
                wind_kmh: (5.0, 25.0),
                humidity_pct: (65.0, 85.0),
            },
            Season::Normal => SeasonProfile {
                rainfall_probability: 0.2,
                rainfall_mm: (0.0, 20.0),
                wind_kmh: (0.0, 15.0),
                humidity_pct: (60.0, 80.0),
            },
        }
    }
}

/// One synthesized hourly weather observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub timestamp: NaiveDateTime,
    pub season: Season,
    pub latitude: f64,
    pub longitude: f64,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Percent, capped at 100.
    pub humidity: f64,
    /// Millimeters, 0 outside rain hours.
    pub rainfall: f64,
    /// Km/h, clamped at 0.
    pub wind_speed: f64,
}

/// Synthesize one weather record per hour across the duration.
///
/// The season is looked up per day from the calendar month. A daily base
/// temperature and a rainy-day flag are drawn once and shared by all 24
/// hours of that day; the per-hour values follow diurnal sinusoids plus
/// seasonal randomization. Locations are drawn uniformly within the bounds.
pub fn synthesize<R: Rng>(
    start_date: NaiveDate,
    duration_days: usize,
    bounds: &Bounds,
    rng: &mut R,
) -> Result<Vec<WeatherRecord>> {
    let base_temp_dist = Uniform::new(BASE_TEMP_RANGE.0, BASE_TEMP_RANGE.1)?;
    let cooling_dist = Uniform::new(1.0, 3.0)?;
    let extra_humidity_dist = Uniform::new(5.0, 10.0)?;
    let lat_dist = Uniform::new(bounds.min_lat, bounds.max_lat)?;
    let lon_dist = Uniform::new(bounds.min_lon, bounds.max_lon)?;

    let mut records = Vec::with_capacity(duration_days * 24);

    for day in 0..duration_days {
        let date = start_date
            .checked_add_days(Days::new(day as u64))
            .context("simulated day is out of the calendar range")?;

        let season = Season::from_month(date.month());
        let profile = season.profile();

        let rain_dist = Uniform::new(profile.rainfall_mm.0, profile.rainfall_mm.1)?;
        let wind_dist = Uniform::new(profile.wind_kmh.0, profile.wind_kmh.1)?;
        let humidity_dist = Uniform::new(profile.humidity_pct.0, profile.humidity_pct.1)?;

        let base_temp = base_temp_dist.sample(rng);
        let is_rainy_day = Bernoulli::new(profile.rainfall_probability)?.sample(rng);

        for hour in 0..24u32 {
            let timestamp = date
                .and_hms_opt(hour, 0, 0)
                .context("invalid hour of day")?;

            let mut temperature =
                base_temp + (PI * (hour as f64 - 6.0) / 12.0).sin() * DIURNAL_AMPLITUDE;
            if hour <= 6 || hour >= 18 {
                temperature -= NIGHT_REDUCTION;
            }
            if season.is_monsoon() && is_rainy_day {
                temperature -= cooling_dist.sample(rng);
            }

            let mut humidity = humidity_dist.sample(rng);
            if is_rainy_day {
                humidity += extra_humidity_dist.sample(rng);
            }
            humidity = humidity.min(100.0);

            let rainfall = if is_rainy_day {
                hourly_rainfall(season, hour, &rain_dist, rng)
            } else {
                0.0
            };

            let wind_variation = (PI * hour as f64 / 12.0).sin() * WIND_AMPLITUDE;
            let wind_speed = (wind_dist.sample(rng) + wind_variation).max(0.0);

            records.push(WeatherRecord {
                timestamp,
                season,
                latitude: lat_dist.sample(rng),
                longitude: lon_dist.sample(rng),
                temperature,
                humidity,
                rainfall,
                wind_speed,
            });
        }
    }

    Ok(records)
}

/// Rainfall for one hour of a rainy day.
///
/// Monsoon rain falls through the daytime with a sinusoidal intensity peak;
/// outside the monsoons rain is confined to the afternoon.
fn hourly_rainfall<R: Rng>(
    season: Season,
    hour: u32,
    rain_dist: &Uniform<f64>,
    rng: &mut R,
) -> f64 {
    if season.is_monsoon() {
        if (6..=18).contains(&hour) {
            rain_dist.sample(rng) * (1.0 + (PI * hour as f64 / 12.0).sin() * 0.5)
        } else {
            0.0
        }
    } else if (12..=18).contains(&hour) {
        rain_dist.sample(rng)
    } else {
        0.0
    }
}
