use crate::geo::GeoSampler;
use crate::seir::Trajectory;
use anyhow::{Context, Result};
use chrono::{Days, NaiveDate, NaiveDateTime};
use rand::prelude::*;
use rand_distr::{Uniform, weighted::WeightedIndex};
use serde::{Deserialize, Serialize};

/// Case severity drawn for each synthesized patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Mild, Severity::Moderate, Severity::Severe];

    /// Categorical weights, in the order of [`Severity::ALL`].
    pub const WEIGHTS: [f64; 3] = [0.70, 0.25, 0.05];

    pub fn label(self) -> &'static str {
        match self {
            Severity::Mild => "Mild",
            Severity::Moderate => "Moderate",
            Severity::Severe => "Severe",
        }
    }
}

/// One synthesized line-list entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Sequential zero-padded identifier, e.g. `P00001`.
    pub patient_id: String,
    pub disease: String,
    pub timestamp: NaiveDateTime,
    pub age: u8,
    pub severity: Severity,
    pub latitude: f64,
    pub longitude: f64,
}

/// Expand the infected trajectory into individual patient records.
///
/// For each day the number of new cases is the day-over-day increase of the
/// rounded infected compartment (the increase over the configured initial
/// infected count on day 0), clamped at zero on days the compartment
/// shrinks. Each new case gets a random time of day, age, severity and a
/// disk-sampled location.
pub fn expand<R: Rng>(
    trajectory: &Trajectory,
    initial_infected: f64,
    disease: &str,
    start_date: NaiveDate,
    geo: &GeoSampler,
    rng: &mut R,
) -> Result<Vec<PatientRecord>> {
    let hour_dist = Uniform::new(0u32, 24)?;
    let minute_dist = Uniform::new(0u32, 60)?;
    let age_dist = Uniform::new_inclusive(1u8, 90)?;
    let severity_dist = WeightedIndex::new(Severity::WEIGHTS)?;

    let mut records = Vec::new();
    let mut patient_counter: u64 = 1;
    let mut prev = initial_infected.round() as i64;

    for state in trajectory {
        let infected = state.infected.round() as i64;
        let new_cases = (infected - prev).max(0);
        prev = infected;

        let date = start_date
            .checked_add_days(Days::new(state.day as u64))
            .context("simulated day is out of the calendar range")?;

        for _ in 0..new_cases {
            let hour = hour_dist.sample(rng);
            let minute = minute_dist.sample(rng);
            let timestamp = date
                .and_hms_opt(hour, minute, 0)
                .context("invalid time of day")?;

            let (latitude, longitude) = geo
                .sample(rng)
                .context("failed to place patient in the region")?;

            records.push(PatientRecord {
                patient_id: format!("P{patient_counter:05}"),
                disease: disease.to_string(),
                timestamp,
                age: age_dist.sample(rng),
                severity: Severity::ALL[severity_dist.sample(rng)],
                latitude,
                longitude,
            });
            patient_counter += 1;
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegionConfig;
    use crate::seir::DayState;
    use rand_chacha::ChaCha12Rng;

    fn trajectory_from_infected(infected: &[f64]) -> Trajectory {
        infected
            .iter()
            .enumerate()
            .map(|(day, &i)| DayState {
                day,
                susceptible: 0.0,
                exposed: 0.0,
                infected: i,
                recovered: 0.0,
            })
            .collect()
    }

    fn sampler() -> GeoSampler {
        GeoSampler::new(&RegionConfig {
            center_lat: 6.9271,
            center_lon: 79.8612,
            radius_km: 20.0,
            min_lat: 6.85,
            max_lat: 6.98,
            min_lon: 79.82,
            max_lon: 79.90,
        })
        .expect("failed to build sampler")
    }

    fn start_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).expect("invalid date")
    }

    #[test]
    fn expands_positive_deltas_and_clamps_negative_ones() {
        let trajectory = trajectory_from_infected(&[0.0, 3.0, 5.0, 4.0, 9.0]);
        let mut rng = ChaCha12Rng::seed_from_u64(1);

        let records = expand(&trajectory, 0.0, "dengue", start_date(), &sampler(), &mut rng)
            .expect("expansion failed");

        // Deltas: 0, 3, 2, clamped 0, 5.
        assert_eq!(records.len(), 10);

        let day_counts: Vec<usize> = (0..5)
            .map(|d| {
                let date = start_date() + Days::new(d);
                records.iter().filter(|r| r.timestamp.date() == date).count()
            })
            .collect();
        assert_eq!(day_counts, vec![0, 3, 2, 0, 5]);
    }

    #[test]
    fn ids_are_sequential_and_unique() {
        let trajectory = trajectory_from_infected(&[0.0, 10.0, 25.0]);
        let mut rng = ChaCha12Rng::seed_from_u64(2);

        let records = expand(&trajectory, 0.0, "dengue", start_date(), &sampler(), &mut rng)
            .expect("expansion failed");

        assert_eq!(records.len(), 25);
        for (idx, record) in records.iter().enumerate() {
            assert_eq!(record.patient_id, format!("P{:05}", idx + 1));
        }
    }

    #[test]
    fn day_zero_counts_cases_above_initial_infected() {
        let trajectory = trajectory_from_infected(&[7.0, 7.0]);
        let mut rng = ChaCha12Rng::seed_from_u64(3);

        let records = expand(&trajectory, 4.0, "dengue", start_date(), &sampler(), &mut rng)
            .expect("expansion failed");

        assert_eq!(records.len(), 3);
        for record in &records {
            assert_eq!(record.timestamp.date(), start_date());
        }
    }

    #[test]
    fn record_fields_stay_in_range() {
        let trajectory = trajectory_from_infected(&[0.0, 200.0]);
        let mut rng = ChaCha12Rng::seed_from_u64(4);

        let records = expand(&trajectory, 0.0, "dengue", start_date(), &sampler(), &mut rng)
            .expect("expansion failed");

        assert_eq!(records.len(), 200);
        for record in &records {
            assert!((1..=90).contains(&record.age));
            assert!(Severity::ALL.contains(&record.severity));
            assert!((6.85..=6.98).contains(&record.latitude));
            assert!((79.82..=79.90).contains(&record.longitude));
        }
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let trajectory = trajectory_from_infected(&[0.0, 40.0, 90.0]);

        let mut rng_a = ChaCha12Rng::seed_from_u64(5);
        let mut rng_b = ChaCha12Rng::seed_from_u64(5);

        let records_a = expand(&trajectory, 0.0, "dengue", start_date(), &sampler(), &mut rng_a)
            .expect("expansion failed");
        let records_b = expand(&trajectory, 0.0, "dengue", start_date(), &sampler(), &mut rng_b)
            .expect("expansion failed");

        assert_eq!(records_a, records_b);
    }
}
