use crate::patients::{PatientRecord, Severity};
use crate::seir::Trajectory;
use crate::stats::Accumulator;
use crate::weather::{Season, WeatherRecord};
use anyhow::{Context, Result};
use std::{fs::File, io::BufWriter, path::Path};

const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M";

fn csv_writer<P: AsRef<Path>>(file: P) -> Result<csv::Writer<BufWriter<File>>> {
    let file = file.as_ref();
    let file = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
    Ok(csv::Writer::from_writer(BufWriter::new(file)))
}

/// Write the compartment trajectory as a CSV table.
pub fn write_trajectory<P: AsRef<Path>>(file: P, trajectory: &Trajectory) -> Result<()> {
    let mut writer = csv_writer(file)?;

    writer.write_record(["day", "susceptible", "exposed", "infected", "recovered"])?;
    for state in trajectory {
        writer.write_record([
            state.day.to_string(),
            format!("{:.4}", state.susceptible),
            format!("{:.4}", state.exposed),
            format!("{:.4}", state.infected),
            format!("{:.4}", state.recovered),
        ])?;
    }

    writer.flush().context("failed to flush trajectory table")?;
    Ok(())
}

/// Write the patient line-list as a CSV table.
pub fn write_patients<P: AsRef<Path>>(file: P, records: &[PatientRecord]) -> Result<()> {
    let mut writer = csv_writer(file)?;

    writer.write_record([
        "patient_id",
        "disease",
        "timestamp",
        "age",
        "severity",
        "latitude",
        "longitude",
    ])?;
    for record in records {
        writer.write_record([
            record.patient_id.clone(),
            record.disease.clone(),
            record.timestamp.format(TIMESTAMP_FMT).to_string(),
            record.age.to_string(),
            record.severity.label().to_string(),
            format!("{:.4}", record.latitude),
            format!("{:.4}", record.longitude),
        ])?;
    }

    writer.flush().context("failed to flush patient table")?;
    Ok(())
}

/// Write the hourly weather records as a CSV table.
pub fn write_weather<P: AsRef<Path>>(file: P, records: &[WeatherRecord]) -> Result<()> {
    let mut writer = csv_writer(file)?;

    writer.write_record([
        "timestamp",
        "season",
        "latitude",
        "longitude",
        "temperature",
        "humidity",
        "rainfall",
        "wind_speed",
    ])?;
    for record in records {
        writer.write_record([
            record.timestamp.format(TIMESTAMP_FMT).to_string(),
            record.season.label().to_string(),
            format!("{:.4}", record.latitude),
            format!("{:.4}", record.longitude),
            format!("{:.1}", record.temperature),
            format!("{:.1}", record.humidity),
            format!("{:.1}", record.rainfall),
            format!("{:.1}", record.wind_speed),
        ])?;
    }

    writer.flush().context("failed to flush weather table")?;
    Ok(())
}

/// Write the outbreak summary report.
///
/// Covers the case totals, age statistics, severity breakdown and the peak
/// of the infected compartment.
pub fn write_outbreak_summary<P: AsRef<Path>>(
    file: P,
    trajectory: &Trajectory,
    records: &[PatientRecord],
) -> Result<()> {
    let mut age_acc = Accumulator::new();
    for record in records {
        age_acc.add(record.age as f64);
    }

    let mut severity_counts = serde_json::Map::new();
    for &severity in &Severity::ALL {
        let count = records.iter().filter(|r| r.severity == severity).count();
        severity_counts.insert(severity.label().to_string(), count.into());
    }

    let peak = trajectory
        .iter()
        .max_by(|a, b| a.infected.total_cmp(&b.infected));

    let summary = serde_json::json!({
        "total_cases": records.len(),
        "age": age_acc.report(),
        "severity_counts": severity_counts,
        "peak_infected": peak.map(|p| p.infected),
        "peak_day": peak.map(|p| p.day),
    });

    write_json(file, &summary)
}

/// Write the weather summary report, aggregated by season.
pub fn write_weather_summary<P: AsRef<Path>>(file: P, records: &[WeatherRecord]) -> Result<()> {
    let seasons = [
        Season::Southwest,
        Season::Northeast,
        Season::InterMonsoon,
        Season::Normal,
    ];

    let mut by_season = serde_json::Map::new();
    for season in seasons {
        let season_records: Vec<_> = records.iter().filter(|r| r.season == season).collect();
        if season_records.is_empty() {
            continue;
        }

        let mut temp_acc = Accumulator::new();
        let mut humidity_acc = Accumulator::new();
        let mut wind_acc = Accumulator::new();
        let mut total_rainfall = 0.0;
        for record in &season_records {
            temp_acc.add(record.temperature);
            humidity_acc.add(record.humidity);
            wind_acc.add(record.wind_speed);
            total_rainfall += record.rainfall;
        }

        by_season.insert(
            season.label().to_string(),
            serde_json::json!({
                "records": season_records.len(),
                "temperature": temp_acc.report(),
                "humidity": humidity_acc.report(),
                "wind_speed": wind_acc.report(),
                "total_rainfall": total_rainfall,
            }),
        );
    }

    let summary = serde_json::json!({
        "total_records": records.len(),
        "seasons": by_season,
    });

    write_json(file, &summary)
}

fn write_json<P: AsRef<Path>>(file: P, value: &serde_json::Value) -> Result<()> {
    let file = file.as_ref();
    let file = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, value).context("failed to serialize summary")?;
    Ok(())
}
