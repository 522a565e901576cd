use crate::config::ModelConfig;
use crate::ode;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Sub-day RK4 steps per sampled day.
const STEPS_PER_DAY: usize = 24;

/// Compartment sizes at an integer day of the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayState {
    pub day: usize,
    pub susceptible: f64,
    pub exposed: f64,
    pub infected: f64,
    pub recovered: f64,
}

/// Compartment trajectory, one entry per day in `[0, duration_days]`.
pub type Trajectory = Vec<DayState>;

/// Integrate the SEIR model over the configured horizon.
///
/// Samples the compartments at unit-day intervals, taking [`STEPS_PER_DAY`]
/// RK4 sub-steps between samples. The sum of the compartments is checked
/// against the population at every sample and compartments that dip slightly
/// below zero are clamped back to zero.
///
/// # Errors
/// Returns an error if the parameters are invalid, if a compartment goes
/// negative beyond the numerical tolerance, or if the integration drifts
/// away from conservation of the population.
pub fn simulate(par: &ModelConfig) -> Result<Trajectory> {
    par.validate().context("invalid parameters")?;

    let n = par.population;
    let (beta, sigma, gamma) = (par.beta, par.sigma, par.gamma);

    let deriv = move |_t: f64, y: &[f64; 4]| -> [f64; 4] {
        let [s, e, i, _r] = *y;
        let infection = beta * s * i / n;
        let onset = sigma * e;
        let recovery = gamma * i;
        [-infection, infection - onset, onset - recovery, recovery]
    };

    let mut y = [
        par.initial_susceptible(),
        par.initial_exposed,
        par.initial_infected,
        par.initial_recovered,
    ];

    let mut trajectory = Vec::with_capacity(par.duration_days + 1);
    trajectory.push(day_state(0, &y));

    let dt = 1.0 / STEPS_PER_DAY as f64;
    for day in 1..=par.duration_days {
        for step in 0..STEPS_PER_DAY {
            let t = (day - 1) as f64 + step as f64 * dt;
            y = ode::rk4_step(&deriv, t, &y, dt);
        }

        enforce_invariants(&mut y, n)
            .with_context(|| format!("integration failed at day {day}"))?;

        trajectory.push(day_state(day, &y));
    }

    Ok(trajectory)
}

fn day_state(day: usize, y: &[f64; 4]) -> DayState {
    DayState {
        day,
        susceptible: y[0],
        exposed: y[1],
        infected: y[2],
        recovered: y[3],
    }
}

/// Clamp tiny negative compartments and check conservation of the population.
fn enforce_invariants(y: &mut [f64; 4], n: f64) -> Result<()> {
    let neg_tol = 1e-6 * n;
    for val in y.iter_mut() {
        if *val < 0.0 {
            if *val < -neg_tol {
                bail!("compartment went negative ({val})");
            }
            *val = 0.0;
        }
    }

    let sum: f64 = y.iter().sum();
    let cons_tol = 1e-3 * n;
    if (sum - n).abs() > cons_tol {
        bail!("compartments sum to {sum}, expected {n}");
    }

    Ok(())
}
