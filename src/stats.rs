use serde::{Deserialize, Serialize};

/// Online accumulator of mean, standard deviation and range.
pub struct Accumulator {
    n_vals: usize,
    mean: f64,
    diff_2_sum: f64,
    min: f64,
    max: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccumulatorReport {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self {
            n_vals: 0,
            mean: 0.0,
            diff_2_sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub fn add(&mut self, val: f64) {
        self.n_vals += 1;

        let diff_a = val - self.mean;
        self.mean += diff_a / self.n_vals as f64;

        let diff_b = val - self.mean;
        self.diff_2_sum += diff_a * diff_b;

        self.min = self.min.min(val);
        self.max = self.max.max(val);
    }

    pub fn report(&self) -> AccumulatorReport {
        AccumulatorReport {
            count: self.n_vals,
            mean: self.mean,
            std_dev: if self.n_vals > 1 {
                (self.diff_2_sum / (self.n_vals as f64 - 1.0)).sqrt()
            } else {
                f64::NAN
            },
            min: self.min,
            max: self.max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_direct_computation() {
        let vals = [4.0, 7.0, 13.0, 16.0];

        let mut acc = Accumulator::new();
        for val in vals {
            acc.add(val);
        }

        let report = acc.report();
        assert_eq!(report.count, 4);
        assert!((report.mean - 10.0).abs() < 1e-12);
        assert!((report.std_dev - 30.0f64.sqrt()).abs() < 1e-12);
        assert_eq!(report.min, 4.0);
        assert_eq!(report.max, 16.0);
    }

    #[test]
    fn single_value_has_no_std_dev() {
        let mut acc = Accumulator::new();
        acc.add(5.0);

        let report = acc.report();
        assert_eq!(report.mean, 5.0);
        assert!(report.std_dev.is_nan());
    }
}
