use std::{fs, path::PathBuf, process::Command};

#[test]
fn basic_workflow() {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("basic_workflow");

    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir(&test_dir).expect("failed to create test directory");

    let config_path = test_dir.join("config.toml");
    let config_contents = String::new()
        + "[model]\n"
        + "beta = 0.3\n"
        + "sigma = 0.2\n"
        + "gamma = 0.1\n"
        + "population = 10000.0\n"
        + "initial_exposed = 100.0\n"
        + "initial_infected = 0.0\n"
        + "initial_recovered = 0.0\n"
        + "duration_days = 50\n"
        + "\n"
        + "[outbreak]\n"
        + "disease_name = \"dengue\"\n"
        + "start_date = \"2026-06-01\"\n"
        + "\n"
        + "[region]\n"
        + "center_lat = 6.9271\n"
        + "center_lon = 79.8612\n"
        + "radius_km = 20.0\n"
        + "min_lat = 6.85\n"
        + "max_lat = 6.98\n"
        + "min_lon = 79.82\n"
        + "max_lon = 79.90\n"
        + "\n"
        + "[weather]\n"
        + "start_date = \"2026-06-01\"\n"
        + "duration_days = 10\n";

    fs::write(&config_path, config_contents).expect("failed to write config file");

    fn run_bin(args: &[&str]) {
        let bin = PathBuf::from(env!("CARGO_BIN_EXE_episcen"));

        let output = Command::new(bin)
            .args(args)
            .output()
            .expect("failed to execute command");

        let stdout_str =
            std::str::from_utf8(&output.stdout).expect("failed to convert stdout to string");
        let stderr_str =
            std::str::from_utf8(&output.stderr).expect("failed to convert stderr to string");

        assert!(
            output.status.success(),
            "failed to run binary with {args:?}\nstdout:\n{stdout_str}\nstderr:\n{stderr_str}\n"
        );
    }

    fn count_lines(path: &PathBuf) -> usize {
        fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("failed to read {path:?}"))
            .lines()
            .count()
    }

    let test_dir_str = test_dir
        .to_str()
        .expect("failed to convert test directory to string");

    run_bin(&["--sim-dir", test_dir_str, "--seed", "42", "outbreak"]);
    run_bin(&["--sim-dir", test_dir_str, "--seed", "42", "weather"]);

    // Header plus one row per day in [0, 50].
    let trajectory_csv = test_dir.join("outbreak").join("trajectory.csv");
    assert_eq!(count_lines(&trajectory_csv), 52);

    // With these parameters the epidemic grows, so cases must be expanded.
    let patients_csv = test_dir.join("outbreak").join("patients.csv");
    assert!(count_lines(&patients_csv) > 1);

    // Header plus one row per hour of the 10 simulated days.
    let weather_csv = test_dir.join("weather").join("weather.csv");
    assert_eq!(count_lines(&weather_csv), 241);

    assert!(test_dir.join("outbreak").join("summary.json").is_file());
    assert!(test_dir.join("weather").join("summary.json").is_file());

    // Re-running with the same seed reproduces the exact tables.
    let patients_before =
        fs::read_to_string(&patients_csv).expect("failed to read patient table");
    run_bin(&["--sim-dir", test_dir_str, "--seed", "42", "outbreak"]);
    let patients_after =
        fs::read_to_string(&patients_csv).expect("failed to read patient table");
    assert_eq!(patients_before, patients_after);

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn rejects_invalid_config() {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("invalid_config");

    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir(&test_dir).expect("failed to create test directory");

    // Initial compartments exceed the population.
    let config_contents = String::new()
        + "[model]\n"
        + "beta = 0.3\n"
        + "sigma = 0.2\n"
        + "gamma = 0.1\n"
        + "population = 100.0\n"
        + "initial_exposed = 90.0\n"
        + "initial_infected = 50.0\n"
        + "initial_recovered = 0.0\n"
        + "duration_days = 50\n"
        + "\n"
        + "[outbreak]\n"
        + "disease_name = \"dengue\"\n"
        + "start_date = \"2026-06-01\"\n"
        + "\n"
        + "[region]\n"
        + "center_lat = 6.9271\n"
        + "center_lon = 79.8612\n"
        + "radius_km = 20.0\n"
        + "min_lat = 6.85\n"
        + "max_lat = 6.98\n"
        + "min_lon = 79.82\n"
        + "max_lon = 79.90\n"
        + "\n"
        + "[weather]\n"
        + "start_date = \"2026-06-01\"\n"
        + "duration_days = 10\n";

    fs::write(test_dir.join("config.toml"), config_contents)
        .expect("failed to write config file");

    let bin = PathBuf::from(env!("CARGO_BIN_EXE_episcen"));
    let test_dir_str = test_dir
        .to_str()
        .expect("failed to convert test directory to string");

    let output = Command::new(bin)
        .args(["--sim-dir", test_dir_str, "outbreak"])
        .output()
        .expect("failed to execute command");

    assert!(!output.status.success());

    fs::remove_dir_all(&test_dir).ok();
}
