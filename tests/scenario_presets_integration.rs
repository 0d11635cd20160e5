use std::process::{Command, Output};

#[derive(Debug)]
struct Report {
    pv_area_m2: f64,
    solar_thermal_area_m2: f64,
    heat_pump_kw: f64,
    storage_kwh: f64,
    total_capex: f64,
    npv: f64,
}

#[test]
fn presets_evaluate_via_cli() {
    for preset in ["industrial_park", "solar_rich", "arbitrage"] {
        let report = run_and_parse(&["evaluate", "--preset", preset]);
        // presets carry no sizing, so nothing is bought
        assert_eq!(report.total_capex, 0.0, "{preset}");
        assert_eq!(report.npv, 0.0, "{preset}");
    }
}

#[test]
fn scenario_file_evaluates_its_sizing() {
    let report = run_and_parse(&["evaluate", "--scenario", "scenarios/industrial_park.toml"]);
    assert_eq!(report.pv_area_m2, 4000.0);
    assert_eq!(report.heat_pump_kw, 400.0);
    assert!(report.total_capex > 0.0);
}

#[test]
fn rooftop_scenario_optimizes_to_full_pv() {
    let report = run_and_parse(&["optimize", "--scenario", "scenarios/rooftop_pv.toml"]);
    assert_eq!(report.pv_area_m2, 10_000.0);
    assert_eq!(report.solar_thermal_area_m2, 0.0);
    assert_eq!(report.heat_pump_kw, 0.0);
    assert_eq!(report.storage_kwh, 0.0);
    assert!(report.npv > 0.0);
}

#[test]
fn cash_flow_table_is_written() {
    let path = std::env::temp_dir().join(format!("efinops-cash-flow-{}.csv", std::process::id()));
    let path_str = path.to_string_lossy().into_owned();
    run_and_parse(&[
        "evaluate",
        "--scenario",
        "scenarios/industrial_park.toml",
        "--cash-flow-out",
        &path_str,
    ]);

    let content = std::fs::read_to_string(&path).expect("CSV should exist");
    let _ = std::fs::remove_file(&path);
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("year,depreciation,cash_flow,cumulative,discounted"));
    assert_eq!(lines.count(), 21);
}

#[test]
fn conflicting_sources_fail() {
    let output = run(&["--scenario", "scenarios/industrial_park.toml", "--preset", "arbitrage"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("mutually exclusive"));
}

#[test]
fn unknown_preset_fails() {
    let output = run(&["--preset", "nonexistent"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown preset"));
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_efinops"))
        .args(args)
        .output()
        .expect("efinops process should run")
}

fn run_and_parse(args: &[&str]) -> Report {
    let output = run(args);
    assert!(
        output.status.success(),
        "run failed for {args:?}: stderr={} ",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).expect("stdout should be valid UTF-8");
    Report {
        pv_area_m2: parse_metric(&stdout, "PV area:", "m2"),
        solar_thermal_area_m2: parse_metric(&stdout, "Solar thermal area:", "m2"),
        heat_pump_kw: parse_metric(&stdout, "Heat pump capacity:", "kW"),
        storage_kwh: parse_metric(&stdout, "Storage capacity:", "kWh"),
        total_capex: parse_metric(&stdout, "Total CAPEX:", ""),
        npv: parse_metric(&stdout, "NPV:", ""),
    }
}

fn parse_metric(stdout: &str, label: &str, unit: &str) -> f64 {
    let line = stdout
        .lines()
        .find(|line| line.trim_start().starts_with(label))
        .unwrap_or_else(|| panic!("missing report line `{label}` in output: {stdout}"));

    let raw = line
        .split_once(':')
        .map(|(_, right)| right.trim())
        .unwrap_or_else(|| panic!("invalid report format for line `{line}`"));

    let numeric = raw.strip_suffix(unit).unwrap_or(raw).trim();
    numeric
        .parse::<f64>()
        .unwrap_or_else(|_| panic!("failed parsing `{numeric}` from report line `{line}`"))
}
