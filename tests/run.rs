//! Integration tests for the `run` command.
use can_fuel::cli::{RunOpts, handle_run_command};
use can_fuel::settings::Settings;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// Get the path to the example input data.
fn get_input_dir() -> PathBuf {
    PathBuf::from("demos/canada")
}

/// Count the records in an output table
fn count_rows(output_dir: &Path, table_name: &str) -> usize {
    csv::Reader::from_path(output_dir.join(format!("{table_name}.csv")))
        .unwrap()
        .records()
        .count()
}

/// An integration test for the `run` command.
#[test]
fn test_handle_run_command() {
    unsafe { std::env::set_var("CAN_FUEL_LOG_LEVEL", "off") };

    // Save results to non-existent directory to check that directory creation works
    let tempdir = tempdir().unwrap();
    let output_dir = tempdir.path().join("results");
    let opts = RunOpts {
        output_dir: Some(output_dir.clone()),
        overwrite: false,
        save_graph: true,
    };
    handle_run_command(&get_input_dir(), &opts, Some(Settings::default())).unwrap();

    for file_name in [
        "metadata.toml",
        "commodity_graph.dot",
        "can_fuel_info.log",
        "can_fuel_error.log",
    ] {
        assert!(output_dir.join(file_name).is_file(), "{file_name} missing");
    }

    // 31 listed commodities and 15 fuel-sector commodities
    assert_eq!(count_rows(&output_dir, "Commodity"), 46);
    // 28 listed commodities supplied by a technology and 15 imports
    assert_eq!(count_rows(&output_dir, "Technology"), 43);
    // 4 provinces x 3 vintages x 43 technologies
    assert_eq!(count_rows(&output_dir, "Efficiency"), 516);
    // 4 provinces x 6 (vintage, period) pairs x 24 costed technologies
    assert_eq!(count_rows(&output_dir, "CostVariable"), 576);
    assert!(count_rows(&output_dir, "EmissionActivity") > 0);
    assert_eq!(count_rows(&output_dir, "DataSet"), 5);
    assert_eq!(count_rows(&output_dir, "DataSource"), 7);
    assert_eq!(count_rows(&output_dir, "SectorLabel"), 7);

    // Output folder is no longer empty
    assert_eq!(
        handle_run_command(&get_input_dir(), &opts, Some(Settings::default()))
            .unwrap_err()
            .chain()
            .next()
            .unwrap()
            .to_string(),
        format!(
            "Failed to create output directory: {}",
            output_dir.display()
        )
    );
}
