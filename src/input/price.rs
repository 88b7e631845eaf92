//! Code for reading and normalising raw EIA price projections.
use super::{input_err_msg, read_csv};
use crate::commodity::CommodityID;
use crate::price::PriceSeries;
use anyhow::{Context, Result, ensure};
use log::{debug, warn};
use serde::Deserialize;
use std::path::Path;
use unicase::UniCase;

const PRICES_FILE_NAME: &str = "eia_prices.csv";

/// Separator between the parts of an EIA series name
const SERIES_NAME_SEPARATOR: &str = " : ";

/// EIA sector names and the corresponding sector letters
const SECTOR_NAMES: [(&str, &str); 5] = [
    ("Commercial", "C"),
    ("Industrial", "I"),
    ("Electric Power", "E"),
    ("Residential", "R"),
    ("Transportation", "T"),
];

/// EIA fuel names and the corresponding fuel tokens
const FUEL_NAMES: [(&str, &str); 10] = [
    ("Natural Gas", "ng"),
    ("Distillate Fuel Oil", "dsl"),
    ("Diesel Fuel", "dsl"),
    ("Residual Fuel Oil", "hfo"),
    ("Propane", "prop"),
    ("Jet Fuel", "jtf"),
    ("Residual Fuel", "oil"),
    ("Hydrogen", "h2"),
    ("Metallurgical Coal", "coal"),
    ("Motor Gasoline", "gsl"),
];

/// Sectors in which heavy fuel oil is labelled as oil
const OIL_SECTORS: [&str; 3] = ["C", "R", "E"];

/// A row of the raw EIA price file
#[derive(Debug, Deserialize, PartialEq)]
struct RawPriceRow {
    period: u32,
    #[serde(rename = "seriesName")]
    series_name: String,
    unit: String,
    #[serde(deserialize_with = "csv::invalid_option")]
    value: Option<f64>,
}

/// A normalised price: the label of the series (e.g. `R_ng`), the period and the price
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    /// Label in the form `<sector letter>_<fuel token>`
    pub label: CommodityID,
    /// The year
    pub period: u32,
    /// Price in source units
    pub value: f64,
}

/// Look up a name in a table, ignoring case
fn lookup_name(table: &[(&str, &'static str)], name: &str) -> Option<&'static str> {
    let name = UniCase::new(name.trim());
    table
        .iter()
        .find(|(key, _)| UniCase::new(*key) == name)
        .map(|(_, code)| *code)
}

/// Get the price label for an EIA series name (e.g. `Price : Residential : Natural Gas` → `R_ng`).
///
/// Returns `None` if the sector or fuel is not recognised.
pub fn series_label(series_name: &str) -> Option<String> {
    let mut parts = series_name.split(SERIES_NAME_SEPARATOR).skip(1);
    let sector = lookup_name(&SECTOR_NAMES, parts.next()?)?;
    let mut fuel = lookup_name(&FUEL_NAMES, parts.next()?)?;
    if fuel == "hfo" && OIL_SECTORS.contains(&sector) {
        fuel = "oil";
    }

    Some(format!("{sector}_{fuel}"))
}

/// Filter and label raw price rows.
///
/// Only rows in the given unit and periods are kept and series averages are dropped, as are rows
/// with a missing value or an unrecognised series name. The result is ordered by period, with rows
/// for the same period kept in file order.
fn normalise_price_rows<I>(rows: I, periods: &[u32], unit: &str) -> Vec<PricePoint>
where
    I: IntoIterator<Item = RawPriceRow>,
{
    let mut points = Vec::new();
    for row in rows {
        if row.unit != unit
            || !periods.contains(&row.period)
            || row.series_name.to_lowercase().contains("average")
        {
            continue;
        }

        let Some(value) = row.value else {
            debug!("Ignoring '{}' ({}): no value", row.series_name, row.period);
            continue;
        };

        let Some(label) = series_label(&row.series_name) else {
            debug!("Ignoring '{}': unrecognised series", row.series_name);
            continue;
        };

        points.push(PricePoint {
            label: label.into(),
            period: row.period,
            value,
        });
    }

    // Sort is stable, so file order is kept within each period
    points.sort_by_key(|point| point.period);

    points
}

/// Read the raw price series from the specified input directory.
///
/// # Arguments
///
/// * `input_dir` - Folder containing input files
/// * `periods` - Periods for which prices are needed
/// * `unit` - The unit of prices to use
pub fn read_price_series(input_dir: &Path, periods: &[u32], unit: &str) -> Result<PriceSeries> {
    let file_path = input_dir.join(PRICES_FILE_NAME);
    let rows = read_csv::<RawPriceRow>(&file_path)?;
    let points = normalise_price_rows(rows, periods, unit);
    if points.is_empty() {
        warn!(
            "No usable prices in {} (unit: {unit}, periods: {periods:?})",
            file_path.display()
        );
    }

    read_price_series_from_iter(points).with_context(|| input_err_msg(&file_path))
}

fn read_price_series_from_iter<I>(points: I) -> Result<PriceSeries>
where
    I: IntoIterator<Item = PricePoint>,
{
    let mut series = PriceSeries::default();
    for point in points {
        ensure!(
            point.value.is_finite(),
            "Invalid price for {} in {}: {}",
            point.label,
            point.period,
            point.value
        );
        series.insert(point.label, point.period, point.value);
    }

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use rstest::rstest;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn raw_row(period: u32, series_name: &str, unit: &str, value: Option<f64>) -> RawPriceRow {
        RawPriceRow {
            period,
            series_name: series_name.into(),
            unit: unit.into(),
            value,
        }
    }

    #[rstest]
    #[case("Price : Residential : Natural Gas", Some("R_ng"))]
    #[case("Price : Transportation : Diesel Fuel", Some("T_dsl"))]
    #[case("Price : Industrial : Residual Fuel Oil", Some("I_hfo"))]
    #[case("Price : Commercial : Residual Fuel Oil", Some("C_oil"))]
    #[case("Price : Electric Power : Residual Fuel Oil", Some("E_oil"))]
    #[case("Price : electric power : metallurgical coal", Some("E_coal"))]
    #[case("Price : Residential : Wood", None)]
    #[case("Price : Space : Natural Gas", None)]
    #[case("Price : Residential", None)]
    #[case("Natural Gas", None)]
    fn test_series_label(#[case] series_name: &str, #[case] expected: Option<&str>) {
        assert_eq!(series_label(series_name).as_deref(), expected);
    }

    #[test]
    fn test_normalise_price_rows() {
        let unit = "2024 $/MMBtu";
        let rows = [
            raw_row(2030, "Price : Residential : Natural Gas", unit, Some(2.0)),
            raw_row(2025, "Price : Residential : Natural Gas", unit, Some(1.0)),
            raw_row(2025, "Price : Residential : Propane", "nominal $/MMBtu", Some(9.0)),
            raw_row(2025, "Price : Residential : Average Price", unit, Some(9.0)),
            raw_row(2040, "Price : Residential : Propane", unit, Some(9.0)),
            raw_row(2025, "Price : Residential : Propane", unit, None),
            raw_row(2025, "Price : Residential : Wood", unit, Some(9.0)),
            raw_row(2025, "Price : Commercial : Propane", unit, Some(3.0)),
        ];

        let points = normalise_price_rows(rows, &[2025, 2030], unit);
        assert_eq!(
            points,
            [
                PricePoint {
                    label: "R_ng".into(),
                    period: 2025,
                    value: 1.0
                },
                PricePoint {
                    label: "C_prop".into(),
                    period: 2025,
                    value: 3.0
                },
                PricePoint {
                    label: "R_ng".into(),
                    period: 2030,
                    value: 2.0
                },
            ]
        );
    }

    #[test]
    fn test_read_price_series() {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(PRICES_FILE_NAME)).unwrap();
            writeln!(
                file,
                "period,seriesName,unit,value
2025,Price : Transportation : Natural Gas,2024 $/MMBtu,10.5
2025,Price : Transportation : Natural Gas,2024 $/MMBtu,
2030,Price : Transportation : Natural Gas,2024 $/MMBtu,11.5"
            )
            .unwrap();
        }

        let series = read_price_series(dir.path(), &[2025, 2030], "2024 $/MMBtu").unwrap();
        assert_eq!(series.get("T_ng", 2025), [10.5]);
        assert_eq!(series.get("T_ng", 2030), [11.5]);
        assert!(series.get("T_ng", 2035).is_empty());
    }

    #[test]
    fn test_read_price_series_from_iter_invalid() {
        let points = [PricePoint {
            label: "T_ng".into(),
            period: 2025,
            value: f64::INFINITY,
        }];
        assert_error!(
            read_price_series_from_iter(points),
            "Invalid price for T_ng in 2025: inf"
        );
    }
}
