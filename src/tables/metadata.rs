//! Tables describing the datasets, data sources and sectors.
use crate::input::params::RunParameters;
use crate::region::DataID;
use crate::sector::TechnologySector;
use serde::Serialize;
use strum::IntoEnumIterator;

/// References for the data, as (ID, label, note)
const DATA_SOURCES: [(&str, &str, &str); 7] = [
    (
        "[F1]",
        "EIA AEO 2025",
        "Using table 3 via the API to get access to the costs of the different fuels for \
         different sectors",
    ),
    (
        "[F2]",
        "NREL ATB electricity sector 2022",
        "Taking the fuel costs from the appropriate places in the excel workbook",
    ),
    (
        "[F3]",
        "Biofuels in Canada 2023",
        "Michael Wolinetz & Sam Harrison. (2023). Biofuels in Canada 2023: Tracking biofuel \
         consumption, feedstocks and avoided greenhouse gas emissions. Navius Research.",
    ),
    (
        "[F4]",
        "Government of Canada, Emission factors and reference values",
        "The appropriate emission factors for sector and fuel are converted to tonnes or \
         ktonnes per PJ",
    ),
    (
        "[F5]",
        "IPCC AR6",
        "Used for the GWP100 values for methane, carbon dioxide and nitrous oxide for \
         calculating CO2eq",
    ),
    (
        "[F6]",
        "NS Dept. of Environment & Climate Change",
        "QRV standards (wood/ethanol/biodiesel factors)",
    ),
    (
        "[F7]",
        "Argonne National Laboratory, GREET model",
        "Upstream fuel emissions factors",
    ),
];

/// A row of the dataset table
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DataSetRow {
    data_id: DataID,
    label: String,
    version: String,
    description: String,
    status: String,
    author: String,
    date: String,
    original: String,
    changelog: String,
    notes: String,
}

/// A row of the data source table
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DataSourceRow {
    source_id: &'static str,
    label: &'static str,
    note: &'static str,
    data_id: DataID,
}

/// A row of the sector label table
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SectorLabelRow {
    sector: &'static str,
    description: &'static str,
}

/// Build the dataset table: one row for each province and one for the national region
pub fn build_dataset_rows(params: &RunParameters) -> Vec<DataSetRow> {
    let info = &params.dataset;
    params
        .regions()
        .map(|region| DataSetRow {
            data_id: params.data_id(region),
            label: format!("{region} - fuel"),
            version: format!("v{}", params.version),
            description: info.description.clone(),
            status: info.status.clone(),
            author: info.author.clone(),
            date: info.date.clone(),
            original: String::new(),
            changelog: info.changelog.clone(),
            notes: String::new(),
        })
        .collect()
}

/// Build the data source table, tagged with the given dataset
pub fn build_data_source_rows(data_id: &DataID) -> Vec<DataSourceRow> {
    DATA_SOURCES
        .iter()
        .map(|&(source_id, label, note)| DataSourceRow {
            source_id,
            label,
            note,
            data_id: data_id.clone(),
        })
        .collect()
}

/// Build the sector label table
pub fn build_sector_label_rows() -> Vec<SectorLabelRow> {
    TechnologySector::iter()
        .map(|sector| SectorLabelRow {
            sector: sector.label(),
            description: sector.description(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::run_parameters;
    use itertools::Itertools;
    use rstest::rstest;

    #[rstest]
    fn test_build_dataset_rows(run_parameters: RunParameters) {
        let rows = build_dataset_rows(&run_parameters);
        assert_eq!(
            rows.iter()
                .map(|row| (row.data_id.as_str(), row.label.as_str()))
                .collect_vec(),
            [
                ("ABDIST2", "AB - fuel"),
                ("ONDIST2", "ON - fuel"),
                ("GENDIST2", "CAN - fuel")
            ]
        );
        assert!(rows.iter().all(|row| row.version == "v2"));
        assert_eq!(rows[0].description, "2025 annual update");
        assert_eq!(rows[0].status, "active");
        assert_eq!(rows[0].changelog, "Original sector design");
    }

    #[test]
    fn test_build_data_source_rows() {
        let rows = build_data_source_rows(&"GENDIST2".into());
        assert_eq!(
            rows.iter().map(|row| row.source_id).collect_vec(),
            ["[F1]", "[F2]", "[F3]", "[F4]", "[F5]", "[F6]", "[F7]"]
        );
        assert!(rows.iter().all(|row| row.data_id.as_str() == "GENDIST2"));
    }

    #[test]
    fn test_build_sector_label_rows() {
        let rows = build_sector_label_rows();
        assert_eq!(rows.len(), 7);
        assert_eq!(
            rows[0],
            SectorLabelRow {
                sector: "electricity",
                description: "Electric power sector"
            }
        );
        assert_eq!(
            rows[6],
            SectorLabelRow {
                sector: "fuel",
                description: "Fuel production sector"
            }
        );
    }
}
