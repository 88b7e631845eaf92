//! Fixtures for tests
use crate::commodity::CommodityID;
use crate::input::InputData;
use crate::input::emission::EmissionFactor;
use crate::input::fuel::FuelReference;
use crate::input::params::{DatasetInfo, RunParameters};
use crate::naming::{FuelMap, Nomenclature};
use crate::pipeline::GeneratedCodes;
use crate::price::{PriceSeries, PricingConstants};
use indexmap::IndexMap;
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn fuel_map() -> FuelMap {
    [
        ("ng", "natural gas"),
        ("lng", "liquefied natural gas"),
        ("coal", "coal"),
        ("dsl", "diesel"),
        ("prop", "propane"),
    ]
    .into_iter()
    .map(|(token, name)| (token.to_string(), name.to_string()))
    .collect()
}

#[fixture]
pub fn nomenclature(fuel_map: FuelMap) -> Nomenclature {
    Nomenclature::new(fuel_map)
}

#[fixture]
pub fn pricing_constants() -> PricingConstants {
    PricingConstants::default()
}

#[fixture]
pub fn price_series() -> PriceSeries {
    [
        ("R_ng", 2025, 12.0),
        ("R_ng", 2030, 13.0),
        ("T_ng", 2025, 9.0),
        ("T_ng", 2030, 10.0),
        ("I_ng", 2025, 3.0),
        ("I_ng", 2030, 4.0),
        ("T_prop", 2025, 8.0),
        ("T_prop", 2030, 8.5),
    ]
    .into_iter()
    .map(|(label, period, price)| (CommodityID::new(label), period, price))
    .collect()
}

#[fixture]
pub fn run_parameters(pricing_constants: PricingConstants) -> RunParameters {
    RunParameters {
        periods: vec![2025, 2030],
        version: 2,
        provinces: vec!["AB".into(), "ON".into()],
        national_region: "CAN".into(),
        price_unit: "2024 $/MMBtu".into(),
        cost_unit: "2020 M$/PJ".into(),
        pricing: pricing_constants,
        dataset: DatasetInfo::default(),
    }
}

#[fixture]
pub fn fuel_reference(fuel_map: FuelMap) -> FuelReference {
    let commodities = ["F_ethos", "E_elc", "E_elc_dx", "R_ng", "T_lng", "R_elc", "A_ng"]
        .map(CommodityID::new)
        .to_vec();
    let notes: IndexMap<_, _> = [
        ("R_ng", "natural gas"),
        ("T_lng", "liquefied natural gas"),
        ("A_ng", "natural gas"),
    ]
    .into_iter()
    .map(|(commodity, note)| (CommodityID::new(commodity), note.to_string()))
    .collect();

    FuelReference {
        commodities,
        fuels: fuel_map,
        notes,
    }
}

#[fixture]
pub fn emission_factors() -> Vec<EmissionFactor> {
    let factor = |emission: &str, commodity: &str, value| EmissionFactor {
        emission: emission.into(),
        commodity: commodity.into(),
        value,
        units: "kt/PJ".into(),
        notes: String::new(),
        source: "[F4]".into(),
    };

    vec![
        factor("CO2eq", "F_ng", 5.0),
        factor("CO2", "R_ng", 50.0),
        factor("CO2", "X_unused", 1.0),
    ]
}

#[fixture]
pub fn input_data(
    run_parameters: RunParameters,
    price_series: PriceSeries,
    fuel_reference: FuelReference,
    emission_factors: Vec<EmissionFactor>,
) -> InputData {
    InputData {
        params: run_parameters,
        prices: price_series,
        fuel_reference,
        emission_factors,
    }
}

#[fixture]
pub fn generated_codes(input_data: InputData) -> GeneratedCodes {
    GeneratedCodes::generate(&input_data.fuel_reference.commodities, &input_data.nomenclature())
}
