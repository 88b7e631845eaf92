//! Resolution of variable costs for fuel supply technologies.
//!
//! Each technology is priced from one of a fixed set of sources: a fixed price (for biofuels,
//! uranium and synthetic fuels) or a series from the raw EIA price projections, possibly for a
//! different sector or fuel than the technology's own output. [`PriceSource::classify`] picks the
//! source and [`PriceResolver`] turns it into a price for a given period.
use crate::commodity::CommodityID;
use anyhow::{Result, ensure};
use derive_more::Display;
use serde::Deserialize;
use std::collections::HashMap;
use std::error::Error;

macro_rules! define_constant_default {
    ($name:ident, $value: expr) => {
        fn $name() -> f64 {
            $value
        }
    };
}

define_constant_default!(default_deflation_2022, 0.861_446_913);
define_constant_default!(default_deflation_2025, 0.877_689_699);
define_constant_default!(default_currency_adjustment, 1.22);
define_constant_default!(default_mmbtu_convertor, 1.055);
define_constant_default!(default_eth_price, 25.801_332_399);
define_constant_default!(default_rdsl_price, 34.286_607_549);
define_constant_default!(default_spk_price, 53.947_379_869);
define_constant_default!(default_gas_liquids_discount, 0.89);

/// Fixed factors and prices used when converting raw prices.
///
/// Loaded once per run from the `[pricing]` section of the run parameters and never modified.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PricingConstants {
    /// Deflates fixed biomass and uranium prices to the target currency year
    #[serde(default = "default_deflation_2022")]
    pub deflation_2022: f64,
    /// Deflates EIA prices to the target currency year
    #[serde(default = "default_deflation_2025")]
    pub deflation_2025: f64,
    /// Currency conversion factor
    #[serde(default = "default_currency_adjustment")]
    pub currency_adjustment: f64,
    /// Energy unit conversion factor
    #[serde(default = "default_mmbtu_convertor")]
    pub mmbtu_convertor: f64,
    /// Price of ethanol, already in target units
    #[serde(default = "default_eth_price")]
    pub eth_price: f64,
    /// Price of renewable diesel, already in target units
    #[serde(default = "default_rdsl_price")]
    pub rdsl_price: f64,
    /// Price of synthetic kerosene, already in target units
    #[serde(default = "default_spk_price")]
    pub spk_price: f64,
    /// Price of biomass (wood and other bio fuels), in source units
    #[serde(default)]
    pub biomass_price: f64,
    /// Price of natural and enriched uranium, in source units
    #[serde(default)]
    pub uranium_price: f64,
    /// Discount applied to the natural gas/propane price for gas liquids (LNG, CNG and NGL)
    #[serde(default = "default_gas_liquids_discount")]
    pub gas_liquids_discount: f64,
}

impl Default for PricingConstants {
    fn default() -> Self {
        Self {
            deflation_2022: default_deflation_2022(),
            deflation_2025: default_deflation_2025(),
            currency_adjustment: default_currency_adjustment(),
            mmbtu_convertor: default_mmbtu_convertor(),
            eth_price: default_eth_price(),
            rdsl_price: default_rdsl_price(),
            spk_price: default_spk_price(),
            biomass_price: 0.0,
            uranium_price: 0.0,
            gas_liquids_discount: default_gas_liquids_discount(),
        }
    }
}

impl PricingConstants {
    /// Check that all constants are finite numbers
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("deflation_2022", self.deflation_2022),
            ("deflation_2025", self.deflation_2025),
            ("currency_adjustment", self.currency_adjustment),
            ("mmbtu_convertor", self.mmbtu_convertor),
            ("eth_price", self.eth_price),
            ("rdsl_price", self.rdsl_price),
            ("spk_price", self.spk_price),
            ("biomass_price", self.biomass_price),
            ("uranium_price", self.uranium_price),
            ("gas_liquids_discount", self.gas_liquids_discount),
        ] {
            ensure!(value.is_finite(), "Invalid value for {name} ({value})");
        }

        Ok(())
    }

    /// Convert a price in source units and currency to target units, with the given deflator
    fn convert(&self, price: f64, deflation: f64) -> f64 {
        price * self.mmbtu_convertor * self.currency_adjustment * deflation
    }
}

/// Raw prices keyed by label (e.g. `T_ng`) and period.
///
/// Every row is kept, so that missing and duplicated prices can be reported when looked up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries(HashMap<CommodityID, HashMap<u32, Vec<f64>>>);

impl PriceSeries {
    /// Add a price for the given label and period
    pub fn insert(&mut self, label: CommodityID, period: u32, price: f64) {
        self.0
            .entry(label)
            .or_default()
            .entry(period)
            .or_default()
            .push(price);
    }

    /// All prices recorded for the given label and period
    pub fn get(&self, label: &str, period: u32) -> &[f64] {
        self.0
            .get(label)
            .and_then(|by_period| by_period.get(&period))
            .map_or(&[], Vec::as_slice)
    }

    /// The number of distinct labels
    pub fn num_labels(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<(CommodityID, u32, f64)> for PriceSeries {
    fn from_iter<I: IntoIterator<Item = (CommodityID, u32, f64)>>(iter: I) -> Self {
        let mut series = Self::default();
        for (label, period, price) in iter {
            series.insert(label, period, price);
        }

        series
    }
}

/// Technology code fragments with a fixed price, in order of precedence
const FIXED_PRICE_PATTERNS: [(&str, PriceSource); 7] = [
    ("BIO", PriceSource::Biomass),
    ("WOOD", PriceSource::Biomass),
    ("U_NAT", PriceSource::Uranium),
    ("U_ENR", PriceSource::Uranium),
    ("ETH", PriceSource::Ethanol),
    ("RDSL", PriceSource::RenewableDiesel),
    ("SPK", PriceSource::SyntheticKerosene),
];

/// Technology code fragments identifying gas liquids
const GAS_LIQUIDS_PATTERNS: [&str; 3] = ["LNG", "CNG", "NGL"];

/// Output labels priced using another sector's or fuel's series, in order of precedence
const SUBSTITUTE_LABELS: [(&str, &str); 10] = [
    ("E_coal", "I_coal"),
    ("E_gsl", "T_gsl"),
    ("R_oil", "C_oil"),
    ("C_h2", "I_h2"),
    ("R_h2", "I_h2"),
    ("I_pcoke", "I_coal"),
    ("I_coke", "I_coal"),
    ("A_ng", "I_ng"),
    ("A_dsl", "T_dsl"),
    ("A_prop", "T_prop"),
];

/// Where the price of a technology comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource {
    /// The fixed biomass price, converted and deflated to 2022
    Biomass,
    /// The fixed uranium price, converted and deflated to 2022
    Uranium,
    /// The fixed ethanol price
    Ethanol,
    /// The fixed renewable diesel price
    RenewableDiesel,
    /// The fixed synthetic kerosene price
    SyntheticKerosene,
    /// A gas series, converted and deflated, with the gas liquids discount applied
    GasLiquids(&'static str),
    /// A propane series for liquefied petroleum gas, converted and deflated
    PetroleumGas(&'static str),
    /// The series for a different label than the technology's output, converted and deflated
    Substitute(&'static str),
    /// The series for the technology's own output label, converted and deflated
    Direct,
}

impl PriceSource {
    /// Choose the price source for a technology.
    ///
    /// # Arguments
    ///
    /// * `technology` - The technology code (e.g. `F_T_LNG`)
    /// * `output_label` - The technology's output commodity (e.g. `T_lng`)
    pub fn classify(technology: &str, output_label: &str) -> Self {
        if let Some((_, source)) = FIXED_PRICE_PATTERNS
            .iter()
            .find(|(pattern, _)| technology.contains(pattern))
        {
            return *source;
        }

        if GAS_LIQUIDS_PATTERNS
            .iter()
            .any(|pattern| technology.contains(pattern))
        {
            let label = if matches!(technology, "F_T_LNG" | "F_T_CNG") {
                "T_ng"
            } else {
                "I_prop"
            };
            return Self::GasLiquids(label);
        }

        if technology.contains("LPG") {
            let label = if technology == "F_R_LPG" {
                "R_prop"
            } else {
                "T_prop"
            };
            return Self::PetroleumGas(label);
        }

        if let Some((_, label)) = SUBSTITUTE_LABELS
            .iter()
            .find(|(pattern, _)| output_label.contains(pattern))
        {
            return Self::Substitute(label);
        }

        Self::Direct
    }
}

/// An error looking up a raw price
#[derive(Debug, Clone, PartialEq, Display)]
pub enum PriceError {
    /// No price for the label and period
    #[display("No price found for technology {technology} (label: {label}, period: {period})")]
    LookupMissing {
        /// The technology being priced
        technology: String,
        /// The label of the price series
        label: String,
        /// The period being priced
        period: u32,
    },
    /// More than one price for the label and period
    #[display(
        "{count} prices found for technology {technology} (label: {label}, period: {period})"
    )]
    LookupAmbiguous {
        /// The technology being priced
        technology: String,
        /// The label of the price series
        label: String,
        /// The period being priced
        period: u32,
        /// The number of prices found
        count: usize,
    },
}

impl Error for PriceError {}

/// Resolves technology prices from the raw price series and the pricing constants
pub struct PriceResolver<'a> {
    series: &'a PriceSeries,
    constants: &'a PricingConstants,
}

impl<'a> PriceResolver<'a> {
    /// Create a new [`PriceResolver`]
    pub fn new(series: &'a PriceSeries, constants: &'a PricingConstants) -> Self {
        Self { series, constants }
    }

    /// Get the unit price of a technology in the given period.
    ///
    /// # Arguments
    ///
    /// * `technology` - The technology code
    /// * `output_label` - The technology's output commodity
    /// * `period` - The period being priced
    ///
    /// # Returns
    ///
    /// The price or an error if the required raw price is missing or duplicated.
    pub fn resolve(
        &self,
        technology: &str,
        output_label: &str,
        period: u32,
    ) -> Result<f64, PriceError> {
        let output_label = output_label.trim();
        let constants = self.constants;
        let lookup = |label: &str| self.lookup(technology, label, period);

        let price = match PriceSource::classify(technology, output_label) {
            PriceSource::Biomass => {
                constants.convert(constants.biomass_price, constants.deflation_2022)
            }
            PriceSource::Uranium => {
                constants.convert(constants.uranium_price, constants.deflation_2022)
            }
            PriceSource::Ethanol => constants.eth_price,
            PriceSource::RenewableDiesel => constants.rdsl_price,
            PriceSource::SyntheticKerosene => constants.spk_price,
            PriceSource::GasLiquids(label) => {
                constants.convert(lookup(label)?, constants.deflation_2025)
                    * constants.gas_liquids_discount
            }
            PriceSource::PetroleumGas(label) | PriceSource::Substitute(label) => {
                constants.convert(lookup(label)?, constants.deflation_2025)
            }
            PriceSource::Direct => constants.convert(lookup(output_label)?, constants.deflation_2025),
        };

        Ok(price)
    }

    /// Look up the single raw price for a label and period
    fn lookup(&self, technology: &str, label: &str, period: u32) -> Result<f64, PriceError> {
        match self.series.get(label, period) {
            [price] => Ok(*price),
            [] => Err(PriceError::LookupMissing {
                technology: technology.to_string(),
                label: label.to_string(),
                period,
            }),
            prices => Err(PriceError::LookupAmbiguous {
                technology: technology.to_string(),
                label: label.to_string(),
                period,
                count: prices.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{price_series, pricing_constants};
    use float_cmp::assert_approx_eq;
    use map_macro::hash_map;
    use rstest::rstest;

    #[test]
    fn test_price_series_keeps_duplicates() {
        let series: PriceSeries = [("T_ng", 2025, 9.0), ("T_ng", 2025, 9.5), ("T_ng", 2030, 10.0)]
            .into_iter()
            .map(|(label, period, price)| (CommodityID::new(label), period, price))
            .collect();

        assert_eq!(
            series.0,
            hash_map! {
                CommodityID::new("T_ng") => hash_map! {2025 => vec![9.0, 9.5], 2030 => vec![10.0]}
            }
        );
        assert_eq!(series.num_labels(), 1);
        assert!(series.get("R_ng", 2025).is_empty());
    }

    #[rstest]
    #[case("F_R_BIO", "R_bio", PriceSource::Biomass)]
    #[case("F_I_WOOD", "I_wood", PriceSource::Biomass)]
    #[case("F_E_U_NAT", "E_u_nat", PriceSource::Uranium)]
    #[case("F_E_U_ENR", "E_u_enr", PriceSource::Uranium)]
    #[case("F_T_ETH", "T_eth", PriceSource::Ethanol)]
    #[case("F_T_RDSL", "T_rdsl", PriceSource::RenewableDiesel)]
    #[case("F_T_SPK", "T_spk", PriceSource::SyntheticKerosene)]
    #[case("F_T_LNG", "T_lng", PriceSource::GasLiquids("T_ng"))]
    #[case("F_T_CNG", "T_cng", PriceSource::GasLiquids("T_ng"))]
    #[case("F_I_LNG", "I_lng", PriceSource::GasLiquids("I_prop"))]
    #[case("F_I_NGL", "I_ngl", PriceSource::GasLiquids("I_prop"))]
    #[case("F_R_LPG", "R_lpg", PriceSource::PetroleumGas("R_prop"))]
    #[case("F_C_LPG", "C_lpg", PriceSource::PetroleumGas("T_prop"))]
    #[case("F_E_COAL", "E_coal", PriceSource::Substitute("I_coal"))]
    #[case("F_E_GSL", "E_gsl", PriceSource::Substitute("T_gsl"))]
    #[case("F_R_OIL", "R_oil", PriceSource::Substitute("C_oil"))]
    #[case("F_C_H2", "C_h2", PriceSource::Substitute("I_h2"))]
    #[case("F_R_H2", "R_h2", PriceSource::Substitute("I_h2"))]
    #[case("F_I_PCOKE", "I_pcoke", PriceSource::Substitute("I_coal"))]
    #[case("F_I_COKE", "I_coke", PriceSource::Substitute("I_coal"))]
    #[case("F_A_NG", "A_ng", PriceSource::Substitute("I_ng"))]
    #[case("F_A_DSL", "A_dsl", PriceSource::Substitute("T_dsl"))]
    #[case("F_A_PROP", "A_prop", PriceSource::Substitute("T_prop"))]
    #[case("F_R_NG", "R_ng", PriceSource::Direct)]
    #[case("F_I_COAL", "I_coal", PriceSource::Direct)]
    fn test_classify(
        #[case] technology: &str,
        #[case] output_label: &str,
        #[case] expected: PriceSource,
    ) {
        assert_eq!(PriceSource::classify(technology, output_label), expected);
    }

    /// Earlier rules take precedence over later ones
    #[rstest]
    #[case("F_T_BIO_LNG", "T_bio_lng", PriceSource::Biomass)]
    #[case("F_T_ETH_LPG", "T_eth_lpg", PriceSource::Ethanol)]
    #[case("F_T_LNG_LPG", "T_lng_lpg", PriceSource::GasLiquids("I_prop"))]
    #[case("F_A_LPG", "A_lpg", PriceSource::PetroleumGas("T_prop"))] // not the A_* substitutes
    #[case("F_A_NG", "E_coal", PriceSource::Substitute("I_coal"))]
    fn test_classify_precedence(
        #[case] technology: &str,
        #[case] output_label: &str,
        #[case] expected: PriceSource,
    ) {
        assert_eq!(PriceSource::classify(technology, output_label), expected);
    }

    #[rstest]
    fn test_resolve_gas_liquids(price_series: PriceSeries, pricing_constants: PricingConstants) {
        let resolver = PriceResolver::new(&price_series, &pricing_constants);
        let price = resolver.resolve("F_T_LNG", "T_lng", 2030).unwrap();
        let expected = 10.0 * 1.055 * 1.22 * 0.877_689_699 * 0.89;
        assert_approx_eq!(f64, price, expected);
    }

    #[rstest]
    fn test_resolve_direct(price_series: PriceSeries, pricing_constants: PricingConstants) {
        let resolver = PriceResolver::new(&price_series, &pricing_constants);
        let price = resolver.resolve("F_R_NG", " R_ng ", 2025).unwrap();
        let expected = 12.0 * 1.055 * 1.22 * 0.877_689_699;
        assert_approx_eq!(f64, price, expected);
    }

    #[rstest]
    fn test_resolve_substitute(price_series: PriceSeries, pricing_constants: PricingConstants) {
        let resolver = PriceResolver::new(&price_series, &pricing_constants);
        let price = resolver.resolve("F_A_NG", "A_ng", 2030).unwrap();
        let expected = 4.0 * 1.055 * 1.22 * 0.877_689_699;
        assert_approx_eq!(f64, price, expected);
    }

    #[rstest]
    fn test_resolve_fixed_prices_ignore_series(pricing_constants: PricingConstants) {
        let constants = PricingConstants {
            biomass_price: 5.0,
            uranium_price: 0.5,
            ..pricing_constants
        };
        let series = PriceSeries::default(); // NB: empty
        let resolver = PriceResolver::new(&series, &constants);

        assert_approx_eq!(
            f64,
            resolver.resolve("F_R_BIO", "R_bio", 2099).unwrap(),
            5.0 * 1.055 * 1.22 * 0.861_446_913
        );
        assert_approx_eq!(
            f64,
            resolver.resolve("F_E_U_NAT", "E_u_nat", 2099).unwrap(),
            0.5 * 1.055 * 1.22 * 0.861_446_913
        );
        assert_approx_eq!(
            f64,
            resolver.resolve("F_T_ETH", "T_eth", 2099).unwrap(),
            25.801_332_399
        );
        assert_approx_eq!(
            f64,
            resolver.resolve("F_T_RDSL", "T_rdsl", 2099).unwrap(),
            34.286_607_549
        );
        assert_approx_eq!(
            f64,
            resolver.resolve("F_T_SPK", "T_spk", 2099).unwrap(),
            53.947_379_869
        );
    }

    #[rstest]
    fn test_resolve_idempotent(price_series: PriceSeries, pricing_constants: PricingConstants) {
        let resolver = PriceResolver::new(&price_series, &pricing_constants);
        let first = resolver.resolve("F_C_LPG", "C_lpg", 2025).unwrap();
        let second = resolver.resolve("F_C_LPG", "C_lpg", 2025).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[rstest]
    fn test_resolve_missing(price_series: PriceSeries, pricing_constants: PricingConstants) {
        let resolver = PriceResolver::new(&price_series, &pricing_constants);
        let err = resolver.resolve("F_T_LNG", "T_lng", 2040).unwrap_err();
        assert_eq!(
            err,
            PriceError::LookupMissing {
                technology: "F_T_LNG".into(),
                label: "T_ng".into(),
                period: 2040
            }
        );
        assert_eq!(
            err.to_string(),
            "No price found for technology F_T_LNG (label: T_ng, period: 2040)"
        );
    }

    #[rstest]
    fn test_resolve_ambiguous(mut price_series: PriceSeries, pricing_constants: PricingConstants) {
        price_series.insert("R_ng".into(), 2025, 13.0);
        let resolver = PriceResolver::new(&price_series, &pricing_constants);
        let err = resolver.resolve("F_R_NG", "R_ng", 2025).unwrap_err();
        assert_eq!(
            err.to_string(),
            "2 prices found for technology F_R_NG (label: R_ng, period: 2025)"
        );
    }

    #[test]
    fn test_pricing_constants_validate() {
        assert!(PricingConstants::default().validate().is_ok());

        let constants = PricingConstants {
            eth_price: f64::NAN,
            ..PricingConstants::default()
        };
        assert_eq!(
            constants.validate().unwrap_err().to_string(),
            "Invalid value for eth_price (NaN)"
        );
    }

    #[test]
    fn test_pricing_constants_deserialise_defaults() {
        let constants: PricingConstants = toml::from_str("biomass_price = 3.5").unwrap();
        assert_eq!(
            constants,
            PricingConstants {
                biomass_price: 3.5,
                ..PricingConstants::default()
            }
        );
    }
}
