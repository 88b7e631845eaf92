//! Lookup tables used to turn sector letters and fuel tokens into human-readable names.
use crate::sector::SectorMap;
use indexmap::IndexMap;

/// Fuel names keyed by fuel token (e.g. `ng` → `natural gas`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FuelMap(IndexMap<String, String>);

impl FromIterator<(String, String)> for FuelMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FuelMap {
    /// Get the name of a fuel from its token (case-sensitive)
    pub fn get(&self, token: &str) -> Option<&str> {
        self.0.get(token).map(String::as_str)
    }

    /// Whether the fuel token is known
    pub fn contains(&self, token: &str) -> bool {
        self.0.contains_key(token)
    }

    /// The number of known fuels
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no fuels are known
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Insert a fuel, replacing the name if the token is already present.
    ///
    /// Returns the replaced name, if any. A replaced token keeps its original position.
    pub fn insert(&mut self, token: String, name: String) -> Option<String> {
        self.0.insert(token, name)
    }
}

/// The reference tables needed to name commodities and technologies.
///
/// Built once per run and shared read-only by the code generator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Nomenclature {
    /// Sector names keyed by sector letter
    pub sectors: SectorMap,
    /// Fuel names keyed by fuel token
    pub fuels: FuelMap,
}

impl Nomenclature {
    /// Create a [`Nomenclature`] with the standard sectors and the given fuels
    pub fn new(fuels: FuelMap) -> Self {
        Self {
            sectors: SectorMap::default(),
            fuels,
        }
    }

    /// Get the display name for a fuel key.
    ///
    /// Electricity keys (`ELC` and `ELC_DX`, in any case) have fixed names; other keys are looked
    /// up in the fuel table as given. Returns `None` if the key is unknown.
    pub fn fuel_name(&self, key: &str) -> Option<&str> {
        match key.to_uppercase().as_str() {
            "ELC" => Some("electricity"),
            "ELC_DX" => Some("electricity (direct use)"),
            _ => self.fuels.get(key),
        }
    }
}

/// Split a code into its first segment and the remainder.
///
/// The remainder is everything after the first `_`. If there is no `_`, the whole code is used
/// for both parts.
pub fn split_prefix(code: &str) -> (&str, &str) {
    code.split_once('_').unwrap_or((code, code))
}

/// Upper-case the first character of `s` and lower-case the rest
pub fn capitalise(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("natural gas", "Natural gas")]
    #[case("LNG", "Lng")]
    #[case("electricity (direct use)", "Electricity (direct use)")]
    #[case("", "")]
    fn test_capitalise(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(capitalise(input), expected);
    }

    #[rstest]
    #[case("R_ng", ("R", "ng"))]
    #[case("E_elc_dx", ("E", "elc_dx"))]
    #[case("ng", ("ng", "ng"))]
    fn test_split_prefix(#[case] code: &str, #[case] expected: (&str, &str)) {
        assert_eq!(split_prefix(code), expected);
    }

    #[test]
    fn test_fuel_name() {
        let fuels = FuelMap::from_iter([("ng".to_string(), "natural gas".to_string())]);
        let names = Nomenclature::new(fuels);
        assert_eq!(names.fuel_name("ng"), Some("natural gas"));
        assert_eq!(names.fuel_name("NG"), None); // fuel lookup is case-sensitive
        assert_eq!(names.fuel_name("elc"), Some("electricity"));
        assert_eq!(names.fuel_name("ELC_DX"), Some("electricity (direct use)"));
        assert_eq!(names.fuel_name("xyz"), None);
    }

    #[test]
    fn test_fuel_map_insert() {
        let mut fuels = FuelMap::default();
        assert_eq!(fuels.insert("ng".into(), "natural gas".into()), None);
        assert_eq!(fuels.insert("coal".into(), "coal".into()), None);
        assert_eq!(
            fuels.insert("ng".into(), "gas".into()),
            Some("natural gas".into())
        );
        assert_eq!(fuels.get("ng"), Some("gas"));
        assert_eq!(fuels.len(), 2);
    }
}
