//! Domain thresholds and code enumerations.
//!
//! The catalog is static data; validators hold a `&'static DataConstraints`.

/// Value bounds, year bounds, string length bounds and valid code sets.
#[derive(Debug, Clone, PartialEq)]
pub struct DataConstraints {
    /// Minimum plausible measurement value
    pub min_value: f64,
    /// Maximum plausible measurement value
    pub max_value: f64,
    /// Earliest plausible sample year
    pub min_year: i32,
    /// Latest valid sample year
    pub max_year: i32,
    /// Maximum station identifier length
    pub max_station_id_length: usize,
    /// Maximum parameter name length
    pub max_parameter_length: usize,
    /// Maximum unit label length
    pub max_unit_length: usize,
    /// Maximum qualifier flag length
    pub max_qualifier_length: usize,
    /// Known qualifier codes
    pub valid_qualifiers: &'static [&'static str],
    /// Known QA status codes
    pub valid_qa_status: &'static [&'static str],
}

/// The constraint catalog for provider water-quality records.
pub static WATER_QUALITY_CONSTRAINTS: DataConstraints = DataConstraints {
    min_value: -1000.0,
    max_value: 1e9,
    min_year: 1900,
    max_year: 2100,
    max_station_id_length: 50,
    max_parameter_length: 200,
    max_unit_length: 50,
    max_qualifier_length: 10,
    valid_qualifiers: &[
        "<",   // below detection limit
        ">",   // above detection limit
        "~",   // approximate
        "E",   // estimated
        "U",   // uncensored
        "nan", // not applicable
    ],
    valid_qa_status: &[
        "P",   // provisional
        "V",   // validated
        "R",   // rejected
        "E",   // estimated
        "nan", // not applicable
    ],
};

impl DataConstraints {
    /// Returns the static catalog.
    pub fn catalog() -> &'static DataConstraints {
        &WATER_QUALITY_CONSTRAINTS
    }

    /// Returns true if `code` is a known qualifier.
    pub fn is_valid_qualifier(&self, code: &str) -> bool {
        self.valid_qualifiers.contains(&code)
    }

    /// Returns true if `code` is a known QA status.
    pub fn is_valid_qa_status(&self, code: &str) -> bool {
        self.valid_qa_status.contains(&code)
    }

    /// Returns true if `value` lies below the plausible range.
    pub fn below_min(&self, value: f64) -> bool {
        value < self.min_value
    }

    /// Returns true if `value` lies above the plausible range.
    pub fn above_max(&self, value: f64) -> bool {
        value > self.max_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_bounds() {
        let c = DataConstraints::catalog();
        assert_eq!(c.min_value, -1000.0);
        assert_eq!(c.max_value, 1_000_000_000.0);
        assert_eq!(c.min_year, 1900);
        assert_eq!(c.max_year, 2100);
        assert_eq!(c.max_station_id_length, 50);
    }

    #[test]
    fn test_code_sets() {
        let c = DataConstraints::catalog();
        for code in ["<", ">", "~", "E", "U", "nan"] {
            assert!(c.is_valid_qualifier(code), "{}", code);
        }
        assert!(!c.is_valid_qualifier("Z"));
        assert!(!c.is_valid_qualifier("e"));

        for code in ["P", "V", "R", "E", "nan"] {
            assert!(c.is_valid_qa_status(code), "{}", code);
        }
        assert!(!c.is_valid_qa_status("X"));
    }

    #[test]
    fn test_value_bounds_are_exclusive() {
        let c = DataConstraints::catalog();
        assert!(!c.below_min(-1000.0));
        assert!(c.below_min(-1000.5));
        assert!(!c.above_max(1e9));
        assert!(c.above_max(1e9 + 1.0));
    }
}
