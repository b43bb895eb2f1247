//! Month to season lookup used to derive the `Season` column.

use serde::Serialize;
use std::fmt;

/// Selling season a transaction falls into.
///
/// | Months     | Season            |
/// |------------|-------------------|
/// | 3, 4, 5    | `Spring/Summer`   |
/// | 6, 7, 8    | `Monsoon`         |
/// | 9, 10, 11  | `Autumn/Festival` |
/// | 12, 1, 2   | `Winter`          |
///
/// Any other month maps to [`Season::NotApplicable`] (`N/A`). A parsed
/// calendar date never produces one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Season {
    #[serde(rename = "Spring/Summer")]
    SpringSummer,
    #[serde(rename = "Monsoon")]
    Monsoon,
    #[serde(rename = "Autumn/Festival")]
    AutumnFestival,
    #[serde(rename = "Winter")]
    Winter,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl Season {
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::SpringSummer,
            6..=8 => Season::Monsoon,
            9..=11 => Season::AutumnFestival,
            12 | 1 | 2 => Season::Winter,
            _ => Season::NotApplicable,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Season::SpringSummer => "Spring/Summer",
            Season::Monsoon => "Monsoon",
            Season::AutumnFestival => "Autumn/Festival",
            Season::Winter => "Winter",
            Season::NotApplicable => "N/A",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_month_has_a_season() {
        let expected = [
            (1, Season::Winter),
            (2, Season::Winter),
            (3, Season::SpringSummer),
            (4, Season::SpringSummer),
            (5, Season::SpringSummer),
            (6, Season::Monsoon),
            (7, Season::Monsoon),
            (8, Season::Monsoon),
            (9, Season::AutumnFestival),
            (10, Season::AutumnFestival),
            (11, Season::AutumnFestival),
            (12, Season::Winter),
        ];

        for (month, season) in expected {
            assert_eq!(Season::from_month(month), season, "month {month}");
            assert_ne!(Season::from_month(month), Season::NotApplicable);
        }
    }

    #[test]
    fn test_out_of_range_month_is_not_applicable() {
        assert_eq!(Season::from_month(0), Season::NotApplicable);
        assert_eq!(Season::from_month(13), Season::NotApplicable);
        assert_eq!(Season::NotApplicable.label(), "N/A");
    }

    #[test]
    fn test_serializes_as_label() {
        let json = serde_json::to_string(&Season::AutumnFestival).unwrap();
        assert_eq!(json, "\"Autumn/Festival\"");
        assert_eq!(Season::SpringSummer.to_string(), "Spring/Summer");
    }
}
