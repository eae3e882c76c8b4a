//! Line chart data for the fin temperature distribution.
//!
//! Only the series is produced here; drawing it belongs to whatever front
//! end displays the result.

use serde::Serialize;

use crate::errors::{ThermalError, ThermalResult};
use crate::format::fixed;

/// A single-series line chart with string-formatted points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// X axis labels (3 dp)
    pub labels: Vec<String>,
    /// Y values (2 dp)
    pub values: Vec<String>,
}

impl LineChart {
    /// Temperature along the fin, from base (x = 0) to tip (x = L).
    pub fn temperature_distribution(x_coords: &[f64], temps: &[f64]) -> ThermalResult<Self> {
        if x_coords.len() != temps.len() {
            return Err(ThermalError::malformed(format!(
                "x_coords has {} points but temp_dist has {}",
                x_coords.len(),
                temps.len()
            )));
        }

        Ok(LineChart {
            title: "Temperature Distribution".to_string(),
            x_label: "Distance along fin (m)".to_string(),
            y_label: "Temperature (K)".to_string(),
            labels: x_coords.iter().map(|x| fixed(*x, 3)).collect(),
            values: temps.iter().map(|t| fixed(*t, 2)).collect(),
        })
    }

    /// (label, value) pairs in order
    pub fn points(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels.iter().map(String::as_str).zip(self.values.iter().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats_points() {
        let chart = LineChart::temperature_distribution(&[0.0, 0.05, 0.1], &[373.15, 350.456, 341.0]).unwrap();
        let points: Vec<(&str, &str)> = chart.points().collect();
        assert_eq!(points, vec![("0.000", "373.15"), ("0.050", "350.46"), ("0.100", "341.00")]);
        assert_eq!(chart.title, "Temperature Distribution");
    }

    #[test]
    fn test_length_mismatch() {
        let err = LineChart::temperature_distribution(&[0.0, 1.0], &[300.0]).unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_RESPONSE");
    }
}
