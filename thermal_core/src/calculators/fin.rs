//! # Fin
//!
//! Straight fin of uniform cross-section with an adiabatic tip. The backend
//! returns the heat transfer rate, the fin efficiency and the temperature
//! profile along the fin.
//!
//! ## Request
//!
//! ```json
//! {"P": 0.1, "Ac": 0.0005, "L": 0.05, "k": 200.0, "h_conv": 25.0, "T_base": 373.15, "T_inf": 298.15}
//! ```
//!
//! ## Response
//!
//! ```json
//! {"heat_transfer_rate": 8.95, "fin_efficiency": 0.955, "x_coords": [0.0, ...], "temp_dist": [373.15, ...]}
//! ```

use serde::{Deserialize, Serialize};

use super::Calculator;
use crate::chart::LineChart;
use crate::errors::{ThermalError, ThermalResult};
use crate::fields::{parse_number, plain_value};
use crate::format::fixed;
use crate::protocol::FIN_ENDPOINT;
use crate::report::NamedValue;

pub const HEAT_RATE_LABEL: &str = "Heat Transfer Rate (q_f) [W]";
pub const EFFICIENCY_LABEL: &str = "Fin Efficiency (η_f)";

const PRECISION: usize = 4;

/// Raw fin form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinForm {
    pub p: String,
    pub ac: String,
    pub l: String,
    pub k: String,
    pub h_conv: String,
    pub t_base: String,
    pub t_inf: String,
}

impl FinForm {
    /// Fields in form order, keyed by their wire names.
    fn fields(&self) -> [(&'static str, &str); 7] {
        [
            ("P", self.p.as_str()),
            ("Ac", self.ac.as_str()),
            ("L", self.l.as_str()),
            ("k", self.k.as_str()),
            ("h_conv", self.h_conv.as_str()),
            ("T_base", self.t_base.as_str()),
            ("T_inf", self.t_inf.as_str()),
        ]
    }
}

/// Validated fin parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinInput {
    /// Perimeter in m
    #[serde(rename = "P")]
    pub p: f64,
    /// Cross-sectional area in m^2
    #[serde(rename = "Ac")]
    pub ac: f64,
    /// Length in m
    #[serde(rename = "L")]
    pub l: f64,
    /// Thermal conductivity in W/mK
    pub k: f64,
    /// Convection coefficient in W/m^2K
    pub h_conv: f64,
    /// Base temperature in K
    #[serde(rename = "T_base")]
    pub t_base: f64,
    /// Ambient temperature in K
    #[serde(rename = "T_inf")]
    pub t_inf: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FinResponse {
    pub heat_transfer_rate: f64,
    pub fin_efficiency: f64,
    pub x_coords: Vec<f64>,
    pub temp_dist: Vec<f64>,
}

/// Rendered fin results, including the temperature chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinOutputs {
    pub heat_transfer_rate: String,
    pub fin_efficiency: String,
    pub chart: LineChart,
}

/// The fin calculator page.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fin;

impl Calculator for Fin {
    const REPORT_TITLE: &'static str = "Fin Calculator Report";
    const ENDPOINT: &'static str = FIN_ENDPOINT;
    const REPORT_FILENAME: &'static str = "fin_calculator_report.pdf";
    const REPORT_NOTES: &'static str = "The temperature distribution along the fin is a graphical result and is not included in this PDF summary.";
    const RESULT_LABELS: &'static [&'static str] = &[HEAT_RATE_LABEL, EFFICIENCY_LABEL];

    type Form = FinForm;
    type Input = FinInput;
    type Response = FinResponse;
    type Outputs = FinOutputs;

    fn validate(form: &FinForm) -> ThermalResult<FinInput> {
        let mut values = [0.0; 7];
        for (slot, (name, raw)) in values.iter_mut().zip(form.fields()) {
            *slot = parse_number(raw).ok_or_else(|| {
                ThermalError::validation(
                    name,
                    format!("All input fields must be filled with valid numbers. Error with: {}", name),
                )
            })?;
        }
        let [p, ac, l, k, h_conv, t_base, t_inf] = values;

        if p <= 0.0 {
            return Err(ThermalError::validation("P", "Fin Perimeter (P) must be positive."));
        }
        if ac <= 0.0 {
            return Err(ThermalError::validation("Ac", "Fin Cross-sectional Area (Ac) must be positive."));
        }
        if l < 0.0 {
            return Err(ThermalError::validation("L", "Fin Length (L) must be non-negative."));
        }
        if k <= 0.0 {
            return Err(ThermalError::validation("k", "Thermal Conductivity (k) must be positive."));
        }
        if h_conv < 0.0 {
            return Err(ThermalError::validation(
                "h_conv",
                "Convection Coefficient (h_conv) must be non-negative.",
            ));
        }
        if t_base <= 0.0 || t_inf <= 0.0 {
            let field = if t_base <= 0.0 { "T_base" } else { "T_inf" };
            return Err(ThermalError::validation(
                field,
                "Temperatures (T_base, T_inf) must be positive (in Kelvin).",
            ));
        }

        Ok(FinInput {
            p,
            ac,
            l,
            k,
            h_conv,
            t_base,
            t_inf,
        })
    }

    fn render(response: FinResponse) -> ThermalResult<FinOutputs> {
        Ok(FinOutputs {
            heat_transfer_rate: fixed(response.heat_transfer_rate, PRECISION),
            fin_efficiency: fixed(response.fin_efficiency, PRECISION),
            chart: LineChart::temperature_distribution(&response.x_coords, &response.temp_dist)?,
        })
    }

    fn result_fields(outputs: &FinOutputs) -> Vec<NamedValue> {
        // The chart is graphical only and stays out of the report
        vec![
            NamedValue::new(HEAT_RATE_LABEL, outputs.heat_transfer_rate.clone()),
            NamedValue::new(EFFICIENCY_LABEL, outputs.fin_efficiency.clone()),
        ]
    }

    fn report_inputs(input: &FinInput) -> Vec<NamedValue> {
        vec![
            NamedValue::new("Fin Perimeter (P) [m]", plain_value(input.p)),
            NamedValue::new("Fin Cross-sectional Area (Ac) [m^2]", plain_value(input.ac)),
            NamedValue::new("Fin Length (L) [m]", plain_value(input.l)),
            NamedValue::new("Thermal Conductivity (k) [W/mK]", plain_value(input.k)),
            NamedValue::new("Convection Coefficient (h_conv) [W/m^2K]", plain_value(input.h_conv)),
            NamedValue::new("Base Temperature (T_base) [K]", plain_value(input.t_base)),
            NamedValue::new("Ambient Temperature (T_inf) [K]", plain_value(input.t_inf)),
        ]
    }
}
