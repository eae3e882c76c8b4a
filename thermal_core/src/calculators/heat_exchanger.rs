//! # Heat Exchanger
//!
//! Two-stream exchanger rated with the NTU-effectiveness method. The backend
//! returns NTU, effectiveness, the actual heat rate and both outlet
//! temperatures; any of them may be `null` when undefined.
//!
//! ## Request
//!
//! ```json
//! {
//!   "m_dot_hot": 0.5, "Cp_hot": 4180.0, "T_in_hot": 363.15,
//!   "m_dot_cold": 0.8, "Cp_cold": 4180.0, "T_in_cold": 288.15,
//!   "UA": 2000.0, "flow_type": "counterflow"
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Calculator;
use crate::errors::{ThermalError, ThermalResult};
use crate::fields::{parse_number, plain_value};
use crate::format::fixed_or;
use crate::protocol::{required_nullable, HEAT_EXCHANGER_ENDPOINT};
use crate::report::NamedValue;

pub const NTU_LABEL: &str = "NTU";
pub const EFFECTIVENESS_LABEL: &str = "Effectiveness (ε)";
pub const Q_ACTUAL_LABEL: &str = "Actual Heat Transfer Rate (q_actual) [W]";
pub const T_OUT_HOT_LABEL: &str = "Hot Fluid Outlet Temperature (T_out_hot) [K]";
pub const T_OUT_COLD_LABEL: &str = "Cold Fluid Outlet Temperature (T_out_cold) [K]";

/// Shown for any `null` result field
pub const NOT_APPLICABLE: &str = "N/A";

/// Flow arrangement of the two streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowType {
    Parallel,
    Counterflow,
}

impl FlowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowType::Parallel => "parallel",
            FlowType::Counterflow => "counterflow",
        }
    }
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowType {
    type Err = ThermalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "parallel" => Ok(FlowType::Parallel),
            "counterflow" => Ok(FlowType::Counterflow),
            _ => Err(ThermalError::validation(
                "flow_type",
                "Flow type must be 'parallel' or 'counterflow'.",
            )),
        }
    }
}

/// Raw heat exchanger form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangerForm {
    pub m_dot_hot: String,
    pub cp_hot: String,
    pub t_in_hot: String,
    pub m_dot_cold: String,
    pub cp_cold: String,
    pub t_in_cold: String,
    pub ua: String,
    pub flow_type: String,
}

impl Default for ExchangerForm {
    fn default() -> Self {
        ExchangerForm {
            m_dot_hot: String::new(),
            cp_hot: String::new(),
            t_in_hot: String::new(),
            m_dot_cold: String::new(),
            cp_cold: String::new(),
            t_in_cold: String::new(),
            ua: String::new(),
            flow_type: FlowType::Parallel.to_string(),
        }
    }
}

impl ExchangerForm {
    /// Numeric fields in form order: wire name, raw text, may be negative
    fn numeric_fields(&self) -> [(&'static str, &str, bool); 7] {
        [
            ("m_dot_hot", self.m_dot_hot.as_str(), false),
            ("Cp_hot", self.cp_hot.as_str(), false),
            ("T_in_hot", self.t_in_hot.as_str(), true),
            ("m_dot_cold", self.m_dot_cold.as_str(), false),
            ("Cp_cold", self.cp_cold.as_str(), false),
            ("T_in_cold", self.t_in_cold.as_str(), true),
            ("UA", self.ua.as_str(), false),
        ]
    }
}

/// Validated heat exchanger parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExchangerInput {
    /// Hot stream mass flow in kg/s
    pub m_dot_hot: f64,
    /// Hot stream specific heat in J/kgK
    #[serde(rename = "Cp_hot")]
    pub cp_hot: f64,
    /// Hot stream inlet temperature in K
    #[serde(rename = "T_in_hot")]
    pub t_in_hot: f64,
    pub m_dot_cold: f64,
    #[serde(rename = "Cp_cold")]
    pub cp_cold: f64,
    #[serde(rename = "T_in_cold")]
    pub t_in_cold: f64,
    /// Overall conductance in W/K
    #[serde(rename = "UA")]
    pub ua: f64,
    pub flow_type: FlowType,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExchangerResponse {
    #[serde(rename = "NTU", deserialize_with = "required_nullable")]
    pub ntu: Option<f64>,
    #[serde(deserialize_with = "required_nullable")]
    pub effectiveness: Option<f64>,
    #[serde(deserialize_with = "required_nullable")]
    pub q_actual: Option<f64>,
    #[serde(rename = "T_out_hot", deserialize_with = "required_nullable")]
    pub t_out_hot: Option<f64>,
    #[serde(rename = "T_out_cold", deserialize_with = "required_nullable")]
    pub t_out_cold: Option<f64>,
}

/// Rendered heat exchanger results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangerOutputs {
    pub ntu: String,
    pub effectiveness: String,
    pub q_actual: String,
    pub t_out_hot: String,
    pub t_out_cold: String,
}

/// The heat exchanger calculator page.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeatExchanger;

impl Calculator for HeatExchanger {
    const REPORT_TITLE: &'static str = "Heat Exchanger Performance Report";
    const ENDPOINT: &'static str = HEAT_EXCHANGER_ENDPOINT;
    const REPORT_FILENAME: &'static str = "heat_exchanger_report.pdf";
    const REPORT_NOTES: &'static str = "Calculations performed using the NTU-effectiveness method.";
    const RESULT_LABELS: &'static [&'static str] = &[
        NTU_LABEL,
        EFFECTIVENESS_LABEL,
        Q_ACTUAL_LABEL,
        T_OUT_HOT_LABEL,
        T_OUT_COLD_LABEL,
    ];

    type Form = ExchangerForm;
    type Input = ExchangerInput;
    type Response = ExchangerResponse;
    type Outputs = ExchangerOutputs;

    fn validate(form: &ExchangerForm) -> ThermalResult<ExchangerInput> {
        let mut values = [0.0; 7];
        for (slot, (name, raw, signed)) in values.iter_mut().zip(form.numeric_fields()) {
            let value = parse_number(raw).ok_or_else(|| {
                ThermalError::validation(
                    name,
                    format!(
                        "All input fields (except flow type) must be filled with valid numbers. Error with: {}",
                        name
                    ),
                )
            })?;
            if !signed && value < 0.0 {
                return Err(ThermalError::validation(
                    name,
                    format!("Parameter '{}' must be non-negative.", name),
                ));
            }
            *slot = value;
        }
        let [m_dot_hot, cp_hot, t_in_hot, m_dot_cold, cp_cold, t_in_cold, ua] = values;

        let flow_type: FlowType = form.flow_type.parse()?;

        if t_in_hot <= t_in_cold {
            return Err(ThermalError::validation(
                "T_in_hot",
                "Hot fluid inlet temperature (T_in_hot) must be greater than cold fluid inlet temperature (T_in_cold) for meaningful heat exchange in this model.",
            ));
        }

        Ok(ExchangerInput {
            m_dot_hot,
            cp_hot,
            t_in_hot,
            m_dot_cold,
            cp_cold,
            t_in_cold,
            ua,
            flow_type,
        })
    }

    fn render(response: ExchangerResponse) -> ThermalResult<ExchangerOutputs> {
        Ok(ExchangerOutputs {
            ntu: fixed_or(response.ntu, 4, NOT_APPLICABLE),
            effectiveness: fixed_or(response.effectiveness, 4, NOT_APPLICABLE),
            q_actual: fixed_or(response.q_actual, 2, NOT_APPLICABLE),
            t_out_hot: fixed_or(response.t_out_hot, 2, NOT_APPLICABLE),
            t_out_cold: fixed_or(response.t_out_cold, 2, NOT_APPLICABLE),
        })
    }

    fn result_fields(outputs: &ExchangerOutputs) -> Vec<NamedValue> {
        vec![
            NamedValue::new(NTU_LABEL, outputs.ntu.clone()),
            NamedValue::new(EFFECTIVENESS_LABEL, outputs.effectiveness.clone()),
            NamedValue::new(Q_ACTUAL_LABEL, outputs.q_actual.clone()),
            NamedValue::new(T_OUT_HOT_LABEL, outputs.t_out_hot.clone()),
            NamedValue::new(T_OUT_COLD_LABEL, outputs.t_out_cold.clone()),
        ]
    }

    fn report_inputs(input: &ExchangerInput) -> Vec<NamedValue> {
        vec![
            NamedValue::new("Hot Fluid Mass Flow Rate (ṁ_hot) [kg/s]", plain_value(input.m_dot_hot)),
            NamedValue::new("Hot Fluid Specific Heat (Cp_hot) [J/kgK]", plain_value(input.cp_hot)),
            NamedValue::new("Hot Fluid Inlet Temperature (T_in_hot) [K]", plain_value(input.t_in_hot)),
            NamedValue::new("Cold Fluid Mass Flow Rate (ṁ_cold) [kg/s]", plain_value(input.m_dot_cold)),
            NamedValue::new("Cold Fluid Specific Heat (Cp_cold) [J/kgK]", plain_value(input.cp_cold)),
            NamedValue::new("Cold Fluid Inlet Temperature (T_in_cold) [K]", plain_value(input.t_in_cold)),
            NamedValue::new("Overall Heat Transfer Coefficient-Area (UA) [W/K]", plain_value(input.ua)),
            NamedValue::new("Flow Type", input.flow_type.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{decode_calculation, HttpReply};
    use serde_json::json;

    fn water_to_water() -> ExchangerForm {
        ExchangerForm {
            m_dot_hot: "0.5".to_string(),
            cp_hot: "4180".to_string(),
            t_in_hot: "363.15".to_string(),
            m_dot_cold: "0.8".to_string(),
            cp_cold: "4180".to_string(),
            t_in_cold: "288.15".to_string(),
            ua: "2000".to_string(),
            flow_type: "counterflow".to_string(),
        }
    }

    #[test]
    fn test_request_body() {
        let input = HeatExchanger::validate(&water_to_water()).unwrap();
        assert_eq!(
            serde_json::to_value(input).unwrap(),
            json!({
                "m_dot_hot": 0.5, "Cp_hot": 4180.0, "T_in_hot": 363.15,
                "m_dot_cold": 0.8, "Cp_cold": 4180.0, "T_in_cold": 288.15,
                "UA": 2000.0, "flow_type": "counterflow"
            })
        );
    }

    #[test]
    fn test_non_numeric_field_named() {
        let mut form = water_to_water();
        form.cp_cold = "four thousand".to_string();
        assert_eq!(
            HeatExchanger::validate(&form).unwrap_err().to_string(),
            "All input fields (except flow type) must be filled with valid numbers. Error with: Cp_cold"
        );
    }

    #[test]
    fn test_negative_flow_rejected_but_temperature_may_be_negative() {
        let mut form = water_to_water();
        form.ua = "-1".to_string();
        assert_eq!(
            HeatExchanger::validate(&form).unwrap_err().to_string(),
            "Parameter 'UA' must be non-negative."
        );

        let mut form = water_to_water();
        form.t_in_hot = "-5".to_string();
        form.t_in_cold = "-20".to_string();
        assert!(HeatExchanger::validate(&form).is_ok());
    }

    #[test]
    fn test_hot_inlet_must_exceed_cold_inlet() {
        let mut form = water_to_water();
        form.t_in_hot = "288.15".to_string();
        let err = HeatExchanger::validate(&form).unwrap_err();
        assert!(err.to_string().starts_with("Hot fluid inlet temperature (T_in_hot) must be greater"));
    }

    #[test]
    fn test_flow_type() {
        let mut form = water_to_water();
        form.flow_type = "crossflow".to_string();
        assert_eq!(
            HeatExchanger::validate(&form).unwrap_err().to_string(),
            "Flow type must be 'parallel' or 'counterflow'."
        );
        assert_eq!("parallel".parse::<FlowType>().unwrap(), FlowType::Parallel);
        assert_eq!(ExchangerForm::default().flow_type, "parallel");
    }

    #[test]
    fn test_render_precision_and_nulls() {
        let reply = HttpReply::json(
            200,
            &json!({
                "NTU": 0.956938, "effectiveness": 0.55123, "q_actual": 86410.456,
                "T_out_hot": null, "T_out_cold": 313.987, "error": null
            }),
        );
        let decoded = decode_calculation::<ExchangerResponse>(&reply).unwrap();
        let outputs = HeatExchanger::render(decoded.response).unwrap();
        assert_eq!(outputs.ntu, "0.9569");
        assert_eq!(outputs.effectiveness, "0.5512");
        assert_eq!(outputs.q_actual, "86410.46");
        assert_eq!(outputs.t_out_hot, "N/A");
        assert_eq!(outputs.t_out_cold, "313.99");
    }

    #[test]
    fn test_report_inputs_end_with_flow_type() {
        let input = HeatExchanger::validate(&water_to_water()).unwrap();
        let inputs = HeatExchanger::report_inputs(&input);
        assert_eq!(inputs.len(), 8);
        assert_eq!(inputs[7], NamedValue::new("Flow Type", "counterflow"));
        assert_eq!(inputs[1].value, "4180");
    }
}
