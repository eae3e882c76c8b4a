//! # Composite Wall
//!
//! Plane wall made of layers in series. The backend computes the layer
//! resistances `R_i = L_i / (k_i A_i)`, their sum, and the heat flow for the
//! given surface temperatures.
//!
//! ## Request
//!
//! ```json
//! {
//!   "layers": [{"thickness": 0.1, "k_value": 0.7, "area": 1.0}],
//!   "T_inner": 293.15,
//!   "T_outer": 263.15
//! }
//! ```
//!
//! ## Response
//!
//! ```json
//! {
//!   "total_resistance": 0.142857,
//!   "heat_flux": 210.0,
//!   "individual_resistances": [0.142857]
//! }
//! ```
//!
//! `heat_flux` is `null` when the total resistance is zero with a non-zero
//! temperature difference; an advisory `error` accompanies it.

use serde::{Deserialize, Serialize};

use super::layers::{LayerForm, LayerList};
use super::Calculator;
use crate::errors::{ThermalError, ThermalResult};
use crate::fields::{parse_number, plain_value};
use crate::format::{fixed, fixed_or};
use crate::protocol::{required_nullable, COMPOSITE_WALL_ENDPOINT};
use crate::report::NamedValue;

pub const TOTAL_RESISTANCE_LABEL: &str = "Total Thermal Resistance (R_total) [K/W]";
pub const HEAT_FLUX_LABEL: &str = "Heat Flux (q_flux) [W/m^2]";

/// Shown when the backend returns `heat_flux: null`
pub const HEAT_FLUX_UNDEFINED: &str = "N/A (Infinite or Undefined)";

const PRECISION: usize = 4;

/// Raw composite wall form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallForm {
    pub t_inner: String,
    pub t_outer: String,
    pub layers: LayerList,
}

impl Default for WallForm {
    fn default() -> Self {
        WallForm {
            t_inner: String::new(),
            t_outer: String::new(),
            layers: LayerList::with_blank_layer(),
        }
    }
}

/// One validated layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Thickness in m, may be zero
    pub thickness: f64,
    /// Thermal conductivity in W/mK, positive
    pub k_value: f64,
    /// Area in m^2, positive
    pub area: f64,
}

/// Validated composite wall parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallInput {
    pub layers: Vec<Layer>,
    /// Inner surface temperature in K
    #[serde(rename = "T_inner")]
    pub t_inner: f64,
    /// Outer surface temperature in K
    #[serde(rename = "T_outer")]
    pub t_outer: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WallResponse {
    pub total_resistance: f64,
    #[serde(deserialize_with = "required_nullable")]
    pub heat_flux: Option<f64>,
    pub individual_resistances: Vec<f64>,
}

/// Rendered composite wall results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WallOutputs {
    pub total_resistance: String,
    pub heat_flux: String,
    /// Per-layer resistances, 4 dp, in layer order
    pub layer_resistances: Vec<String>,
}

/// The composite wall calculator page.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositeWall;

impl Calculator for CompositeWall {
    const REPORT_TITLE: &'static str = "Composite Wall Calculator Report";
    const ENDPOINT: &'static str = COMPOSITE_WALL_ENDPOINT;
    const REPORT_FILENAME: &'static str = "composite_wall_report.pdf";
    const REPORT_NOTES: &'static str = "Area is assumed constant for all layers in this calculation.";
    const RESULT_LABELS: &'static [&'static str] = &[TOTAL_RESISTANCE_LABEL, HEAT_FLUX_LABEL];

    type Form = WallForm;
    type Input = WallInput;
    type Response = WallResponse;
    type Outputs = WallOutputs;

    fn validate(form: &WallForm) -> ThermalResult<WallInput> {
        let t_inner = parse_number(&form.t_inner).ok_or_else(|| {
            ThermalError::validation("T_inner", "Inner Temperature (T_inner) must be a valid number.")
        })?;
        let t_outer = parse_number(&form.t_outer).ok_or_else(|| {
            ThermalError::validation("T_outer", "Outer Temperature (T_outer) must be a valid number.")
        })?;

        if form.layers.is_empty() {
            return Err(ThermalError::validation("layers", "At least one layer must be added."));
        }

        let layers = form
            .layers
            .iter()
            .map(|(position, layer)| validate_layer(position, layer))
            .collect::<ThermalResult<Vec<_>>>()?;

        Ok(WallInput {
            layers,
            t_inner,
            t_outer,
        })
    }

    fn render(response: WallResponse) -> ThermalResult<WallOutputs> {
        Ok(WallOutputs {
            total_resistance: fixed(response.total_resistance, PRECISION),
            heat_flux: fixed_or(response.heat_flux, PRECISION, HEAT_FLUX_UNDEFINED),
            layer_resistances: response
                .individual_resistances
                .iter()
                .map(|r| fixed(*r, PRECISION))
                .collect(),
        })
    }

    fn result_fields(outputs: &WallOutputs) -> Vec<NamedValue> {
        let mut fields = vec![
            NamedValue::new(TOTAL_RESISTANCE_LABEL, outputs.total_resistance.clone()),
            NamedValue::new(HEAT_FLUX_LABEL, outputs.heat_flux.clone()),
        ];
        fields.extend(
            outputs
                .layer_resistances
                .iter()
                .enumerate()
                .map(|(i, r)| NamedValue::new(format!("Layer {} Resistance", i + 1), format!("{} K/W", r))),
        );
        fields
    }

    fn report_inputs(input: &WallInput) -> Vec<NamedValue> {
        let mut inputs = vec![
            NamedValue::new("Inner Surface Temperature (T_inner) [K]", plain_value(input.t_inner)),
            NamedValue::new("Outer Surface Temperature (T_outer) [K]", plain_value(input.t_outer)),
        ];
        for (i, layer) in input.layers.iter().enumerate() {
            let n = i + 1;
            inputs.push(NamedValue::new(format!("Layer {} - Thickness (m)", n), plain_value(layer.thickness)));
            inputs.push(NamedValue::new(format!("Layer {} - K-value (W/mK)", n), plain_value(layer.k_value)));
            inputs.push(NamedValue::new(format!("Layer {} - Area (m^2)", n), plain_value(layer.area)));
        }
        inputs
    }
}

fn validate_layer(position: usize, layer: &LayerForm) -> ThermalResult<Layer> {
    let field = format!("layers[{}]", position);
    let parsed = (
        parse_number(&layer.thickness),
        parse_number(&layer.k_value),
        parse_number(&layer.area),
    );
    let (thickness, k_value, area) = match parsed {
        (Some(t), Some(k), Some(a)) => (t, k, a),
        _ => {
            return Err(ThermalError::validation(
                field,
                format!("Layer {}: All fields must be valid numbers.", position),
            ))
        }
    };

    if thickness < 0.0 {
        return Err(ThermalError::validation(
            field,
            format!("Layer {}: Thickness must be non-negative.", position),
        ));
    }
    if k_value <= 0.0 {
        return Err(ThermalError::validation(
            field,
            format!("Layer {}: Thermal Conductivity (k) must be positive.", position),
        ));
    }
    if area <= 0.0 {
        return Err(ThermalError::validation(
            field,
            format!("Layer {}: Area must be positive.", position),
        ));
    }

    Ok(Layer {
        thickness,
        k_value,
        area,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{decode_calculation, HttpReply};
    use serde_json::json;

    fn brick_and_insulation() -> WallForm {
        WallForm {
            t_inner: "293.15".to_string(),
            t_outer: "263.15".to_string(),
            layers: vec![LayerForm::new("0.1", "0.7", "1"), LayerForm::new("0.05", "0.04", "1")]
                .into_iter()
                .collect(),
        }
    }

    fn message(err: ThermalError) -> String {
        err.to_string()
    }

    #[test]
    fn test_validate_builds_request_body() {
        let input = CompositeWall::validate(&brick_and_insulation()).unwrap();
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({
                "layers": [
                    {"thickness": 0.1, "k_value": 0.7, "area": 1.0},
                    {"thickness": 0.05, "k_value": 0.04, "area": 1.0}
                ],
                "T_inner": 293.15,
                "T_outer": 263.15
            })
        );
    }

    #[test]
    fn test_temperatures_checked_first() {
        let mut form = brick_and_insulation();
        form.t_outer = "".to_string();
        form.layers = LayerList::new();
        assert_eq!(
            message(CompositeWall::validate(&form).unwrap_err()),
            "Outer Temperature (T_outer) must be a valid number."
        );
    }

    #[test]
    fn test_no_layers() {
        let mut form = brick_and_insulation();
        form.layers = LayerList::new();
        assert_eq!(
            message(CompositeWall::validate(&form).unwrap_err()),
            "At least one layer must be added."
        );
    }

    #[test]
    fn test_first_invalid_layer_named() {
        let mut form = brick_and_insulation();
        form.layers.push(LayerForm::new("0.01", "0", "1"));
        form.layers.push(LayerForm::new("", "1", "1"));
        assert_eq!(
            message(CompositeWall::validate(&form).unwrap_err()),
            "Layer 3: Thermal Conductivity (k) must be positive."
        );
    }

    #[test]
    fn test_layer_rules() {
        let cases = [
            (LayerForm::new("abc", "1", "1"), "Layer 1: All fields must be valid numbers."),
            (LayerForm::new("-0.1", "1", "1"), "Layer 1: Thickness must be non-negative."),
            (LayerForm::new("0.1", "-2", "1"), "Layer 1: Thermal Conductivity (k) must be positive."),
            (LayerForm::new("0.1", "1", "0"), "Layer 1: Area must be positive."),
        ];
        for (layer, expected) in cases {
            let form = WallForm {
                t_inner: "300".to_string(),
                t_outer: "280".to_string(),
                layers: vec![layer].into_iter().collect(),
            };
            assert_eq!(message(CompositeWall::validate(&form).unwrap_err()), expected);
        }
    }

    #[test]
    fn test_zero_thickness_allowed() {
        let form = WallForm {
            t_inner: "300".to_string(),
            t_outer: "300".to_string(),
            layers: vec![LayerForm::new("0", "1", "1")].into_iter().collect(),
        };
        let input = CompositeWall::validate(&form).unwrap();
        assert_eq!(input.layers[0].thickness, 0.0);
    }

    #[test]
    fn test_render_four_places() {
        let outputs = CompositeWall::render(WallResponse {
            total_resistance: 2.5,
            heat_flux: Some(100.0),
            individual_resistances: vec![1.0, 1.5],
        })
        .unwrap();
        assert_eq!(outputs.total_resistance, "2.5000");
        assert_eq!(outputs.heat_flux, "100.0000");

        let fields = CompositeWall::result_fields(&outputs);
        assert_eq!(fields[2], NamedValue::new("Layer 1 Resistance", "1.0000 K/W"));
        assert_eq!(fields[3], NamedValue::new("Layer 2 Resistance", "1.5000 K/W"));
    }

    #[test]
    fn test_null_heat_flux_marker() {
        let reply = HttpReply::json(
            200,
            &json!({"total_resistance": 0.0, "heat_flux": null, "individual_resistances": [0.0]}),
        );
        let decoded = decode_calculation::<WallResponse>(&reply).unwrap();
        let outputs = CompositeWall::render(decoded.response).unwrap();
        assert_eq!(outputs.heat_flux, "N/A (Infinite or Undefined)");
    }

    #[test]
    fn test_missing_heat_flux_is_malformed() {
        let reply = HttpReply::json(200, &json!({"total_resistance": 1.0, "individual_resistances": []}));
        let err = decode_calculation::<WallResponse>(&reply).unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_RESPONSE");
    }

    #[test]
    fn test_report_inputs_order() {
        let input = CompositeWall::validate(&brick_and_insulation()).unwrap();
        let names: Vec<String> = CompositeWall::report_inputs(&input).into_iter().map(|nv| nv.name).collect();
        assert_eq!(
            names,
            vec![
                "Inner Surface Temperature (T_inner) [K]",
                "Outer Surface Temperature (T_outer) [K]",
                "Layer 1 - Thickness (m)",
                "Layer 1 - K-value (W/mK)",
                "Layer 1 - Area (m^2)",
                "Layer 2 - Thickness (m)",
                "Layer 2 - K-value (W/mK)",
                "Layer 2 - Area (m^2)",
            ]
        );
    }
}
