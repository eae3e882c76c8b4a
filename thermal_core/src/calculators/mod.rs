//! # Calculators
//!
//! One module per calculator page. Each calculation follows the pattern:
//!
//! - `*Form` - raw field text as typed by the user
//! - `*Input` - validated parameters, serialized as the request body
//! - `*Response` - the backend's JSON reply
//! - `*Outputs` - rendered, fixed-precision result strings
//!
//! The [`Calculator`] trait ties these together so that one generic
//! [`Session`](crate::session::Session) and one set of command handlers
//! serve all three pages.
//!
//! ## Available Calculators
//!
//! - [`composite_wall`] - conduction through a stack of plane layers
//! - [`fin`] - straight fin with adiabatic tip
//! - [`heat_exchanger`] - NTU-effectiveness method

pub mod composite_wall;
pub mod fin;
pub mod heat_exchanger;
pub mod layers;

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::ThermalResult;
use crate::format::PLACEHOLDER;
use crate::report::NamedValue;

// Re-export commonly used types
pub use composite_wall::{CompositeWall, WallForm, WallInput, WallOutputs};
pub use fin::{Fin, FinForm, FinInput, FinOutputs};
pub use heat_exchanger::{ExchangerForm, ExchangerInput, ExchangerOutputs, FlowType, HeatExchanger};
pub use layers::{LayerForm, LayerList};

/// A calculator page: its endpoint, its validation, its rendering and its
/// report layout.
pub trait Calculator {
    /// Report title sent as `calculator_name`
    const REPORT_TITLE: &'static str;
    /// Calculation endpoint path
    const ENDPOINT: &'static str;
    /// Filename the exported report is saved under
    const REPORT_FILENAME: &'static str;
    /// Free-text notes sent with every report
    const REPORT_NOTES: &'static str;
    /// Result field labels, in display order
    const RESULT_LABELS: &'static [&'static str];

    type Form: Debug;
    type Input: Debug + Clone + Serialize;
    type Response: DeserializeOwned;
    type Outputs: Debug + Clone + Serialize;

    /// Validate a form, stopping at the first violation.
    fn validate(form: &Self::Form) -> ThermalResult<Self::Input>;

    /// Render a decoded response into display strings.
    ///
    /// Fails only if the response is internally inconsistent.
    fn render(response: Self::Response) -> ThermalResult<Self::Outputs>;

    /// Displayed result fields, in order.
    fn result_fields(outputs: &Self::Outputs) -> Vec<NamedValue>;

    /// Input section of the report, in order.
    fn report_inputs(input: &Self::Input) -> Vec<NamedValue>;

    /// Output section of the report. Defaults to the displayed fields.
    fn report_outputs(outputs: &Self::Outputs) -> Vec<NamedValue> {
        Self::result_fields(outputs)
    }

    /// Result fields as shown before a calculation, or after a failed one.
    fn placeholder_fields() -> Vec<NamedValue> {
        Self::RESULT_LABELS
            .iter()
            .map(|label| NamedValue::new(*label, PLACEHOLDER))
            .collect()
    }
}
