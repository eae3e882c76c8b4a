//! # Report Payloads
//!
//! The body POSTed to `/export_pdf`. Rendering the PDF is the backend's job;
//! this side only assembles the ordered name/value pairs.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "calculator_name": "Fin Calculator Report",
//!   "inputs": [{"name": "Fin Perimeter (P) [m]", "value": "0.1"}],
//!   "outputs": [{"name": "Heat Transfer Rate (q_f) [W]", "value": "12.3456"}],
//!   "notes": "..."
//! }
//! ```

use serde::{Deserialize, Serialize};

/// One labelled value in a report section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedValue {
    pub name: String,
    pub value: String,
}

impl NamedValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        NamedValue {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Request body for the report endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub calculator_name: String,
    pub inputs: Vec<NamedValue>,
    pub outputs: Vec<NamedValue>,
    pub notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shape() {
        let request = ReportRequest {
            calculator_name: "Fin Calculator Report".to_string(),
            inputs: vec![NamedValue::new("k", "200")],
            outputs: vec![NamedValue::new("q", "1.0000")],
            notes: "n".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "calculator_name": "Fin Calculator Report",
                "inputs": [{"name": "k", "value": "200"}],
                "outputs": [{"name": "q", "value": "1.0000"}],
                "notes": "n"
            })
        );
    }
}
