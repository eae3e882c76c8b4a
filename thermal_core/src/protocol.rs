//! # Wire Protocol
//!
//! Interprets replies from the calculation and report endpoints.
//!
//! Every calculation endpoint answers with a JSON object. On 2xx it carries
//! the calculator's result fields and possibly an advisory `error` string; on
//! any other status it is expected to carry `{error: string}`. The report
//! endpoint answers 2xx with the raw PDF bytes.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::{ThermalError, ThermalResult, CALCULATION_FAILED};

/// Calculation endpoints, fixed per calculator.
pub const COMPOSITE_WALL_ENDPOINT: &str = "/calculate_composite_wall";
pub const FIN_ENDPOINT: &str = "/calculate_fin";
pub const HEAT_EXCHANGER_ENDPOINT: &str = "/calculate_heat_exchanger";

/// Report generation endpoint shared by all calculators.
pub const EXPORT_PDF_ENDPOINT: &str = "/export_pdf";

/// A raw HTTP reply: status code and body bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        HttpReply {
            status,
            body: body.into(),
        }
    }

    /// Build a reply whose body is the serialized `value`.
    pub fn json(status: u16, value: &Value) -> Self {
        HttpReply::new(status, value.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A successfully decoded calculation reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<R> {
    pub response: R,
    /// `error` string present on a 2xx reply, shown as a non-fatal note
    pub advisory: Option<String>,
}

/// Decode a calculation reply into `R`.
///
/// - body not JSON, or 2xx missing required fields: `MalformedResponse`
/// - non-2xx: `Server` with the body's `error` or "Calculation failed."
pub fn decode_calculation<R: DeserializeOwned>(reply: &HttpReply) -> ThermalResult<Decoded<R>> {
    let value: Value = serde_json::from_slice(&reply.body).map_err(|e| {
        ThermalError::malformed(format!("status {}: body is not JSON: {}", reply.status, e))
    })?;

    let message = error_field(&value);
    if !reply.is_success() {
        return Err(ThermalError::server(
            reply.status,
            message.unwrap_or_else(|| CALCULATION_FAILED.to_string()),
        ));
    }

    let response = serde_json::from_value(value).map_err(|e| {
        ThermalError::malformed(format!("status {}: unexpected response shape: {}", reply.status, e))
    })?;

    Ok(Decoded {
        response,
        advisory: message,
    })
}

/// Decode a report reply into the PDF bytes.
pub fn decode_report(reply: HttpReply) -> ThermalResult<Vec<u8>> {
    if reply.is_success() {
        return Ok(reply.body);
    }

    let message = serde_json::from_slice::<Value>(&reply.body)
        .ok()
        .and_then(|value| error_field(&value));

    Err(ThermalError::export(message.unwrap_or_else(|| {
        format!("PDF generation failed with status: {}", reply.status)
    })))
}

/// Deserialize a nullable number whose key must still be present.
///
/// Plain `Option<f64>` fields accept a missing key as `None`; a missing
/// result field is a malformed reply, while an explicit `null` is "not
/// applicable".
pub fn required_nullable<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    <Option<f64> as serde::Deserialize>::deserialize(deserializer)
}

/// Non-empty `error` string of a JSON object, if any.
fn error_field(value: &Value) -> Option<String> {
    value
        .get("error")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
