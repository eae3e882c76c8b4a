//! Terminal rendering of results, charts and errors.

use serde::Serialize;
use serde_json::json;
use thermal_core::calculators::Calculator;
use thermal_core::chart::LineChart;
use thermal_core::report::NamedValue;
use thermal_core::session::Session;
use thermal_core::{ThermalError, ThermalResult};
use tracing::error;

const RULE: &str = "═══════════════════════════════════════";

/// Print the displayed results of `session`, or its status line if there are none.
pub fn print_results<C: Calculator>(session: &Session<C>, json: bool) {
    let Some(rendered) = session.rendered() else {
        if let Some(status) = session.status() {
            eprintln!("{}", status);
        }
        return;
    };

    if json {
        let value = json!({
            "calculator": C::REPORT_TITLE,
            "results": rendered.fields(),
            "outputs": &rendered.outputs,
            "note": &rendered.note,
            "completed_at": rendered.completed_at.to_rfc3339(),
        });
        match to_pretty_json(&value) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                error!(reason = %e.detail(), "failed to serialize results");
                print_error(&e, false);
            }
        }
        return;
    }

    println!("{}", RULE);
    println!("  {}", C::REPORT_TITLE.to_uppercase());
    println!("{}", RULE);
    print!("{}", format_fields(&rendered.fields()));
    if let Some(status) = session.status() {
        println!();
        println!("{}", status);
    }
}

/// Aligned `name: value` lines.
pub fn format_fields(fields: &[NamedValue]) -> String {
    let width = fields.iter().map(|f| f.name.chars().count()).max().unwrap_or(0);
    fields
        .iter()
        .map(|f| {
            let pad = width - f.name.chars().count();
            format!("  {}:{} {}\n", f.name, " ".repeat(pad), f.value)
        })
        .collect()
}

/// The chart as a two-column table.
pub fn format_chart(chart: &LineChart) -> String {
    let mut out = format!("\n{}\n", chart.title);
    out.push_str(&format!("  {:>10}  {:>12}\n", chart.x_label, chart.y_label));
    for (x, t) in chart.points() {
        out.push_str(&format!("  {:>10}  {:>12}\n", x, t));
    }
    out
}

/// Pretty JSON for `--json` output.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> ThermalResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| ThermalError::SerializationError {
        reason: e.to_string(),
    })
}

/// Follow-up line for errors the user can simply retry.
pub fn retry_hint(err: &ThermalError) -> Option<&'static str> {
    match err {
        ThermalError::Busy => Some("Wait for the current calculation, then submit again."),
        e if e.is_recoverable() => Some("The backend may be unavailable. Try again shortly."),
        _ => None,
    }
}

/// Print an error on stderr; with `json` the structured form follows.
pub fn print_error(err: &ThermalError, json: bool) {
    eprintln!("{}", err);
    if let Some(hint) = retry_hint(err) {
        eprintln!("{}", hint);
    }
    if json {
        match to_pretty_json(err) {
            Ok(text) => {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", text);
            }
            Err(e) => error!(reason = %e.detail(), "failed to serialize error"),
        }
    }
}
