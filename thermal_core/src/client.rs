//! # Command Handlers
//!
//! [`CalcClient`] runs the two user commands every calculator page has:
//!
//! - [`calculate`](CalcClient::calculate) - validate, POST, render
//! - [`export`](CalcClient::export) - POST the report payload, save the PDF
//!
//! Both take the page's [`Session`] explicitly and leave it in a consistent,
//! usable state whatever happens. Nothing is retried.
//!
//! ## Example
//!
//! ```rust,no_run
//! use thermal_core::calculators::{Fin, FinForm};
//! use thermal_core::client::CalcClient;
//! use thermal_core::config::ThermalConfig;
//! use thermal_core::session::Session;
//! use thermal_core::transport::HttpTransport;
//! use std::path::Path;
//!
//! # async fn run() -> thermal_core::errors::ThermalResult<()> {
//! let config = ThermalConfig::default();
//! let client = CalcClient::new(HttpTransport::new(&config.server)?);
//! let mut session = Session::<Fin>::new();
//!
//! let form = FinForm {
//!     p: "0.1".into(), ac: "0.0005".into(), l: "0.05".into(), k: "200".into(),
//!     h_conv: "25".into(), t_base: "373.15".into(), t_inf: "298.15".into(),
//! };
//! client.calculate(&mut session, &form).await?;
//! let saved = client.export(&mut session, Path::new(".")).await?;
//! println!("saved {}", saved.display());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::calculators::Calculator;
use crate::download::save_report;
use crate::errors::{ThermalError, ThermalResult};
use crate::protocol::{decode_calculation, decode_report, EXPORT_PDF_ENDPOINT};
use crate::session::{Applied, Session};
use crate::transport::Transport;

/// Command handlers bound to one transport.
#[derive(Debug, Clone)]
pub struct CalcClient<T> {
    transport: T,
}

impl<T: Transport> CalcClient<T> {
    pub fn new(transport: T) -> Self {
        CalcClient { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Submit `form` for calculation.
    ///
    /// On `Ok` the session displays fresh results and export is available.
    /// On `Err` the session shows the error's text and export is not
    /// available. A local validation failure sends nothing.
    pub async fn calculate<C: Calculator>(&self, session: &mut Session<C>, form: &C::Form) -> ThermalResult<()> {
        let pending = session.begin(form)?;
        debug!(calculator = C::REPORT_TITLE, ticket = pending.ticket, body = %pending.body, "submitting");

        let outcome = match self.transport.post_json(C::ENDPOINT, &pending.body).await {
            Ok(reply) => decode_calculation::<C::Response>(&reply),
            Err(e) => Err(e),
        };

        match session.finish(pending.ticket, outcome)? {
            Applied::Rendered => Ok(()),
            // The session is borrowed for the whole request, so nothing can
            // have superseded it
            Applied::Stale => Err(ThermalError::Busy),
        }
    }

    /// Fetch the report PDF for the displayed results.
    pub async fn request_report<C: Calculator>(&self, session: &Session<C>) -> ThermalResult<Vec<u8>> {
        let report = session.report()?;
        let body = serde_json::to_value(&report).map_err(|e| ThermalError::SerializationError {
            reason: e.to_string(),
        })?;

        let reply = self
            .transport
            .post_json(EXPORT_PDF_ENDPOINT, &body)
            .await
            .map_err(|e| ThermalError::export(e.detail()))?;

        decode_report(reply)
    }

    /// Export the displayed results and save the PDF as
    /// `dir/<C::REPORT_FILENAME>`.
    ///
    /// Failures are shown on the session's status line; the displayed
    /// results and export availability are left as they were.
    pub async fn export<C: Calculator>(&self, session: &mut Session<C>, dir: &Path) -> ThermalResult<PathBuf> {
        let saved = match self.request_report(session).await {
            Ok(bytes) => save_report(&bytes, dir, C::REPORT_FILENAME),
            Err(e) => Err(e),
        };

        if let Err(e) = &saved {
            error!(calculator = C::REPORT_TITLE, error = %e, "PDF export failed");
            session.show_error(e);
        }
        saved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::{
        CompositeWall, ExchangerForm, Fin, FinForm, HeatExchanger, LayerForm, WallForm,
    };
    use crate::errors::FETCH_ERROR_MESSAGE;
    use crate::protocol::HttpReply;
    use crate::testing::FakeTransport;
    use serde_json::json;
    use std::env::temp_dir;
    use std::fs;

    fn fin_form() -> FinForm {
        FinForm {
            p: "0.1".to_string(),
            ac: "0.0005".to_string(),
            l: "0.05".to_string(),
            k: "200".to_string(),
            h_conv: "25".to_string(),
            t_base: "373.15".to_string(),
            t_inf: "298.15".to_string(),
        }
    }

    fn fin_reply() -> HttpReply {
        HttpReply::json(
            200,
            &json!({
                "heat_transfer_rate": 8.951234,
                "fin_efficiency": 0.955,
                "x_coords": [0.0, 0.025, 0.05],
                "temp_dist": [373.15, 366.2, 364.0]
            }),
        )
    }

    fn wall_form() -> WallForm {
        WallForm {
            t_inner: "300".to_string(),
            t_outer: "290".to_string(),
            layers: vec![LayerForm::new("0.1", "0.04", "1")].into_iter().collect(),
        }
    }

    #[tokio::test]
    async fn test_calculate_posts_and_renders() {
        let client = CalcClient::new(FakeTransport::with_replies(vec![Ok(fin_reply())]));
        let mut session = Session::<Fin>::new();

        client.calculate(&mut session, &fin_form()).await.unwrap();

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "/calculate_fin");
        assert_eq!(requests[0].1["T_base"], json!(373.15));

        let outputs = &session.rendered().unwrap().outputs;
        assert_eq!(outputs.heat_transfer_rate, "8.9512");
        assert_eq!(outputs.fin_efficiency, "0.9550");
        assert_eq!(outputs.chart.labels, vec!["0.000", "0.025", "0.050"]);
        assert!(session.export_available());
    }

    #[tokio::test]
    async fn test_invalid_form_sends_nothing() {
        let client = CalcClient::new(FakeTransport::new());
        let mut session = Session::<Fin>::new();
        let mut form = fin_form();
        form.k = "".to_string();

        let err = client.calculate(&mut session, &form).await.unwrap_err();
        assert_eq!(err.to_string(), "All input fields must be filled with valid numbers. Error with: k");
        assert!(client.transport().requests().is_empty());
        assert!(!session.export_available());
    }

    #[tokio::test]
    async fn test_blank_exchanger_field_sends_nothing() {
        let client = CalcClient::new(FakeTransport::new());
        let mut session = Session::<HeatExchanger>::new();

        let err = client
            .calculate(&mut session, &ExchangerForm::default())
            .await
            .unwrap_err();
        assert!(err.to_string().ends_with("Error with: m_dot_hot"));
        assert!(client.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_server_error_verbatim() {
        let reply = HttpReply::json(500, &json!({"error": "bad input"}));
        let client = CalcClient::new(FakeTransport::with_replies(vec![Ok(reply)]));
        let mut session = Session::<CompositeWall>::new();

        let err = client.calculate(&mut session, &wall_form()).await.unwrap_err();
        assert_eq!(err.to_string(), "Error: bad input");
        assert_eq!(session.status(), Some("Error: bad input"));
        assert!(!session.export_available());
    }

    #[tokio::test]
    async fn test_network_failure_reported_generically() {
        let client = CalcClient::new(FakeTransport::with_replies(vec![Err(ThermalError::transport(
            "connection refused",
        ))]));
        let mut session = Session::<CompositeWall>::new();

        let err = client.calculate(&mut session, &wall_form()).await.unwrap_err();
        assert_eq!(err.detail(), "connection refused");
        assert_eq!(session.status(), Some(FETCH_ERROR_MESSAGE));
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_wall_round_trip_formatting() {
        let reply = HttpReply::json(
            200,
            &json!({"total_resistance": 2.5, "heat_flux": 100.0, "individual_resistances": [2.5]}),
        );
        let client = CalcClient::new(FakeTransport::with_replies(vec![Ok(reply)]));
        let mut session = Session::<CompositeWall>::new();

        client.calculate(&mut session, &wall_form()).await.unwrap();
        let fields = session.result_fields();
        assert_eq!(fields[0].value, "2.5000");
        assert_eq!(fields[1].value, "100.0000");
    }

    #[tokio::test]
    async fn test_export_visibility_over_cycles() {
        let client = CalcClient::new(FakeTransport::with_replies(vec![
            Ok(fin_reply()),
            Ok(HttpReply::json(400, &json!({"error": "Perimeter 'P' must be positive."}))),
            Ok(fin_reply()),
        ]));
        let mut session = Session::<Fin>::new();
        assert!(!session.export_available());

        client.calculate(&mut session, &fin_form()).await.unwrap();
        assert!(session.export_available());

        client.calculate(&mut session, &fin_form()).await.unwrap_err();
        assert!(!session.export_available());

        client.calculate(&mut session, &fin_form()).await.unwrap();
        assert!(session.export_available());
    }

    #[tokio::test]
    async fn test_export_requires_results() {
        let client = CalcClient::new(FakeTransport::new());
        let mut session = Session::<Fin>::new();

        let err = client.export(&mut session, &temp_dir()).await.unwrap_err();
        assert_eq!(err, ThermalError::NoResults);
        assert!(client.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_export_saves_fixed_filename() {
        let dir = temp_dir().join("thermalsim_test_client_export");
        let client = CalcClient::new(FakeTransport::with_replies(vec![
            Ok(fin_reply()),
            Ok(HttpReply::new(200, b"%PDF-1.4 fin".to_vec())),
        ]));
        let mut session = Session::<Fin>::new();
        client.calculate(&mut session, &fin_form()).await.unwrap();

        let path = client.export(&mut session, &dir).await.unwrap();
        assert_eq!(path.file_name().unwrap(), "fin_calculator_report.pdf");
        assert_eq!(fs::read(&path).unwrap(), b"%PDF-1.4 fin");

        let requests = client.transport().requests();
        assert_eq!(requests[1].0, "/export_pdf");
        assert_eq!(requests[1].1["calculator_name"], json!("Fin Calculator Report"));
        assert_eq!(
            requests[1].1["outputs"],
            json!([
                {"name": "Heat Transfer Rate (q_f) [W]", "value": "8.9512"},
                {"name": "Fin Efficiency (η_f)", "value": "0.9550"}
            ])
        );

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_export_filenames_per_calculator() {
        let dir = temp_dir().join("thermalsim_test_client_filenames");

        let wall_reply = HttpReply::json(
            200,
            &json!({"total_resistance": 2.5, "heat_flux": 100.0, "individual_resistances": [2.5]}),
        );
        let client = CalcClient::new(FakeTransport::with_replies(vec![
            Ok(wall_reply),
            Ok(HttpReply::new(200, b"%PDF-1.4 wall".to_vec())),
        ]));
        let mut session = Session::<CompositeWall>::new();
        client.calculate(&mut session, &wall_form()).await.unwrap();
        let path = client.export(&mut session, &dir).await.unwrap();
        assert_eq!(path.file_name().unwrap(), "composite_wall_report.pdf");
        assert_eq!(fs::read(&path).unwrap(), b"%PDF-1.4 wall");

        let exchanger_reply = HttpReply::json(
            200,
            &json!({
                "NTU": 0.95, "effectiveness": 0.55, "q_actual": 86410.0,
                "T_out_hot": 321.8, "T_out_cold": 313.99
            }),
        );
        let client = CalcClient::new(FakeTransport::with_replies(vec![
            Ok(exchanger_reply),
            Ok(HttpReply::new(200, b"%PDF-1.4 hx".to_vec())),
        ]));
        let form = ExchangerForm {
            m_dot_hot: "0.5".to_string(),
            cp_hot: "4180".to_string(),
            t_in_hot: "363.15".to_string(),
            m_dot_cold: "0.8".to_string(),
            cp_cold: "4180".to_string(),
            t_in_cold: "288.15".to_string(),
            ua: "2000".to_string(),
            flow_type: "counterflow".to_string(),
        };
        let mut session = Session::<HeatExchanger>::new();
        client.calculate(&mut session, &form).await.unwrap();
        let path = client.export(&mut session, &dir).await.unwrap();
        assert_eq!(path.file_name().unwrap(), "heat_exchanger_report.pdf");
        assert_eq!(fs::read(&path).unwrap(), b"%PDF-1.4 hx");
        assert_eq!(
            client.transport().requests()[1].1["calculator_name"],
            json!("Heat Exchanger Performance Report")
        );

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_export_failure_keeps_results() {
        let client = CalcClient::new(FakeTransport::with_replies(vec![
            Ok(fin_reply()),
            Ok(HttpReply::json(500, &json!({"error": "An error occurred during PDF generation: boom"}))),
        ]));
        let mut session = Session::<Fin>::new();
        client.calculate(&mut session, &fin_form()).await.unwrap();

        let err = client.export(&mut session, &temp_dir()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "PDF Export Error: An error occurred during PDF generation: boom"
        );
        assert_eq!(session.status(), Some(err.to_string().as_str()));
        assert!(session.export_available());
    }

    #[tokio::test]
    async fn test_export_transport_failure() {
        let client = CalcClient::new(FakeTransport::with_replies(vec![
            Ok(fin_reply()),
            Err(ThermalError::transport("timed out")),
        ]));
        let mut session = Session::<Fin>::new();
        client.calculate(&mut session, &fin_form()).await.unwrap();

        let err = client.export(&mut session, &temp_dir()).await.unwrap_err();
        assert_eq!(err.to_string(), "PDF Export Error: timed out");
    }
}
