//! # Calculator Sessions
//!
//! A [`Session`] is the view model of one calculator page: what the result
//! fields show, the status line, whether export is available, and whether a
//! request is outstanding.
//!
//! ## State Machine
//!
//! ```text
//! idle ──begin──► validating ──reject──► idle
//!                     │
//!                     └──► requesting ──finish(err)──► idle
//!                              │
//!                              └──finish(ok)──► rendered (idle, export available)
//! ```
//!
//! Validation happens inside [`Session::begin`], so the validating state is
//! never observable from outside. While a request is outstanding, `begin`
//! refuses with [`ThermalError::Busy`]. Each request carries a ticket and
//! [`Session::finish`] ignores a reply whose ticket is no longer current.
//!
//! ## Example
//!
//! ```rust
//! use thermal_core::calculators::{Fin, FinForm};
//! use thermal_core::session::Session;
//!
//! let mut session = Session::<Fin>::new();
//! let err = session.begin(&FinForm::default()).unwrap_err();
//! assert_eq!(err.to_string(), "All input fields must be filled with valid numbers. Error with: P");
//! assert_eq!(session.status(), Some(err.to_string().as_str()));
//! assert!(!session.export_available());
//! ```

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::calculators::Calculator;
use crate::errors::{ThermalError, ThermalResult};
use crate::protocol::Decoded;
use crate::report::{NamedValue, ReportRequest};

/// Where the page is in its submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Requesting { ticket: u64 },
}

/// Outcome of applying a reply with [`Session::finish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The reply was current and its results are now displayed
    Rendered,
    /// The reply belonged to an abandoned request and was dropped
    Stale,
}

/// A validated submission waiting for its reply.
#[derive(Debug, Clone)]
pub struct Pending<C: Calculator> {
    pub ticket: u64,
    pub input: C::Input,
    /// Serialized request body
    pub body: Value,
}

/// The most recent successful calculation.
#[derive(Debug, Clone)]
pub struct Rendered<C: Calculator> {
    pub input: C::Input,
    pub outputs: C::Outputs,
    /// Advisory note from the backend, if any
    pub note: Option<String>,
    pub completed_at: DateTime<Utc>,
}

impl<C: Calculator> Rendered<C> {
    pub fn fields(&self) -> Vec<NamedValue> {
        C::result_fields(&self.outputs)
    }

    /// The report payload for this calculation.
    pub fn report(&self) -> ReportRequest {
        ReportRequest {
            calculator_name: C::REPORT_TITLE.to_string(),
            inputs: C::report_inputs(&self.input),
            outputs: C::report_outputs(&self.outputs),
            notes: C::REPORT_NOTES.to_string(),
        }
    }
}

/// Per-page view model.
#[derive(Debug, Clone)]
pub struct Session<C: Calculator> {
    phase: Phase,
    last_ticket: u64,
    /// Pending input, kept until its reply is applied
    in_flight: Option<C::Input>,
    rendered: Option<Rendered<C>>,
    status: Option<String>,
}

impl<C: Calculator> Default for Session<C> {
    fn default() -> Self {
        Session {
            phase: Phase::Idle,
            last_ticket: 0,
            in_flight: None,
            rendered: None,
            status: None,
        }
    }
}

impl<C: Calculator> Session<C> {
    pub fn new() -> Self {
        Session::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Requesting { .. })
    }

    pub fn rendered(&self) -> Option<&Rendered<C>> {
        self.rendered.as_ref()
    }

    /// The status line: an error, an advisory note, or nothing.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Export is offered only while a successful result is displayed.
    pub fn export_available(&self) -> bool {
        self.rendered.is_some()
    }

    /// Result fields as currently displayed.
    pub fn result_fields(&self) -> Vec<NamedValue> {
        match &self.rendered {
            Some(rendered) => rendered.fields(),
            None => C::placeholder_fields(),
        }
    }

    /// Start a submit cycle.
    ///
    /// Clears the previous results, then validates `form`. On success the
    /// session moves to requesting and the caller must send `body` and hand
    /// the reply to [`finish`](Self::finish) with the returned ticket.
    pub fn begin(&mut self, form: &C::Form) -> ThermalResult<Pending<C>> {
        if let Phase::Requesting { ticket } = self.phase {
            warn!(calculator = C::REPORT_TITLE, ticket, "submit ignored, request outstanding");
            return Err(ThermalError::Busy);
        }

        self.rendered = None;
        self.status = None;

        let input = match C::validate(form) {
            Ok(input) => input,
            Err(e) => {
                warn!(calculator = C::REPORT_TITLE, error = %e, "submission rejected");
                self.status = Some(e.to_string());
                return Err(e);
            }
        };

        let body = serde_json::to_value(&input).map_err(|e| ThermalError::SerializationError {
            reason: e.to_string(),
        })?;

        self.last_ticket += 1;
        let ticket = self.last_ticket;
        self.phase = Phase::Requesting { ticket };
        self.in_flight = Some(input.clone());

        Ok(Pending { ticket, input, body })
    }

    /// Apply the reply for `ticket`.
    ///
    /// Returns `Ok(Applied::Stale)` without touching anything if `ticket` is
    /// not the outstanding request. Otherwise the session returns to idle
    /// and either displays the results or the error.
    pub fn finish(
        &mut self,
        ticket: u64,
        outcome: ThermalResult<Decoded<C::Response>>,
    ) -> ThermalResult<Applied> {
        if self.phase != (Phase::Requesting { ticket }) {
            warn!(calculator = C::REPORT_TITLE, ticket, "dropping stale reply");
            return Ok(Applied::Stale);
        }

        self.phase = Phase::Idle;
        let input = self.in_flight.take();

        let rendered = outcome.and_then(|decoded| {
            let outputs = C::render(decoded.response)?;
            let input = input.ok_or_else(|| ThermalError::malformed("reply without a pending request"))?;
            Ok(Rendered {
                input,
                outputs,
                note: decoded.advisory,
                completed_at: Utc::now(),
            })
        });

        match rendered {
            Ok(rendered) => {
                if let Some(note) = &rendered.note {
                    warn!(calculator = C::REPORT_TITLE, note = %note, "backend advisory");
                }
                info!(calculator = C::REPORT_TITLE, ticket, "results rendered");
                self.status = rendered.note.as_ref().map(|note| format!("Note: {}", note));
                self.rendered = Some(rendered);
                Ok(Applied::Rendered)
            }
            Err(e) => {
                match &e {
                    ThermalError::Transport { .. } | ThermalError::MalformedResponse { .. } => {
                        error!(calculator = C::REPORT_TITLE, ticket, reason = %e.detail(), "fetch error");
                    }
                    _ => warn!(calculator = C::REPORT_TITLE, ticket, error = %e, "calculation failed"),
                }
                self.rendered = None;
                self.status = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Abandon the outstanding request, if any. A late reply for it will be
    /// dropped as stale. Returns whether a request was abandoned.
    pub fn cancel(&mut self) -> bool {
        if let Phase::Requesting { ticket } = self.phase {
            info!(calculator = C::REPORT_TITLE, ticket, "request abandoned");
            self.phase = Phase::Idle;
            self.in_flight = None;
            return true;
        }
        false
    }

    /// The report payload for the displayed results.
    pub fn report(&self) -> ThermalResult<ReportRequest> {
        self.rendered
            .as_ref()
            .map(Rendered::report)
            .ok_or(ThermalError::NoResults)
    }

    /// Show an export failure without touching the displayed results.
    pub fn show_error(&mut self, err: &ThermalError) {
        self.status = Some(err.to_string());
    }
}
