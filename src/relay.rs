// Form/action relay: turns form input into webhook calls and webhook
// replies into something the UI can show. Holds the per-session state
// (last patient name, fetched slots).

use crate::api::{Webhook, WebhookReply};
use crate::config::{Config, Endpoints};
use crate::models::{ConfirmStyle, GlucoseSubmission, ReadingError, Slot, SlotSelection};
use crate::slots::normalize_slots;
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};

/// Which webhook a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Analysis,
    Slots,
    Confirm,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Endpoint::Analysis => "analysis agent",
            Endpoint::Slots => "availability agent",
            Endpoint::Confirm => "booking agent",
        };
        f.write_str(name)
    }
}

/// Failure of a single relay operation. The `Display` output is one line
/// and is shown to the user as is.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid input: {0}")]
    Invalid(#[from] ReadingError),
    #[error("{endpoint} answered with HTTP {status}")]
    Status { endpoint: Endpoint, status: u16 },
    #[error("{endpoint} is offline: {reason}")]
    Connection { endpoint: Endpoint, reason: String },
    #[error("{endpoint} sent an unreadable reply: {reason}")]
    Malformed { endpoint: Endpoint, reason: String },
}

impl RelayError {
    fn connection(endpoint: Endpoint, err: anyhow::Error) -> Self {
        RelayError::Connection {
            endpoint,
            reason: one_line(&format!("{err:#}")),
        }
    }

    fn malformed(endpoint: Endpoint, reason: impl fmt::Display) -> Self {
        RelayError::Malformed {
            endpoint,
            reason: one_line(&reason.to_string()),
        }
    }
}

fn one_line(text: &str) -> String {
    text.lines().next().unwrap_or_default().trim().to_string()
}

/// What the analysis workflow decided about a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// The workflow answered the literal `true`.
    RiskDetected,
    /// Anything else, shown verbatim.
    Info(String),
}

impl AnalysisOutcome {
    pub fn from_body(body: &str) -> Self {
        if body.trim().eq_ignore_ascii_case("true") {
            AnalysisOutcome::RiskDetected
        } else {
            AnalysisOutcome::Info(body.to_string())
        }
    }
}

/// Transient per-session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub patient_name: String,
    pub slots: Vec<Slot>,
}

pub struct Relay<W: Webhook> {
    webhook: W,
    endpoints: Endpoints,
    confirm_style: ConfirmStyle,
    session: Session,
}

impl<W: Webhook> Relay<W> {
    pub fn new(webhook: W, config: &Config) -> Self {
        Relay {
            webhook,
            endpoints: config.endpoints.clone(),
            confirm_style: config.confirm_style,
            session: Session {
                patient_name: config.default_patient.clone(),
                slots: Vec::new(),
            },
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.session.slots
    }

    pub fn patient_name(&self) -> &str {
        &self.session.patient_name
    }

    /// Validate the two form readings and send them for analysis.
    pub fn submit_readings(
        &mut self,
        patient_name: &str,
        pre_meal: u16,
        post_meal: u16,
        notes: &str,
    ) -> Result<AnalysisOutcome, RelayError> {
        let submission =
            GlucoseSubmission::pre_and_post_meal(patient_name, pre_meal, post_meal, notes)?;
        self.submit(&submission)
    }

    /// Send a prebuilt submission. Single attempt.
    ///
    /// The session patient name is taken from the submission before the
    /// request goes out, so a failed submission still changes the name
    /// later bookings use (the form field stays filled in either way).
    pub fn submit(
        &mut self,
        submission: &GlucoseSubmission,
    ) -> Result<AnalysisOutcome, RelayError> {
        let endpoint = Endpoint::Analysis;
        self.session.patient_name = submission.patient_name.clone();

        let body =
            serde_json::to_value(submission).map_err(|e| RelayError::malformed(endpoint, e))?;
        let reply = self
            .webhook
            .post_json(&self.endpoints.analysis, &body)
            .map_err(|e| RelayError::connection(endpoint, e))?;
        let reply = expect_ok(endpoint, reply)?;

        let outcome = AnalysisOutcome::from_body(&reply.body);
        match &outcome {
            AnalysisOutcome::RiskDetected => warn!("analysis workflow flagged a risk"),
            AnalysisOutcome::Info(_) => info!("analysis workflow replied"),
        }
        Ok(outcome)
    }

    /// Fetch the slot list and replace the session copy. On any failure
    /// the previous list is kept.
    pub fn fetch_slots(&mut self) -> Result<&[Slot], RelayError> {
        let endpoint = Endpoint::Slots;
        let reply = self
            .webhook
            .get(&self.endpoints.slots)
            .map_err(|e| RelayError::connection(endpoint, e))?;
        let reply = expect_ok(endpoint, reply)?;

        let value: Value =
            serde_json::from_str(&reply.body).map_err(|e| RelayError::malformed(endpoint, e))?;
        let slots = normalize_slots(&value).map_err(|e| RelayError::malformed(endpoint, e))?;

        info!(count = slots.len(), "fetched appointment slots");
        self.session.slots = slots;
        Ok(&self.session.slots)
    }

    /// Book the selected slot. Returns the confirmation text and clears
    /// the slot list on success.
    pub fn confirm_slot(&mut self, selection: &SlotSelection) -> Result<String, RelayError> {
        let endpoint = Endpoint::Confirm;
        let body = selection.to_payload(self.confirm_style);
        let reply = self
            .webhook
            .post_json(&self.endpoints.confirm, &body)
            .map_err(|e| RelayError::connection(endpoint, e))?;
        let reply = expect_ok(endpoint, reply)?;

        info!(slot = %selection.slot.label, "appointment confirmed");
        self.session.slots.clear();
        Ok(reply.body)
    }

    /// Book the slot at `index` in the fetched list for the session patient.
    pub fn confirm_fetched(&mut self, index: usize) -> Option<Result<String, RelayError>> {
        let slot = self.session.slots.get(index)?.clone();
        let selection = SlotSelection::new(slot, &self.session.patient_name);
        Some(self.confirm_slot(&selection))
    }
}

fn expect_ok(endpoint: Endpoint, reply: WebhookReply) -> Result<WebhookReply, RelayError> {
    if reply.is_ok() {
        Ok(reply)
    } else {
        warn!(%endpoint, status = reply.status, "webhook returned an error status");
        Err(RelayError::Status {
            endpoint,
            status: reply.status,
        })
    }
}
