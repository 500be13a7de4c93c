//! Score reporting boundary
//!
//! After every point the current score is offered to an external store,
//! tagged with the signed-in user. Delivery is fire-and-forget: a slow or
//! failing store never holds up or rolls back the match.

use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// The signed-in user, as supplied by the page's auth layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub uid: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Score document. The store adds its own timestamp on write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub user_id: String,
    pub user_name: Option<String>,
    /// Left paddle
    pub player_score: u32,
    /// Right paddle
    pub opponent_score: u32,
}

impl ScoreReport {
    pub fn new(identity: &Identity, player_score: u32, opponent_score: u32) -> Self {
        Self {
            user_id: identity.uid.clone(),
            user_name: identity.display_name.clone(),
            player_score,
            opponent_score,
        }
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Source of the current user; `None` means nobody is signed in
pub trait IdentityProvider {
    fn current_identity(&self) -> Option<Identity>;
}

/// Sink for score reports.
///
/// `submit` must return promptly: real delivery happens in the background
/// and reports its own failures. An `Err` here means the report was refused
/// up front.
pub trait ScoreReporter {
    fn submit(&self, report: ScoreReport) -> Result<(), ReportError>;
}

/// Nobody is ever signed in
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl IdentityProvider for Anonymous {
    fn current_identity(&self) -> Option<Identity> {
        None
    }
}

/// A fixed user (native demo, tests)
#[derive(Debug, Clone)]
pub struct StaticIdentity(pub Identity);

impl IdentityProvider for StaticIdentity {
    fn current_identity(&self) -> Option<Identity> {
        Some(self.0.clone())
    }
}

/// Writes reports to the log instead of a store
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ScoreReporter for LogReporter {
    fn submit(&self, report: ScoreReport) -> Result<(), ReportError> {
        log::info!("Score report: {}", report.to_json()?);
        Ok(())
    }
}

/// Report the current score if someone is signed in. Never fails: refusals
/// are logged and dropped, and nothing is retried.
pub fn dispatch(
    identity: &dyn IdentityProvider,
    reporter: &dyn ScoreReporter,
    player_score: u32,
    opponent_score: u32,
) -> bool {
    let Some(user) = identity.current_identity() else {
        log::debug!("No signed-in user, score not reported");
        return false;
    };
    let report = ScoreReport::new(&user, player_score, opponent_score);
    match reporter.submit(report) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Error saving score: {}", e);
            false
        }
    }
}
