//! Bindings to `globalThis.pongHost`, installed by the page's auth/database
//! script, and to LocalStorage.
//!
//! Expected host shape:
//! ```js
//! globalThis.pongHost = {
//!     currentUser: () => ({ uid, displayName }) | null,
//!     reportScore: (doc) => Promise<void>,
//! };
//! ```

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::error::{ReportError, SettingsError};
use crate::report::{Identity, IdentityProvider, ScoreReport, ScoreReporter};

#[wasm_bindgen(inline_js = "
    export function host_current_user() {
        const host = globalThis.pongHost;
        if (!host || typeof host.currentUser !== 'function') {
            return undefined;
        }
        const user = host.currentUser();
        if (!user || !user.uid) {
            return undefined;
        }
        return JSON.stringify({ uid: user.uid, displayName: user.displayName ?? null });
    }

    export function host_has_score_sink() {
        const host = globalThis.pongHost;
        return !!host && typeof host.reportScore === 'function';
    }

    export function host_report_score(payload) {
        return Promise.resolve(globalThis.pongHost.reportScore(JSON.parse(payload)));
    }
")]
extern "C" {
    fn host_current_user() -> Option<String>;
    fn host_has_score_sink() -> bool;
    #[wasm_bindgen(catch)]
    fn host_report_score(payload: &str) -> Result<js_sys::Promise, JsValue>;
}

/// Best-effort text for a thrown JS value
fn describe(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{:?}", value)
}

/// Reads the page's cached auth state on every call
#[derive(Debug, Clone, Copy, Default)]
pub struct JsIdentity;

impl IdentityProvider for JsIdentity {
    fn current_identity(&self) -> Option<Identity> {
        let json = host_current_user()?;
        match serde_json::from_str(&json) {
            Ok(identity) => Some(identity),
            Err(e) => {
                log::warn!("Unreadable user from host: {}", e);
                None
            }
        }
    }
}

/// Hands reports to `pongHost.reportScore` and awaits the result on a
/// spawned local task
#[derive(Debug, Clone, Copy, Default)]
pub struct JsScoreReporter;

impl ScoreReporter for JsScoreReporter {
    fn submit(&self, report: ScoreReport) -> Result<(), ReportError> {
        if !host_has_score_sink() {
            return Err(ReportError::NoHost);
        }
        let payload = report.to_json()?;
        let promise =
            host_report_score(&payload).map_err(|e| ReportError::Rejected(describe(&e)))?;

        wasm_bindgen_futures::spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(_) => log::info!(
                    "Score saved ({} - {})",
                    report.player_score,
                    report.opponent_score
                ),
                Err(e) => log::error!(
                    "Error saving score: {}",
                    ReportError::Rejected(describe(&e))
                ),
            }
        });
        Ok(())
    }
}

fn local_storage() -> Result<web_sys::Storage, SettingsError> {
    web_sys::window()
        .ok_or_else(|| SettingsError::Storage("no window".into()))?
        .local_storage()
        .map_err(|e| SettingsError::Storage(describe(&e)))?
        .ok_or_else(|| SettingsError::Storage("LocalStorage disabled".into()))
}

pub fn storage_get(key: &str) -> Result<Option<String>, SettingsError> {
    local_storage()?
        .get_item(key)
        .map_err(|e| SettingsError::Storage(describe(&e)))
}

pub fn storage_set(key: &str, value: &str) -> Result<(), SettingsError> {
    local_storage()?
        .set_item(key, value)
        .map_err(|e| SettingsError::Storage(describe(&e)))
}
