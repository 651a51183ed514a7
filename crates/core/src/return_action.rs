//! Post-sign-in return actions.
//!
//! A return action is carried through the OAuth round trip as JSON in the
//! callback URL's `returnTo` query parameter and tells the client what to
//! do once the user is back.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReturnAction {
    /// Reopen the intake form where the user left off.
    #[serde(alias = "showForm")]
    ShowForm,
}

impl ReturnAction {
    /// JSON text for the `returnTo` parameter (not yet URL-encoded).
    pub fn to_param(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"type":"show_form"}"#.to_string())
    }

    /// Parse a decoded `returnTo` value.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        serde_json::from_str(raw)
            .map_err(|e| CoreError::Validation(format!("Invalid return action: {e}")))
    }
}
