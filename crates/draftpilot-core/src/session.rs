use std::sync::Arc;

use serde_json::json;

use crate::error::Result;
use crate::gateway::{Gateway, GatewayResponse, Method};
use crate::snapshot::{ActionId, ChampionId, SessionSnapshot};

pub const SESSION_PATH: &str = "/lol-champ-select/v1/session";

/// Body marker the client returns when there is no champion select.
const NOT_IN_SESSION_MARKER: &str = "RPC_ERROR";

pub fn action_path(id: ActionId) -> String {
    format!("{SESSION_PATH}/actions/{id}")
}

/// Reads the current champion select and submits hovers and lock-ins.
pub struct ChampSelect {
    gateway: Arc<dyn Gateway>,
}

impl ChampSelect {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// `Ok(None)` when there is no session to read: the client is
    /// unreachable, answered with an error status, or says no session exists.
    /// A success body that does not decode is an `Err`.
    pub fn fetch(&self) -> Result<Option<SessionSnapshot>> {
        let resp = match self.gateway.get(SESSION_PATH) {
            Ok(resp) => resp,
            Err(e) => {
                tracing::debug!(error = %e, "session unavailable");
                return Ok(None);
            }
        };
        if !resp.is_success() || resp.text.contains(NOT_IN_SESSION_MARKER) {
            return Ok(None);
        }
        resp.decode(SESSION_PATH).map(Some)
    }

    /// Show `champion` on the action without locking it in.
    pub fn hover(&self, action: ActionId, champion: ChampionId) -> Result<GatewayResponse> {
        let body = json!({ "championId": champion, "completed": false });
        self.gateway
            .request(Method::Patch, &action_path(action), Some(&body))
    }

    /// Lock in (or ban) `champion` on the action.
    pub fn complete(&self, action: ActionId, champion: ChampionId) -> Result<GatewayResponse> {
        let body = json!({ "completed": true, "championId": champion });
        self.gateway
            .request(Method::Patch, &action_path(action), Some(&body))
    }
}
