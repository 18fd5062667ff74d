//! Friends list and chat connectivity.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Result;
use crate::gateway::{Gateway, Method};

pub const FRIENDS_PATH: &str = "/lol-chat/v1/friends";
pub const CHAT_SESSION_PATH: &str = "/chat/v1/session";
pub const CHAT_SUSPEND_PATH: &str = "/chat/v1/suspend";
pub const CHAT_RESUME_PATH: &str = "/chat/v1/resume";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct Friend {
    pid: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RemovalSummary {
    pub total: usize,
    pub removed: usize,
    pub failed: usize,
}

/// Delete every friend one by one. Individual failures are counted, not
/// returned; only failing to read the list is an error.
pub fn remove_all_friends(gateway: &dyn Gateway) -> Result<RemovalSummary> {
    let friends: Vec<Friend> = gateway
        .get(FRIENDS_PATH)?
        .expect_status(&[200], "fetch friends")?
        .decode(FRIENDS_PATH)?;

    let mut summary = RemovalSummary {
        total: friends.len(),
        ..Default::default()
    };
    for friend in friends.iter().filter(|f| !f.pid.is_empty()) {
        let path = format!("{FRIENDS_PATH}/{}", friend.pid);
        match gateway.request(Method::Delete, &path, None) {
            Ok(resp) if resp.status_in(&[200, 204]) => summary.removed += 1,
            Ok(resp) => {
                tracing::warn!(pid = %friend.pid, status = resp.status, "friend not removed");
                summary.failed += 1;
            }
            Err(e) => {
                tracing::warn!(pid = %friend.pid, error = %e, "friend not removed");
                summary.failed += 1;
            }
        }
    }
    summary.failed += friends.iter().filter(|f| f.pid.is_empty()).count();
    Ok(summary)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChatSession {
    state: String,
}

/// True when chat is suspended. Anything but a readable `disconnected` state
/// counts as connected.
pub fn chat_disconnected(gateway: &dyn Gateway) -> Result<bool> {
    let resp = gateway.get(CHAT_SESSION_PATH)?;
    if !resp.is_success() {
        return Ok(false);
    }
    let session: ChatSession = resp.decode(CHAT_SESSION_PATH)?;
    Ok(session.state == "disconnected")
}

pub fn disconnect_chat(gateway: &dyn Gateway) -> Result<()> {
    let body = json!({ "config": "disable" });
    gateway
        .request(Method::Post, CHAT_SUSPEND_PATH, Some(&body))?
        .expect_status(&[200, 204], "disconnect chat")?;
    tracing::info!("chat disconnected");
    Ok(())
}

pub fn reconnect_chat(gateway: &dyn Gateway) -> Result<()> {
    gateway
        .request(Method::Post, CHAT_RESUME_PATH, None)?
        .expect_status(&[200, 204], "reconnect chat")?;
    tracing::info!("chat reconnected");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedGateway;

    #[test]
    fn counts_removed_and_failed() {
        let gw = ScriptedGateway::new();
        gw.on(
            Method::Get,
            FRIENDS_PATH,
            200,
            r#"[{"pid":"a@pvp.net","name":"A"},{"pid":"b@pvp.net"},{"pid":"c@pvp.net"}]"#,
        );
        gw.on(Method::Delete, "/lol-chat/v1/friends/a@pvp.net", 204, "");
        gw.on(Method::Delete, "/lol-chat/v1/friends/b@pvp.net", 500, "");
        gw.unreachable(Method::Delete, "/lol-chat/v1/friends/c@pvp.net");

        let summary = remove_all_friends(gw.as_ref()).unwrap();
        assert_eq!(
            summary,
            RemovalSummary {
                total: 3,
                removed: 1,
                failed: 2
            }
        );
    }

    #[test]
    fn empty_list_is_fine() {
        let gw = ScriptedGateway::new();
        gw.on(Method::Get, FRIENDS_PATH, 200, "[]");
        assert_eq!(remove_all_friends(gw.as_ref()).unwrap(), RemovalSummary::default());
    }

    #[test]
    fn unreadable_list_is_an_error() {
        let gw = ScriptedGateway::new();
        gw.on(Method::Get, FRIENDS_PATH, 503, "");
        assert!(remove_all_friends(gw.as_ref()).is_err());
    }

    #[test]
    fn chat_state() {
        let gw = ScriptedGateway::new();
        gw.on(Method::Get, CHAT_SESSION_PATH, 200, r#"{"state":"disconnected"}"#);
        assert!(chat_disconnected(gw.as_ref()).unwrap());

        gw.reset(Method::Get, CHAT_SESSION_PATH);
        gw.on(Method::Get, CHAT_SESSION_PATH, 200, r#"{"state":"connected"}"#);
        assert!(!chat_disconnected(gw.as_ref()).unwrap());

        gw.reset(Method::Get, CHAT_SESSION_PATH);
        assert!(!chat_disconnected(gw.as_ref()).unwrap());
    }

    #[test]
    fn suspend_sends_disable_config() {
        let gw = ScriptedGateway::new();
        gw.on(Method::Post, CHAT_SUSPEND_PATH, 200, "");
        gw.on(Method::Post, CHAT_RESUME_PATH, 204, "");
        disconnect_chat(gw.as_ref()).unwrap();
        reconnect_chat(gw.as_ref()).unwrap();

        let calls = gw.calls();
        assert_eq!(calls[0].body, Some(json!({"config": "disable"})));
        assert_eq!(calls[1].body, None);
    }
}
