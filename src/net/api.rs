//! Game API request shapes
//!
//! | Call | Method | Path | Body |
//! |---|---|---|---|
//! | `Fetch` | GET | `/game/{id}` | - |
//! | `Reveal` | POST | `/game/{id}/reveal` | `x=..&y=..` |
//! | `ToggleFlag` | POST | `/game/{id}/flag` | `x=..&y=..` |
//! | `AdvanceTime` | POST | `/game/{id}/time` | `seconds=..` |
//! | `Reset` | POST | `/game/{id}/reset` | - |

use super::error::SyncError;
use crate::sim::GameSnapshot;

/// Form-encoded request bodies
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// One server operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiCall {
    Fetch,
    Reveal { x: u32, y: u32 },
    ToggleFlag { x: u32, y: u32 },
    AdvanceTime { seconds: u32 },
    Reset,
}

impl ApiCall {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            ApiCall::Fetch => "fetch",
            ApiCall::Reveal { .. } => "reveal",
            ApiCall::ToggleFlag { .. } => "flag",
            ApiCall::AdvanceTime { .. } => "time",
            ApiCall::Reset => "reset",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            ApiCall::Fetch => Method::Get,
            _ => Method::Post,
        }
    }

    /// Request path relative to the API base
    pub fn path(&self, game_id: &str) -> String {
        match self {
            ApiCall::Fetch => format!("/game/{}", game_id),
            _ => format!("/game/{}/{}", game_id, self.name()),
        }
    }

    /// Form body, if the call sends one
    pub fn body(&self) -> Option<String> {
        match self {
            ApiCall::Reveal { x, y } | ApiCall::ToggleFlag { x, y } => {
                Some(format!("x={}&y={}", x, y))
            }
            ApiCall::AdvanceTime { seconds } => Some(format!("seconds={}", seconds)),
            ApiCall::Fetch | ApiCall::Reset => None,
        }
    }
}

/// Turn an HTTP reply into a snapshot
pub fn decode_reply(status: u16, body: &str) -> Result<GameSnapshot, SyncError> {
    if !(200..300).contains(&status) {
        return Err(SyncError::Status {
            status,
            body: body.to_string(),
        });
    }
    Ok(GameSnapshot::from_json(body)?)
}
