use serde::{Deserialize, Serialize};

use crate::contract::{HostEvent, ViewState};
use crate::host::{CallLog, HostCall, LauncherHost};
use crate::session::Session;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidJson,
    InvalidRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransportResponse {
    Ok {
        view: ViewState,
        effects: Vec<HostCall>,
    },
    Err {
        error: ErrorResponse,
    },
}

pub fn handle_event<H>(session: &mut Session<H>, event: HostEvent) -> TransportResponse
where
    H: LauncherHost + CallLog,
{
    if let HostEvent::ResultClicked { index } = event {
        let len = session.results().len();
        if index >= len {
            return TransportResponse::Err {
                error: ErrorResponse {
                    code: ErrorCode::InvalidRequest,
                    message: format!("result index out of range: {index} (len={len})"),
                },
            };
        }
    }

    dispatch(session, event);
    TransportResponse::Ok {
        view: ViewState::capture(session),
        effects: session.host_mut().drain_calls(),
    }
}

pub fn handle_json<H>(session: &mut Session<H>, payload: &str) -> String
where
    H: LauncherHost + CallLog,
{
    let response = match serde_json::from_str::<HostEvent>(payload) {
        Ok(event) => handle_event(session, event),
        Err(error) => TransportResponse::Err {
            error: ErrorResponse {
                code: ErrorCode::InvalidJson,
                message: error.to_string(),
            },
        },
    };

    serde_json::to_string(&response).unwrap_or_else(|error| {
        tracing::error!(%error, "failed to encode transport response");
        r#"{"status":"err","error":{"code":"invalid_request","message":"response encoding failed"}}"#
            .to_string()
    })
}

fn dispatch<H: LauncherHost>(session: &mut Session<H>, event: HostEvent) {
    match event {
        HostEvent::QueryChanged { query } => session.set_query(&query),
        HostEvent::ArrowDown => session.on_arrow_down(),
        HostEvent::ArrowUp => session.on_arrow_up(),
        HostEvent::Enter => {
            session.on_enter();
        }
        HostEvent::Escape => session.on_escape(),
        HostEvent::ResultClicked { index } => {
            session.on_result_clicked(index);
        }
        HostEvent::WindowFocused => session.on_window_focus(),
        HostEvent::WindowBlurred => session.on_window_blur(),
        HostEvent::CatalogChanged => session.on_catalog_notification(),
    }
}
