use quicklaunch_core::contract::{AppRecord, HostEvent};
use quicklaunch_core::host::{HostCall, RecordingHost};
use quicklaunch_core::model::{Entry, MatchSpan};
use quicklaunch_core::session::{Session, SessionOptions};
use quicklaunch_core::transport::{handle_event, handle_json, ErrorCode, TransportResponse};

fn session() -> Session<RecordingHost> {
    Session::start(
        RecordingHost::deterministic_fixture(),
        SessionOptions::default(),
    )
}

#[test]
fn query_event_returns_highlighted_rows() {
    let mut session = session();

    let response = handle_event(
        &mut session,
        HostEvent::QueryChanged {
            query: "cal".into(),
        },
    );

    match response {
        TransportResponse::Ok { view, effects } => {
            assert_eq!(view.query, "cal");
            assert_eq!(view.rows.len(), 2);
            assert_eq!(view.rows[0].name, "Calculator");
            assert_eq!(view.rows[0].spans, vec![MatchSpan::new(0, 3)]);
            assert_eq!(view.selected, Some(0));
            assert!(effects.is_empty());
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[test]
fn enter_event_reports_host_calls_once() {
    let mut session = session();
    handle_event(&mut session, HostEvent::ArrowDown);

    let response = handle_event(&mut session, HostEvent::Enter);
    match response {
        TransportResponse::Ok { effects, .. } => assert_eq!(
            effects,
            vec![
                HostCall::OpenApplication { path: "/b".into() },
                HostCall::HideWindow
            ]
        ),
        other => panic!("unexpected response: {other:?}"),
    }

    match handle_event(&mut session, HostEvent::ArrowUp) {
        TransportResponse::Ok { effects, view } => {
            assert!(effects.is_empty());
            assert_eq!(view.selected, Some(0));
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[test]
fn out_of_range_click_is_rejected_without_side_effects() {
    let mut session = session();

    let response = handle_event(&mut session, HostEvent::ResultClicked { index: 3 });

    match response {
        TransportResponse::Err { error } => assert_eq!(error.code, ErrorCode::InvalidRequest),
        other => panic!("unexpected response: {other:?}"),
    }
    assert!(session.host().calls().is_empty());
}

#[test]
fn json_round_trip_uses_tagged_wire_format() {
    let mut session = session();

    let raw = handle_json(
        &mut session,
        r#"{"kind":"query_changed","payload":{"query":"term"}}"#,
    );
    assert!(raw.contains("\"status\":\"ok\""));
    assert!(raw.contains("\"name\":\"Terminal\""));

    let raw = handle_json(&mut session, r#"{"kind":"enter"}"#);
    let parsed: TransportResponse = serde_json::from_str(&raw).unwrap();
    match parsed {
        TransportResponse::Ok { effects, .. } => {
            assert_eq!(effects[0], HostCall::OpenApplication { path: "/c".into() });
        }
        other => panic!("unexpected response: {other:?}"),
    }
    assert!(raw.contains("\"call\":\"open_application\""));
}

#[test]
fn json_handler_returns_invalid_json_error_code() {
    let mut session = session();

    let raw = handle_json(&mut session, "{not-json");
    let parsed: TransportResponse = serde_json::from_str(&raw).unwrap();

    match parsed {
        TransportResponse::Err { error } => assert_eq!(error.code, ErrorCode::InvalidJson),
        other => panic!("expected invalid json error, got {other:?}"),
    }
}

#[test]
fn unknown_event_kind_is_invalid_json() {
    let mut session = session();

    let raw = handle_json(&mut session, r#"{"kind":"teleport"}"#);

    assert!(raw.contains("\"code\":\"invalid_json\""));
}

#[test]
fn focus_and_catalog_events_reset_view() {
    let mut session = session();
    handle_event(
        &mut session,
        HostEvent::QueryChanged {
            query: "cal".into(),
        },
    );
    session
        .host_mut()
        .set_apps(vec![Entry::new("Music", "/music"), Entry::new("Maps", "/maps")]);

    match handle_event(&mut session, HostEvent::WindowFocused) {
        TransportResponse::Ok { view, .. } => {
            assert_eq!(view.query, "");
            assert_eq!(view.rows.len(), 3);
            assert_eq!(view.scroll_top, 0);
        }
        other => panic!("unexpected response: {other:?}"),
    }

    match handle_event(&mut session, HostEvent::CatalogChanged) {
        TransportResponse::Ok { view, .. } => {
            let names: Vec<&str> = view.rows.iter().map(|r| r.name.as_str()).collect();
            assert_eq!(names, vec!["Maps", "Music"]);
            assert_eq!(view.selected, Some(0));
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[test]
fn blur_event_hides_window() {
    let mut session = session();

    match handle_event(&mut session, HostEvent::WindowBlurred) {
        TransportResponse::Ok { effects, .. } => assert_eq!(effects, vec![HostCall::HideWindow]),
        other => panic!("unexpected response: {other:?}"),
    }
}

#[test]
fn app_record_converts_to_entry() {
    let record: AppRecord =
        serde_json::from_str(r#"{"name":"Safari","path":"/Applications/Safari.app"}"#).unwrap();
    let entry = Entry::from(record);
    assert_eq!(entry.name, "Safari");
    assert_eq!(entry.folded_name()[0], 's');
}
