use serde_json::json;
use stemforge::infrastructure::compute::{EventStreamStatus, parse_event_stream};

#[test]
fn given_generating_events_when_parsing_then_running() {
    let body = "event: generating\ndata: [null]\n\nevent: heartbeat\ndata: null\n\n";

    assert_eq!(parse_event_stream(body), EventStreamStatus::Running);
}

#[test]
fn given_empty_body_when_parsing_then_running() {
    assert_eq!(parse_event_stream(""), EventStreamStatus::Running);
    assert_eq!(parse_event_stream(": keep-alive\n\n"), EventStreamStatus::Running);
}

#[test]
fn given_complete_event_when_parsing_then_data_items_returned() {
    let body = concat!(
        "event: generating\n",
        "data: [null]\n\n",
        "event: complete\n",
        "data: [{\"path\": \"/tmp/out.wav\", \"url\": null}, \"/tmp/b.wav\"]\n\n",
    );

    assert_eq!(
        parse_event_stream(body),
        EventStreamStatus::Complete(vec![
            json!({"path": "/tmp/out.wav", "url": null}),
            json!("/tmp/b.wav"),
        ])
    );
}

#[test]
fn given_heartbeat_after_complete_when_parsing_then_still_complete() {
    let body = "event: complete\ndata: [\"a.wav\"]\n\nevent: heartbeat\ndata: null\n\n";

    assert_eq!(
        parse_event_stream(body),
        EventStreamStatus::Complete(vec![json!("a.wav")])
    );
}

#[test]
fn given_multiline_data_when_parsing_then_lines_joined() {
    let body = "event: complete\ndata: [\"a.wav\",\ndata:  \"b.wav\"]\n\n";

    assert_eq!(
        parse_event_stream(body),
        EventStreamStatus::Complete(vec![json!("a.wav"), json!("b.wav")])
    );
}

#[test]
fn given_error_event_with_null_data_when_parsing_then_error_without_message() {
    let body = "event: error\ndata: null\n\n";

    assert_eq!(parse_event_stream(body), EventStreamStatus::Error(None));
}

#[test]
fn given_error_event_with_text_when_parsing_then_message_kept() {
    assert_eq!(
        parse_event_stream("event: error\ndata: \"GPU quota exceeded\"\n"),
        EventStreamStatus::Error(Some("GPU quota exceeded".to_string()))
    );
    assert_eq!(
        parse_event_stream("event: error\ndata: {\"message\": \"bad audio\"}\n"),
        EventStreamStatus::Error(Some("bad audio".to_string()))
    );
    assert_eq!(
        parse_event_stream("event: error\ndata: worker crashed\n"),
        EventStreamStatus::Error(Some("worker crashed".to_string()))
    );
}

#[test]
fn given_html_error_page_when_parsing_then_unparseable() {
    let body = "<html><body>502 Bad Gateway</body></html>";

    assert!(matches!(
        parse_event_stream(body),
        EventStreamStatus::Unparseable(reason) if reason.contains("line 1")
    ));
}

#[test]
fn given_complete_without_array_when_parsing_then_unparseable() {
    assert!(matches!(
        parse_event_stream("event: complete\ndata: {\"oops\": true}\n"),
        EventStreamStatus::Unparseable(_)
    ));
    assert!(matches!(
        parse_event_stream("event: complete\n\n"),
        EventStreamStatus::Unparseable(_)
    ));
}

#[test]
fn given_word_complete_inside_running_data_when_parsing_then_not_treated_as_complete() {
    let body = "event: generating\ndata: [\"event: complete is coming\"]\n\n";

    assert_eq!(parse_event_stream(body), EventStreamStatus::Running);
}
