use serde_json::Value;

/// Outcome of reading one status body in the `event:` / `data:` line protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum EventStreamStatus {
    Running,
    Complete(Vec<Value>),
    Error(Option<String>),
    Unparseable(String),
}

#[derive(Debug)]
struct Event<'a> {
    name: &'a str,
    data: Option<String>,
}

/// Parses a status body. The last event other than `heartbeat` decides the outcome.
pub fn parse_event_stream(body: &str) -> EventStreamStatus {
    let mut events: Vec<Event<'_>> = Vec::new();

    for (index, line) in body.lines().enumerate() {
        let line = line.trim_end();
        if line.trim().is_empty() || line.starts_with(':') {
            continue;
        }

        if let Some(name) = field_value(line, "event") {
            events.push(Event { name, data: None });
        } else if let Some(data) = field_value(line, "data") {
            if let Some(event) = events.last_mut() {
                match event.data.as_mut() {
                    Some(existing) => {
                        existing.push('\n');
                        existing.push_str(data);
                    }
                    None => event.data = Some(data.to_string()),
                }
            } else {
                events.push(Event {
                    name: "message",
                    data: Some(data.to_string()),
                });
            }
        } else if field_value(line, "id").is_some() || field_value(line, "retry").is_some() {
            continue;
        } else {
            return EventStreamStatus::Unparseable(format!(
                "unexpected line {}: {}",
                index + 1,
                truncate(line)
            ));
        }
    }

    let Some(last) = events.iter().rev().find(|e| e.name != "heartbeat") else {
        return EventStreamStatus::Running;
    };

    match last.name {
        "complete" => match last.data.as_deref() {
            Some(data) => match serde_json::from_str::<Vec<Value>>(data) {
                Ok(items) => EventStreamStatus::Complete(items),
                Err(e) => EventStreamStatus::Unparseable(format!(
                    "complete event data is not a JSON array: {}",
                    e
                )),
            },
            None => EventStreamStatus::Unparseable("complete event without data".to_string()),
        },
        "error" => EventStreamStatus::Error(last.data.as_deref().and_then(error_message)),
        _ => EventStreamStatus::Running,
    }
}

fn field_value<'a>(line: &'a str, field: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(field)?.strip_prefix(':')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest).trim_end())
}

fn error_message(data: &str) -> Option<String> {
    let data = data.trim();
    if data.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(data) {
        Ok(Value::Null) => None,
        Ok(Value::String(s)) => Some(s).filter(|s| !s.trim().is_empty()),
        Ok(Value::Object(map)) => ["message", "error", "detail"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .or_else(|| Some(Value::Object(map).to_string())),
        Ok(other) => Some(other.to_string()),
        Err(_) => Some(data.to_string()),
    }
}

fn truncate(line: &str) -> String {
    const MAX: usize = 80;
    match line.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &line[..idx]),
        None => line.to_string(),
    }
}
