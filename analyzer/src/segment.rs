use transcript_types::{EventLog, Session};

/// Partition an event log into sessions at `launch` boundaries.
///
/// Every event lands in exactly one session, in server order. A launch
/// event closes the open chunk (if any) and opens the next one, so a
/// launch at the very head of the log never produces an empty leading
/// session. Ordinals are 1-based and strictly increasing.
pub fn split_sessions(log: EventLog) -> Vec<Session> {
    let transcript_id = log.transcript_id;
    let mut sessions = Vec::new();
    let mut chunk = Vec::new();
    let mut count = 1usize;

    for event in log.events {
        if event.is_launch() && !chunk.is_empty() {
            sessions.push(Session::new(
                format!("{transcript_id}-{count}"),
                std::mem::take(&mut chunk),
            ));
            count += 1;
        }
        chunk.push(event);
    }

    if !chunk.is_empty() {
        sessions.push(Session::new(format!("{transcript_id}-{count}"), chunk));
    }

    sessions
}

#[cfg(test)]
mod tests {
    use super::*;
    use transcript_types::{DialogEvent, EventKind, EventPayload, InnerPayload};

    fn launch() -> DialogEvent {
        DialogEvent {
            kind: EventKind::Request,
            start_time: Some("2024-03-01T14:00:00+00:00".to_string()),
            payload: Some(EventPayload {
                kind: Some("launch".to_string()),
                inner: None,
            }),
        }
    }

    fn text(message: &str) -> DialogEvent {
        DialogEvent {
            kind: EventKind::Text,
            start_time: Some("2024-03-01T14:00:01+00:00".to_string()),
            payload: Some(EventPayload {
                kind: None,
                inner: Some(InnerPayload {
                    message: Some(message.to_string()),
                    ..Default::default()
                }),
            }),
        }
    }

    fn log(events: Vec<DialogEvent>) -> EventLog {
        EventLog {
            transcript_id: "t1".to_string(),
            events,
        }
    }

    #[test]
    fn launch_starts_a_new_session() {
        let sessions = split_sessions(log(vec![
            launch(),
            text("Hi"),
            launch(),
            text("Hi again"),
        ]));

        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].session_id, "t1-1");
        assert_eq!(sessions[0].events.len(), 2);
        assert_eq!(sessions[1].session_id, "t1-2");
        assert_eq!(sessions[1].events.len(), 2);
        assert!(sessions[1].events[0].is_launch());
    }

    #[test]
    fn leading_launch_produces_no_empty_session() {
        let sessions = split_sessions(log(vec![launch(), text("Hi")]));
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].events.len(), 2);
    }

    #[test]
    fn log_without_launches_is_one_session() {
        let sessions = split_sessions(log(vec![text("a"), text("b"), text("c")]));
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].session_id, "t1-1");
        assert_eq!(sessions[0].events.len(), 3);
    }

    #[test]
    fn empty_log_yields_no_sessions() {
        assert!(split_sessions(log(vec![])).is_empty());
    }

    #[test]
    fn consecutive_launches_yield_single_event_session() {
        let sessions = split_sessions(log(vec![launch(), launch(), text("Hi")]));
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].events.len(), 1);
        assert!(sessions[0].events[0].is_launch());
        assert_eq!(sessions[1].events.len(), 2);
    }

    #[test]
    fn partition_preserves_every_event_in_order() {
        let input = vec![
            text("a"),
            launch(),
            text("b"),
            text("c"),
            launch(),
            launch(),
            text("d"),
        ];
        let messages: Vec<Option<String>> = input
            .iter()
            .map(|e| e.chat_message().map(str::to_string))
            .collect();

        let sessions = split_sessions(log(input));

        let flattened: Vec<Option<String>> = sessions
            .iter()
            .flat_map(|s| &s.events)
            .map(|e| e.chat_message().map(str::to_string))
            .collect();
        assert_eq!(flattened, messages);

        let ids: Vec<&str> = sessions.iter().map(|s| s.session_id.as_str()).collect();
        assert_eq!(ids, vec!["t1-1", "t1-2", "t1-3", "t1-4"]);
    }
}
