#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone, Timelike};
    use serde_json::json;

    use crate::{
        ChatMessage, ErrorNotice, Joined, ParseError, ServerEvent, Timestamp, parse_server_event,
    };

    #[test]
    fn test_parse_joined() {
        let event = parse_server_event(
            "joined",
            vec![json!({ "username": "Alice", "session_id": "s1" })],
        )
        .unwrap();

        assert_eq!(
            event,
            ServerEvent::Joined(Joined {
                username: "Alice".into(),
                session_id: "s1".into(),
            })
        )
    }

    #[test]
    fn test_parse_message() {
        let event = parse_server_event(
            "message",
            vec![json!({
                "username": "bob",
                "message": "hola",
                "session_id": "s2",
                "timestamp": "2024-05-01T13:45:12.123456"
            })],
        )
        .unwrap();

        let ServerEvent::Message(message) = event else {
            panic!("expected message event");
        };
        assert_eq!(message.username, "bob");
        assert_eq!(message.message, "hola");
        assert_eq!(message.session_id, "s2");
        assert_eq!(
            message.timestamp,
            Some(Timestamp::Text("2024-05-01T13:45:12.123456".into()))
        );
    }

    #[test]
    fn test_parse_message_missing_fields_default_to_empty() {
        let event = parse_server_event("message", vec![json!({ "message": "hi" })]).unwrap();

        assert_eq!(
            event,
            ServerEvent::Message(ChatMessage {
                message: "hi".into(),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_parse_message_wrong_shape() {
        let result = parse_server_event("message", vec![json!("hola")]);
        assert!(result.is_err());

        let result = parse_server_event("message", vec![json!({ "username": 7 })]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_user_list() {
        let event = parse_server_event(
            "user_list",
            vec![json!([
                { "username": "alice", "session_id": "s1" },
                { "username": "bob", "session_id": "s2", "away": true }
            ])],
        )
        .unwrap();

        let ServerEvent::UserList(users) = event else {
            panic!("expected user list");
        };
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "alice");
        assert_eq!(users[1].session_id.as_deref(), Some("s2"));
        assert_eq!(users[1].extra.get("away"), Some(&json!(true)));
    }

    #[test]
    fn test_parse_user_list_invalid() {
        let err = parse_server_event("user_list", vec![json!({ "username": "alice" })]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ParseError>(),
            Some(ParseError::InvalidFormat(_))
        ));

        let err = parse_server_event("user_list", vec![]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ParseError>(),
            Some(ParseError::MissingField(_))
        ));
    }

    #[test]
    fn test_parse_presence() {
        let joined = parse_server_event("user_joined", vec![json!({ "username": "carol" })]).unwrap();
        let left = parse_server_event("user_left", vec![json!({ "username": "carol" })]).unwrap();

        assert!(matches!(joined, ServerEvent::UserJoined(ref p) if p.username == "carol"));
        assert!(matches!(left, ServerEvent::UserLeft(ref p) if p.username == "carol"));
    }

    #[test]
    fn test_parse_error_variants() {
        let with_message =
            parse_server_event("error", vec![json!({ "message": "Debes unirte primero" })]).unwrap();
        assert_eq!(
            with_message,
            ServerEvent::Error(ErrorNotice {
                message: Some("Debes unirte primero".into()),
            })
        );

        let bare = parse_server_event("error", vec![json!("boom")]).unwrap();
        assert_eq!(
            bare,
            ServerEvent::Error(ErrorNotice {
                message: Some("boom".into()),
            })
        );

        let empty = parse_server_event("error", vec![]).unwrap();
        assert_eq!(empty, ServerEvent::Error(ErrorNotice::default()));
    }

    #[test]
    fn test_parse_unknown() {
        let event = parse_server_event("typing", vec![json!({ "username": "bob" })]).unwrap();

        assert_eq!(
            event,
            ServerEvent::Unknown {
                name: "typing".to_string(),
                args: vec![json!({ "username": "bob" })],
            }
        );
    }

    #[test]
    fn test_timestamp_naive_iso_is_local() {
        let timestamp = Timestamp::Text("2024-05-01T13:45:12.123456".into());
        let local = timestamp.to_local().unwrap();

        assert_eq!((local.hour(), local.minute()), (13, 45));
    }

    #[test]
    fn test_timestamp_rfc3339_and_epoch_agree() {
        let expected = Local.timestamp_opt(1_714_571_112, 0).single().unwrap();

        let rfc = Timestamp::Text("2024-05-01T13:45:12Z".into()).to_local().unwrap();
        let millis = Timestamp::Epoch(1_714_571_112_000.0).to_local().unwrap();
        let seconds = Timestamp::Epoch(1_714_571_112.0).to_local().unwrap();

        assert_eq!(rfc, expected);
        assert_eq!(millis, expected);
        assert_eq!(seconds, expected);
    }

    #[test]
    fn test_timestamp_deserializes_number_or_text() {
        let number: Timestamp = serde_json::from_value(json!(1714571112000u64)).unwrap();
        let text: Timestamp = serde_json::from_value(json!("12:30")).unwrap();

        assert_eq!(number, Timestamp::Epoch(1_714_571_112_000.0));
        assert_eq!(text, Timestamp::Text("12:30".into()));
    }

    #[test]
    fn test_timestamp_raw_clock_fallback() {
        let garbled = Timestamp::Text("hoyT09:15:00?".into());
        assert!(garbled.to_local().is_none());
        assert_eq!(garbled.raw_clock(), "09:15");

        let bare = Timestamp::Text("17:02:59".into());
        assert_eq!(bare.raw_clock(), "17:02");
    }
}
