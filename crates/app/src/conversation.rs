//! Conversation sources
//!
//! Messages come from a JSON lines file (one message per line) or from the
//! built-in sample conversation.

use std::path::Path;

use chrono::{Duration, Utc};
use murmur_core::{Error, Message, MessageState, Result, Sender};

/// Read one message per non-empty line, reporting the failing line number
pub fn load_json_lines(path: &Path) -> Result<Vec<Message>> {
    let content = std::fs::read_to_string(path)?;
    parse_json_lines(&content)
}

pub fn parse_json_lines(content: &str) -> Result<Vec<Message>> {
    let mut messages = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match Message::from_json(line) {
            Ok(message) => messages.push(message),
            Err(e) => {
                tracing::error!(line = index + 1, "Rejected message: {}", e);
                return Err(e);
            }
        }
    }
    Ok(messages)
}

/// A short exchange covering every sender and delivery state
pub fn sample() -> Vec<Message> {
    let start = Utc::now() - Duration::minutes(12);
    let at = |minutes: i64| start + Duration::minutes(minutes);

    vec![
        Message::new("Hey, are we still on for tonight?", Sender::Other)
            .with_state(MessageState::Read)
            .with_send_date(at(0)),
        Message::new("Yes! 8pm at the usual place", Sender::User)
            .with_state(MessageState::Read)
            .with_send_date(at(2)),
        Message::new("Great, I'll book a table", Sender::Other)
            .with_state(MessageState::Sent)
            .with_send_date(at(5)),
        Message::new("Perfect", Sender::User)
            .with_state(MessageState::Sent)
            .with_send_date(at(9)),
        Message::new("See you there", Sender::User).with_send_date(at(12)),
    ]
}

/// Advance the oldest unread message of the user by one step, as a delivery ack would
pub fn deliver_next(messages: &mut [Message]) -> Option<usize> {
    let index = messages
        .iter()
        .position(|m| m.sender == Sender::User && m.state != MessageState::Read)?;
    let message = &mut messages[index];
    match message.state {
        MessageState::Sending => message.mark_sent(),
        MessageState::Sent => message.mark_read(),
        MessageState::Read => return None,
    }
    Some(index)
}

/// Human-readable cause for a rejected conversation file
pub fn describe_error(error: &Error) -> String {
    match error {
        Error::InvalidSender(_) | Error::InvalidMessageState(_) => {
            format!("invalid message: {}", error)
        }
        Error::Serialization(e) => format!("malformed message JSON: {}", e),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_json_lines() {
        let content = r#"
{"message":"Hi","sender":"user","state":"sending","sendDate":"2018-09-15T14:05:00Z"}

{"message":"Yo","sender":"other","state":"read","sendDate":"2018-09-15T14:06:00Z"}
"#;
        let messages = parse_json_lines(content).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, Sender::User);
        assert_eq!(messages[1].state, MessageState::Read);
    }

    #[test]
    fn test_parse_json_lines_rejects_unknown_state() {
        let content = r#"{"message":"Hi","sender":"user","state":"lost","sendDate":"2018-09-15T14:05:00Z"}"#;
        let err = parse_json_lines(content).unwrap_err();
        assert!(matches!(err, Error::InvalidMessageState(_)));
        assert!(describe_error(&err).starts_with("invalid message"));
    }

    #[test]
    fn test_load_json_lines_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("conversation.jsonl");
        std::fs::write(
            &path,
            r#"{"message":"Hi","sender":"other","state":"sent","sendDate":"2018-09-15T14:05:00Z"}"#,
        )
        .unwrap();

        let messages = load_json_lines(&path).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].message, "Hi");
    }

    #[test]
    fn test_sample_covers_both_senders() {
        let messages = sample();
        assert!(messages.iter().any(|m| m.sender == Sender::User));
        assert!(messages.iter().any(|m| m.sender == Sender::Other));
        assert!(messages.iter().any(|m| m.state == MessageState::Sending));
    }

    #[test]
    fn test_deliver_next() {
        let mut messages = vec![
            Message::new("a", Sender::User).with_state(MessageState::Read),
            Message::new("b", Sender::Other),
            Message::new("c", Sender::User),
        ];

        assert_eq!(deliver_next(&mut messages), Some(2));
        assert_eq!(messages[2].state, MessageState::Sent);
        assert_eq!(deliver_next(&mut messages), Some(2));
        assert_eq!(messages[2].state, MessageState::Read);
        assert_eq!(deliver_next(&mut messages), None);
        assert_eq!(messages[1].state, MessageState::Sending);
    }
}
