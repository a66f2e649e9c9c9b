//! Message model consumed by the bubble renderer

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The local user
    User,
    /// Anyone else in the conversation
    Other,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Other => "other",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "user" => Ok(Sender::User),
            "other" => Ok(Sender::Other),
            _ => Err(Error::InvalidSender(s.to_string())),
        }
    }
}

/// Delivery lifecycle of a message, in the order it progresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageState {
    Sending,
    Sent,
    Read,
}

impl MessageState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageState::Sending => "sending",
            MessageState::Sent => "sent",
            MessageState::Read => "read",
        }
    }
}

impl fmt::Display for MessageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sending" => Ok(MessageState::Sending),
            "sent" => Ok(MessageState::Sent),
            "read" => Ok(MessageState::Read),
            _ => Err(Error::InvalidMessageState(s.to_string())),
        }
    }
}

/// A chat message as supplied by the conversation data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawMessage")]
pub struct Message {
    pub message: String,
    pub sender: Sender,
    pub state: MessageState,
    pub send_date: DateTime<Utc>,
}

impl Message {
    /// Create an outgoing message that has not been delivered yet
    pub fn new(message: impl Into<String>, sender: Sender) -> Self {
        Self {
            message: message.into(),
            sender,
            state: MessageState::Sending,
            send_date: Utc::now(),
        }
    }

    pub fn with_state(mut self, state: MessageState) -> Self {
        self.state = state;
        self
    }

    pub fn with_send_date(mut self, send_date: DateTime<Utc>) -> Self {
        self.send_date = send_date;
        self
    }

    /// Advance to `sent`. A message that was already read stays read.
    pub fn mark_sent(&mut self) {
        self.state = self.state.max(MessageState::Sent);
    }

    pub fn mark_read(&mut self) {
        self.state = MessageState::Read;
    }

    /// Decode a single message from JSON, rejecting unknown sender/state values
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawMessage = serde_json::from_str(json)?;
        Message::try_from(raw)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Wire shape of a message before the enum fields are validated
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMessage {
    message: String,
    sender: String,
    state: String,
    send_date: DateTime<Utc>,
}

impl TryFrom<RawMessage> for Message {
    type Error = Error;

    fn try_from(raw: RawMessage) -> Result<Self> {
        Ok(Self {
            sender: raw.sender.parse()?,
            state: raw.state.parse()?,
            message: raw.message,
            send_date: raw.send_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 9, 15, 14, 5, 0).unwrap()
    }

    #[test]
    fn test_parse_sender() {
        assert_eq!("user".parse::<Sender>().unwrap(), Sender::User);
        assert_eq!("other".parse::<Sender>().unwrap(), Sender::Other);
        assert!(matches!(
            "User".parse::<Sender>(),
            Err(Error::InvalidSender(s)) if s == "User"
        ));
    }

    #[test]
    fn test_parse_state() {
        assert_eq!("sending".parse::<MessageState>().unwrap(), MessageState::Sending);
        assert_eq!("sent".parse::<MessageState>().unwrap(), MessageState::Sent);
        assert_eq!("read".parse::<MessageState>().unwrap(), MessageState::Read);
        assert!(matches!(
            "delivered".parse::<MessageState>(),
            Err(Error::InvalidMessageState(s)) if s == "delivered"
        ));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{"message":"Hi","sender":"user","state":"read","sendDate":"2018-09-15T14:05:00Z"}"#;
        let message = Message::from_json(json).unwrap();
        assert_eq!(message.message, "Hi");
        assert_eq!(message.sender, Sender::User);
        assert_eq!(message.state, MessageState::Read);
        assert_eq!(message.send_date, date());
    }

    #[test]
    fn test_from_json_rejects_unknown_sender() {
        let json = r#"{"message":"Hi","sender":"bot","state":"sent","sendDate":"2018-09-15T14:05:00Z"}"#;
        let err = Message::from_json(json).unwrap_err();
        assert!(matches!(err, Error::InvalidSender(ref s) if s == "bot"));
    }

    #[test]
    fn test_from_json_rejects_unknown_state() {
        let json = r#"{"message":"Hi","sender":"other","state":"failed","sendDate":"2018-09-15T14:05:00Z"}"#;
        let err = Message::from_json(json).unwrap_err();
        assert!(matches!(err, Error::InvalidMessageState(ref s) if s == "failed"));
    }

    #[test]
    fn test_from_json_malformed() {
        let err = Message::from_json(r#"{"message":"Hi"}"#).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_serde_deserialize_validates() {
        let json = r#"{"message":"Hi","sender":"nobody","state":"sent","sendDate":"2018-09-15T14:05:00Z"}"#;
        let err = serde_json::from_str::<Message>(json).unwrap_err();
        assert!(err.to_string().contains("Invalid sender"));
    }

    #[test]
    fn test_json_keys_are_camel_case() {
        let message = Message::new("Hi", Sender::User).with_send_date(date());
        let json = message.to_json().unwrap();
        assert!(json.contains("\"sendDate\""));
        assert!(json.contains("\"sender\":\"user\""));
        assert!(json.contains("\"state\":\"sending\""));
    }

    #[test]
    fn test_state_only_moves_forward() {
        let mut message = Message::new("Hi", Sender::User);
        assert_eq!(message.state, MessageState::Sending);

        message.mark_sent();
        assert_eq!(message.state, MessageState::Sent);

        message.mark_read();
        message.mark_sent();
        assert_eq!(message.state, MessageState::Read);
    }

    #[test]
    fn test_mark_read_from_sending() {
        let mut message = Message::new("Hi", Sender::User);
        message.mark_read();
        assert_eq!(message.state, MessageState::Read);
    }
}
