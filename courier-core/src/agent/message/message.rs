use std::fmt;

use rst_common::standard::serde::de::DeserializeOwned;
use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::standard::serde_json::{self, Map, Value};
use rst_common::standard::uuid::Uuid;

use rstdev_domain::entity::ToJSON;
use rstdev_domain::BaseError;

use super::envelope::ReturnRouteMode;
use super::types::MessageError;

const MESSAGE_TYPE_URI_PREFIX: &str = "https://didcomm.org";
const MESSAGE_TYPE_PLAIN_PREFIX: &str = "did:sov:BzCbsNYhMrjHiqZDTUASHg;spec";

const DECORATOR_TRANSPORT: &str = "~transport";
const DECORATOR_THREAD: &str = "~thread";

/// `Namespace` is the base a message type lives in
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Namespace {
    /// the DIDComm base, rendered as uri or plain depending on the context
    DidComm,

    /// any other `{base}/{protocol}/{version}/{name}` type, rendered back unchanged
    Custom(String),

    /// a type without the `{protocol}/{version}/{name}` structure, kept as-is in `name`
    Opaque,
}

/// `MessageType` is a parsed protocol message type
///
/// DIDComm types can be rendered in two forms:
///
/// - uri: `https://didcomm.org/{protocol}/{version}/{name}`
/// - plain: `did:sov:BzCbsNYhMrjHiqZDTUASHg;spec/{protocol}/{version}/{name}`
///
/// Both forms parse to the same value. Types under any other base, or without a structure at
/// all, are accepted and always rendered exactly as they were received.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageType {
    namespace: Namespace,
    protocol: String,
    version: String,
    name: String,
}

impl MessageType {
    pub fn new(protocol: &str, version: &str, name: &str) -> Self {
        Self {
            namespace: Namespace::DidComm,
            protocol: protocol.to_string(),
            version: version.to_string(),
            name: name.to_string(),
        }
    }

    pub fn parse(value: &str) -> Result<Self, MessageError> {
        if value.is_empty() {
            return Err(MessageError::invalid_message("message type was missing"));
        }

        let parts: Vec<&str> = value.rsplitn(4, '/').collect();
        let structured = parts.len() == 4 && parts.iter().all(|part| !part.is_empty());
        if !structured {
            return Ok(Self {
                namespace: Namespace::Opaque,
                protocol: "".to_string(),
                version: "".to_string(),
                name: value.to_string(),
            });
        }

        let (name, version, protocol, base) = (parts[0], parts[1], parts[2], parts[3]);
        let namespace = if base == MESSAGE_TYPE_URI_PREFIX || base == MESSAGE_TYPE_PLAIN_PREFIX {
            Namespace::DidComm
        } else {
            Namespace::Custom(base.to_string())
        };

        Ok(Self {
            namespace,
            protocol: protocol.to_string(),
            version: version.to_string(),
            name: name.to_string(),
        })
    }

    /// `render` formats the type, `use_uri` only applies to DIDComm types
    pub fn render(&self, use_uri: bool) -> String {
        let base = match &self.namespace {
            Namespace::DidComm if use_uri => MESSAGE_TYPE_URI_PREFIX,
            Namespace::DidComm => MESSAGE_TYPE_PLAIN_PREFIX,
            Namespace::Custom(base) => base.as_str(),
            Namespace::Opaque => return self.name.to_owned(),
        };

        format!("{}/{}/{}/{}", base, self.protocol, self.version, self.name)
    }

    pub fn is_didcomm(&self) -> bool {
        self.namespace == Namespace::DidComm
    }

    pub fn protocol(&self) -> String {
        self.protocol.to_owned()
    }

    pub fn version(&self) -> String {
        self.version.to_owned()
    }

    pub fn name(&self) -> String {
        self.name.to_owned()
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(true))
    }
}

/// `ProtocolMessage` is a plaintext protocol message
///
/// Any field besides `@id` and `@type` belongs to the message body, including the decorators
/// which are prefixed with `~`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(crate = "self::serde")]
pub struct ProtocolMessage {
    #[serde(rename = "@id", default)]
    id: String,

    #[serde(rename = "@type", default)]
    message_type: String,

    #[serde(flatten)]
    body: Map<String, Value>,
}

impl ProtocolMessage {
    pub fn new(message_type: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            message_type,
            body: Map::new(),
        }
    }

    pub fn with_id(mut self, id: String) -> Self {
        self.id = id;
        self
    }

    /// `from_body` builds a message from any serializable object, the object must be
    /// serialized as a JSON object
    pub fn from_body<T: Serialize>(message_type: String, body: &T) -> Result<Self, MessageError> {
        let value = serde_json::to_value(body)
            .map_err(|err| MessageError::invalid_message(&err.to_string()))?;

        match value {
            Value::Object(body) => {
                let mut message = Self::new(message_type);
                message.body = body;
                Ok(message)
            }
            _ => Err(MessageError::invalid_message(
                "message body must be an object",
            )),
        }
    }

    pub fn parse_body<T: DeserializeOwned>(&self) -> Result<T, MessageError> {
        serde_json::from_value(Value::Object(self.body.clone()))
            .map_err(|err| MessageError::invalid_message(&err.to_string()))
    }

    pub fn get_id(&self) -> String {
        self.id.to_owned()
    }

    pub fn get_type(&self) -> String {
        self.message_type.to_owned()
    }

    pub fn get_body(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn set_decorator(&mut self, name: &str, value: Value) {
        self.body.insert(name.to_string(), value);
    }

    pub fn get_decorator(&self, name: &str) -> Option<&Value> {
        self.body.get(name)
    }

    pub fn set_return_route(&mut self, mode: ReturnRouteMode) {
        let mut transport = match self.body.remove(DECORATOR_TRANSPORT) {
            Some(Value::Object(transport)) => transport,
            _ => Map::new(),
        };

        transport.insert(
            "return_route".to_string(),
            Value::String(mode.to_string()),
        );
        self.set_decorator(DECORATOR_TRANSPORT, Value::Object(transport));
    }

    pub fn get_return_route(&self) -> Option<String> {
        self.get_decorator(DECORATOR_TRANSPORT)
            .and_then(|transport| transport.get("return_route"))
            .and_then(|mode| mode.as_str())
            .map(|mode| mode.to_string())
    }

    /// `set_thread_from` marks this message as a reply of the given message
    pub fn set_thread_from(&mut self, parent: &ProtocolMessage) {
        let thread_id = parent
            .get_thread_id()
            .unwrap_or_else(|| parent.get_id());

        let mut thread = Map::new();
        thread.insert("thid".to_string(), Value::String(thread_id));
        self.set_decorator(DECORATOR_THREAD, Value::Object(thread));
    }

    pub fn get_thread_id(&self) -> Option<String> {
        self.get_decorator(DECORATOR_THREAD)
            .and_then(|thread| thread.get("thid"))
            .and_then(|thid| thid.as_str())
            .map(|thid| thid.to_string())
    }

    pub fn validate(&self) -> Result<(), MessageError> {
        if self.id.is_empty() {
            return Err(MessageError::invalid_message("message id was missing"));
        }

        if self.message_type.is_empty() {
            return Err(MessageError::invalid_message("message type was missing"));
        }

        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, MessageError> {
        serde_json::to_vec(self).map_err(|err| MessageError::invalid_message(&err.to_string()))
    }
}

impl ToJSON for ProtocolMessage {
    fn to_json(&self) -> Result<String, BaseError> {
        serde_json::to_string(self).map_err(|err| BaseError::ToJSONError(err.to_string()))
    }
}

impl TryFrom<Vec<u8>> for ProtocolMessage {
    type Error = MessageError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        serde_json::from_slice(&value).map_err(|err| MessageError::invalid_message(&err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rst_common::standard::serde_json::json;
    use table_test::table_test;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    #[serde(crate = "self::serde")]
    struct Ping {
        comment: String,
    }

    #[test]
    fn test_parse_message_type() {
        let table = vec![
            (
                "https://didcomm.org/mediator-backup/1.0/store-backup",
                Some(MessageType::new("mediator-backup", "1.0", "store-backup")),
            ),
            (
                "did:sov:BzCbsNYhMrjHiqZDTUASHg;spec/trust_ping/1.0/ping",
                Some(MessageType::new("trust_ping", "1.0", "ping")),
            ),
            ("", None),
        ];

        for (validator, input, expected) in table_test!(table) {
            let parsed = MessageType::parse(input).ok();

            validator
                .given(&format!("{}", input))
                .when("parse message type")
                .then(&format!("{:?}", expected))
                .assert_eq(expected, parsed);
        }
    }

    #[test]
    fn test_parse_other_namespaces() {
        let table = vec![
            ("https://example.com/trust_ping/1.0/ping", false),
            ("https://didcomm.org/trust_ping//ping", false),
            ("ping", false),
            ("t", false),
            ("https://didcomm.org/trust_ping/1.0/ping", true),
        ];

        for (validator, input, expected) in table_test!(table) {
            let parsed = MessageType::parse(input).unwrap();

            assert_eq!(parsed.render(true), input.to_string());
            assert_eq!(parsed.to_string(), input.to_string());

            validator
                .given(input)
                .when("parse message type")
                .then(&format!("didcomm: {}", expected))
                .assert_eq(expected, parsed.is_didcomm());
        }

        let custom = MessageType::parse("https://example.com/trust_ping/1.0/ping").unwrap();
        assert_eq!(custom.protocol(), "trust_ping".to_string());
        assert_eq!(
            custom.render(false),
            "https://example.com/trust_ping/1.0/ping".to_string()
        );
        assert_ne!(custom, MessageType::new("trust_ping", "1.0", "ping"));

        let opaque = MessageType::parse("t").unwrap();
        assert_eq!(opaque.name(), "t".to_string());
        assert_eq!(opaque.render(false), "t".to_string())
    }

    #[test]
    fn test_render_message_type() {
        let message_type = MessageType::new("mediator-backup", "1.0", "list-backups");
        assert_eq!(
            message_type.render(true),
            "https://didcomm.org/mediator-backup/1.0/list-backups".to_string()
        );
        assert_eq!(
            message_type.render(false),
            "did:sov:BzCbsNYhMrjHiqZDTUASHg;spec/mediator-backup/1.0/list-backups".to_string()
        );

        let parsed = MessageType::parse(&message_type.render(false));
        assert_eq!(parsed, Ok(message_type))
    }

    #[test]
    fn test_validate_message() {
        let table = vec![
            (("m1", "t"), true),
            (("", "t"), false),
            (("m1", ""), false),
            (("", ""), false),
        ];

        for (validator, input, expected) in table_test!(table) {
            let message = ProtocolMessage::new(input.1.to_string()).with_id(input.0.to_string());
            let valid = message.validate().is_ok();

            validator
                .given(&format!("{:?}", input))
                .when("validate message")
                .then(&format!("valid: {}", expected))
                .assert_eq(expected, valid);
        }
    }

    #[test]
    fn test_parse_missing_fields() {
        let message = ProtocolMessage::try_from(br#"{"comment": "hi"}"#.to_vec());
        assert!(!message.is_err());

        let validation = message.unwrap().validate();
        assert!(matches!(
            validation.unwrap_err(),
            MessageError::InvalidMessage { .. }
        ))
    }

    #[test]
    fn test_body_and_serialization() {
        let ping = Ping {
            comment: "hello".to_string(),
        };

        let message = ProtocolMessage::from_body("ping".to_string(), &ping)
            .unwrap()
            .with_id("m1".to_string());

        let json_str = message.to_json();
        assert!(!json_str.is_err());

        let value: Value = serde_json::from_str(&json_str.unwrap()).unwrap();
        assert_eq!(
            value,
            json!({"@id": "m1", "@type": "ping", "comment": "hello"})
        );

        let restored = ProtocolMessage::try_from(message.to_bytes().unwrap()).unwrap();
        assert_eq!(restored, message);
        assert_eq!(restored.parse_body::<Ping>().unwrap(), ping)
    }

    #[test]
    fn test_from_body_not_object() {
        let message = ProtocolMessage::from_body("ping".to_string(), &vec![1, 2, 3]);
        assert!(matches!(
            message.unwrap_err(),
            MessageError::InvalidMessage { .. }
        ))
    }

    #[test]
    fn test_decorators() {
        let parent = ProtocolMessage::new("ping".to_string()).with_id("parent".to_string());

        let mut message = ProtocolMessage::new("pong".to_string());
        message.set_decorator("~transport", json!({"queue": true}));
        message.set_return_route(ReturnRouteMode::All);
        message.set_thread_from(&parent);

        assert_eq!(message.get_return_route(), Some("all".to_string()));
        assert_eq!(
            message.get_decorator("~transport"),
            Some(&json!({"queue": true, "return_route": "all"}))
        );
        assert_eq!(message.get_thread_id(), Some("parent".to_string()));

        let mut reply = ProtocolMessage::new("ping".to_string());
        reply.set_thread_from(&message);
        assert_eq!(reply.get_thread_id(), Some("parent".to_string()))
    }
}
