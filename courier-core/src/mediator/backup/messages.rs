use rst_common::standard::serde::{self, Deserialize, Serialize};

use crate::agent::message::MessageType;

use super::types::{Attachment, BackupError};

pub const PROTOCOL: &str = "mediator-backup";
pub const VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(crate = "self::serde")]
#[serde(rename_all = "camelCase")]
pub struct StoreBackup {
    pub backup_id: String,
    pub payload: Vec<Attachment>,
    pub payload_signature: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(crate = "self::serde")]
#[serde(rename_all = "camelCase")]
pub struct StoreBackupResponse {
    pub backup_timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(crate = "self::serde")]
#[serde(rename_all = "camelCase")]
pub struct RetrieveBackup {
    pub backup_id: String,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(crate = "self::serde")]
#[serde(rename_all = "camelCase")]
pub struct RetrieveBackupResponse {
    pub payload: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(crate = "self::serde")]
#[serde(rename_all = "camelCase")]
pub struct ListBackups {
    pub backup_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(crate = "self::serde")]
#[serde(rename_all = "camelCase")]
pub struct ListBackupsResponse {
    pub backup_list: Vec<i64>,
}

/// `BackupMessage` lists the message types of the backup protocol
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackupMessage {
    Store,
    StoreResponse,
    Retrieve,
    RetrieveResponse,
    List,
    ListResponse,
}

impl BackupMessage {
    pub fn name(&self) -> &'static str {
        match self {
            BackupMessage::Store => "store-backup",
            BackupMessage::StoreResponse => "store-backup-response",
            BackupMessage::Retrieve => "retrieve-backup",
            BackupMessage::RetrieveResponse => "retrieve-backup-response",
            BackupMessage::List => "list-backups",
            BackupMessage::ListResponse => "list-backups-response",
        }
    }

    pub fn message_type(&self) -> MessageType {
        MessageType::new(PROTOCOL, VERSION, self.name())
    }

    /// `requests` are the message types accepted by the relay
    pub fn requests() -> Vec<MessageType> {
        vec![
            BackupMessage::Store.message_type(),
            BackupMessage::Retrieve.message_type(),
            BackupMessage::List.message_type(),
        ]
    }
}

impl TryFrom<&MessageType> for BackupMessage {
    type Error = BackupError;

    fn try_from(value: &MessageType) -> Result<Self, Self::Error> {
        if !value.is_didcomm() || value.protocol() != PROTOCOL || value.version() != VERSION {
            return Err(BackupError::UnsupportedMessage(value.to_string()));
        }

        match value.name().as_str() {
            "store-backup" => Ok(BackupMessage::Store),
            "store-backup-response" => Ok(BackupMessage::StoreResponse),
            "retrieve-backup" => Ok(BackupMessage::Retrieve),
            "retrieve-backup-response" => Ok(BackupMessage::RetrieveResponse),
            "list-backups" => Ok(BackupMessage::List),
            "list-backups-response" => Ok(BackupMessage::ListResponse),
            _ => Err(BackupError::UnsupportedMessage(value.to_string())),
        }
    }
}
