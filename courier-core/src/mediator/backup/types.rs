use base64::{engine::general_purpose::STANDARD, Engine as _};
use derive_more::{AsRef, Display, Into};

use rst_common::standard::async_trait::async_trait;
use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::with_errors::thiserror::{self, Error};

use crate::agent::context::types::Provision;

/// `BackupError` provides all specific error types relate with the backup relay
#[derive(Debug, PartialEq, Error, Clone)]
pub enum BackupError {
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("location conflict: {0}")]
    LocationConflict(i64),

    #[error("data integrity error: {0}")]
    DataIntegrityError(String),

    #[error("repo error: {0}")]
    RepoError(String),

    #[error("crypto error: {0}")]
    CryptoError(String),

    #[error("unsupported message: {0}")]
    UnsupportedMessage(String),
}

/// `BackupId` names the key of the agent owning the backups
///
/// It is also used as a storage location, so it is restricted to characters which are safe
/// to be used as a single path component
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Into, AsRef)]
#[serde(crate = "self::serde")]
pub struct BackupId(String);

impl BackupId {
    pub fn new(id: &str) -> Result<Self, BackupError> {
        if id.is_empty() {
            return Err(BackupError::InvalidMessage(
                "backup id was missing".to_string(),
            ));
        }

        if id.starts_with('.') {
            return Err(BackupError::InvalidMessage(format!(
                "invalid backup id: {}",
                id
            )));
        }

        let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.');
        if !id.chars().all(allowed) {
            return Err(BackupError::InvalidMessage(format!(
                "invalid backup id: {}",
                id
            )));
        }

        Ok(Self(id.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(crate = "self::serde")]
pub struct AttachmentData {
    pub base64: String,
}

/// `Attachment` is a single backup payload item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(crate = "self::serde")]
pub struct Attachment {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "mime-type", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    pub data: AttachmentData,
}

impl Attachment {
    pub fn from_bytes(id: Option<String>, mime_type: Option<String>, bytes: &[u8]) -> Self {
        Self {
            id,
            mime_type,
            data: AttachmentData {
                base64: STANDARD.encode(bytes),
            },
        }
    }

    pub fn decode(&self) -> Result<Vec<u8>, BackupError> {
        STANDARD
            .decode(&self.data.base64)
            .map_err(|err| BackupError::InvalidMessage(format!("invalid attachment: {}", err)))
    }
}

/// `RepoBackupBuilder` is the storage of the backups
///
/// A backup is saved under a location named by its timestamp. Saving into a location which
/// already exists must fail with [`BackupError::LocationConflict`] and leave it untouched, and
/// a saved backup must only become visible to the listing once it is complete
#[async_trait]
pub trait RepoBackupBuilder: Clone + Sync + Send {
    async fn provision(&self) -> Result<Provision, BackupError>;

    async fn save_backup(
        &self,
        backup_id: BackupId,
        timestamp: i64,
        attachments: Vec<Attachment>,
    ) -> Result<(), BackupError>;

    async fn list_locations(&self, backup_id: BackupId) -> Result<Vec<String>, BackupError>;

    async fn get_attachments(
        &self,
        backup_id: BackupId,
        location: String,
    ) -> Result<Vec<Attachment>, BackupError>;
}

/// `BackupAPI` is the backup relay service
#[async_trait]
pub trait BackupAPI: Clone {
    async fn store(
        &self,
        backup_id: String,
        payload: Vec<Attachment>,
        payload_signature: String,
    ) -> Result<i64, BackupError>;

    async fn retrieve(
        &self,
        backup_id: String,
        signature: String,
    ) -> Result<Vec<Attachment>, BackupError>;

    async fn list(&self, backup_id: String) -> Result<Vec<i64>, BackupError>;
}
