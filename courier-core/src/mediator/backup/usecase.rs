use base64::{engine::general_purpose::STANDARD, Engine as _};

use rst_common::standard::async_trait::async_trait;
use rst_common::standard::chrono::Utc;
use rst_common::with_logging::log::{debug, info, warn};

use crate::agent::crypto::types::{CryptoError, CryptoProvider};

use super::types::{Attachment, BackupAPI, BackupError, BackupId, RepoBackupBuilder};

const MAX_STORE_ATTEMPTS: usize = 5;

#[derive(Clone)]
/// `Usecase` is base logic implementation for the [`BackupAPI`]
///
/// Signatures are always verified before the repository is touched, a rejected request never
/// writes anything
pub struct Usecase<TRepo, TCrypto>
where
    TRepo: RepoBackupBuilder,
    TCrypto: CryptoProvider + Clone,
{
    repo: TRepo,
    crypto: TCrypto,
}

impl<TRepo, TCrypto> Usecase<TRepo, TCrypto>
where
    TRepo: RepoBackupBuilder,
    TCrypto: CryptoProvider + Clone,
{
    pub fn new(repo: TRepo, crypto: TCrypto) -> Self {
        Self { repo, crypto }
    }

    async fn verify(
        &self,
        backup_id: &BackupId,
        data: Vec<u8>,
        signature: &str,
    ) -> Result<(), BackupError> {
        let signature = STANDARD
            .decode(signature)
            .map_err(|err| BackupError::InvalidMessage(format!("invalid signature: {}", err)))?;

        let verified = self
            .crypto
            .verify(backup_id.to_string(), data, signature)
            .await
            .map_err(|err| match err {
                CryptoError::VerifyError(msg) | CryptoError::KeyError(msg) => {
                    BackupError::InvalidSignature(msg)
                }
                _ => BackupError::CryptoError(err.to_string()),
            });

        match verified {
            Ok(true) => Ok(()),
            Ok(false) => {
                warn!("[backup:verify] signature rejected for: {}", backup_id);
                Err(BackupError::InvalidSignature(backup_id.to_string()))
            }
            Err(err) => {
                warn!("[backup:verify] signature rejected for: {} | {}", backup_id, err);
                Err(err)
            }
        }
    }

    async fn timestamps(&self, backup_id: &BackupId) -> Result<Vec<i64>, BackupError> {
        list_timestamps(&self.repo, backup_id).await
    }
}

/// `list_timestamps` reads the backup locations of an identifier as timestamps, most recent
/// first
///
/// Listing needs no signature, any location which is not a timestamp is reported as
/// [`BackupError::DataIntegrityError`]
pub async fn list_timestamps<TRepo>(
    repo: &TRepo,
    backup_id: &BackupId,
) -> Result<Vec<i64>, BackupError>
where
    TRepo: RepoBackupBuilder,
{
    let locations = repo.list_locations(backup_id.clone()).await?;

    let mut timestamps = locations
        .iter()
        .map(|location| {
            location.parse::<i64>().map_err(|_| {
                BackupError::DataIntegrityError(format!(
                    "unknown backup location: {}/{}",
                    backup_id, location
                ))
            })
        })
        .collect::<Result<Vec<i64>, BackupError>>()?;

    timestamps.sort_unstable_by(|a, b| b.cmp(a));
    Ok(timestamps)
}

#[async_trait]
impl<TRepo, TCrypto> BackupAPI for Usecase<TRepo, TCrypto>
where
    TRepo: RepoBackupBuilder,
    TCrypto: CryptoProvider + Clone,
{
    async fn store(
        &self,
        backup_id: String,
        payload: Vec<Attachment>,
        payload_signature: String,
    ) -> Result<i64, BackupError> {
        let backup_id = BackupId::new(&backup_id)?;
        if payload.is_empty() {
            return Err(BackupError::InvalidMessage(
                "backup payload was missing".to_string(),
            ));
        }

        if payload_signature.is_empty() {
            return Err(BackupError::InvalidMessage(
                "payload signature was missing".to_string(),
            ));
        }

        let decoded = payload
            .iter()
            .map(|attachment| attachment.decode())
            .collect::<Result<Vec<Vec<u8>>, BackupError>>()?;

        let signed_data = decoded.into_iter().next().unwrap_or_default();
        self.verify(&backup_id, signed_data, &payload_signature)
            .await?;

        let latest = self.timestamps(&backup_id).await?.first().copied();
        let now = Utc::now().timestamp();
        let mut timestamp = match latest {
            Some(latest) if latest >= now => latest + 1,
            _ => now,
        };

        for attempt in 1..=MAX_STORE_ATTEMPTS {
            match self
                .repo
                .save_backup(backup_id.clone(), timestamp, payload.clone())
                .await
            {
                Ok(_) => {
                    info!("[backup:store] stored {} at {}", backup_id, timestamp);
                    return Ok(timestamp);
                }
                Err(BackupError::LocationConflict(taken)) => {
                    debug!(
                        "[backup:store] location {} taken, attempt: {}",
                        taken, attempt
                    );
                    timestamp = taken.max(timestamp) + 1;
                }
                Err(err) => return Err(err),
            }
        }

        Err(BackupError::RepoError(format!(
            "unable to assign a backup location for: {}",
            backup_id
        )))
    }

    async fn retrieve(
        &self,
        backup_id: String,
        signature: String,
    ) -> Result<Vec<Attachment>, BackupError> {
        let backup_id = BackupId::new(&backup_id)?;
        if signature.is_empty() {
            return Err(BackupError::InvalidMessage(
                "signature was missing".to_string(),
            ));
        }

        let key_bytes = self
            .crypto
            .key_bytes(backup_id.to_string())
            .map_err(|err| BackupError::InvalidSignature(err.to_string()))?;

        self.verify(&backup_id, key_bytes, &signature).await?;

        let mut attachments = Vec::new();
        for timestamp in self.timestamps(&backup_id).await? {
            let stored = self
                .repo
                .get_attachments(backup_id.clone(), timestamp.to_string())
                .await?;
            attachments.extend(stored);
        }

        debug!(
            "[backup:retrieve] {} attachments for: {}",
            attachments.len(),
            backup_id
        );
        Ok(attachments)
    }

    async fn list(&self, backup_id: String) -> Result<Vec<i64>, BackupError> {
        let backup_id = BackupId::new(&backup_id)?;
        self.timestamps(&backup_id).await
    }
}
