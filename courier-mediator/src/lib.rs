//! `prople-courier-mediator` is the runtime of a mediator agent
//!
//! It loads the mediator configuration, provisions the backup storage and builds the
//! [`Router`] taking the inbound envelopes through the backup relay protocol.
pub mod common;
use common::helpers;
use common::types::CommonError;

mod config;
pub use config::{Agent, Backup, Config};
use config::Parser as ConfigManager;

mod storage;
pub use storage::BackupRepository;

mod router;
pub use router::types::MediatorError;
pub use router::Router;

use rst_common::with_logging::log::info;

use prople_courier_core::agent::context::types::Provision;
use prople_courier_core::agent::context::AgentContextBuilder;
use prople_courier_core::agent::crypto::types::KeyVerifier;
use prople_courier_core::agent::crypto::ContextCrypto;
use prople_courier_core::agent::message::DispatchRegistry;
use prople_courier_core::mediator::backup::list_timestamps;
use prople_courier_core::mediator::backup::messages::BackupMessage;
use prople_courier_core::mediator::backup::types::{BackupId, RepoBackupBuilder};

/// `CourierMediator` wires the mediator components from a configuration file
pub struct CourierMediator {
    config: Config,
}

impl CourierMediator {
    pub fn new(conf_file: &str) -> Result<Self, CommonError> {
        let config = ConfigManager::new(conf_file.to_string())
            .parse()
            .map_err(|err| CommonError::ConfigError(err.to_string()))?;

        helpers::validate(config.clone())?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn build_backup_repo(&self) -> BackupRepository {
        let backup = self.config.backup();
        BackupRepository::new(backup.get_root_path(), backup.get_create_if_missing())
    }

    /// `provision` prepares the backup storage, it is safe to call on an already provisioned
    /// storage
    pub async fn provision(&self) -> Result<Provision, CommonError> {
        let provision = self
            .build_backup_repo()
            .provision()
            .await
            .map_err(|err| CommonError::StorageError(err.to_string()))?;

        info!(
            "[mediator:provision] {} -> {:?}",
            self.config.backup().get_root_path().display(),
            provision
        );
        Ok(provision)
    }

    /// `list_backups` lists the stored timestamps of a backup, most recent first
    ///
    /// Unlike the `list-backups` message it is an operator facility and requires no signature
    pub async fn list_backups(&self, backup_id: &str) -> Result<Vec<i64>, CommonError> {
        let backup_id = BackupId::new(backup_id)
            .map_err(|err| CommonError::ValidationError(err.to_string()))?;

        list_timestamps(&self.build_backup_repo(), &backup_id)
            .await
            .map_err(|err| CommonError::StorageError(err.to_string()))
    }

    /// `context_builder` starts a context supporting the backup requests, the storage backend
    /// is left to the caller
    pub fn context_builder(&self) -> AgentContextBuilder {
        AgentContextBuilder::new()
            .with_supported_messages(BackupMessage::requests())
            .with_message_type_uris(self.config.agent().use_message_type_uris())
    }

    /// `build_router` builds the inbound router, answering as the configured agent key
    pub fn build_router<TVerifier>(
        &self,
        verifier: TVerifier,
        registry: DispatchRegistry,
    ) -> Router<ContextCrypto<TVerifier>, BackupRepository>
    where
        TVerifier: KeyVerifier + Clone,
    {
        Router::new(
            self.config.agent().get_key(),
            ContextCrypto::new(verifier),
            self.build_backup_repo(),
            registry,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;
    use std::sync::Arc;

    use rst_common::standard::serde_json::json;
    use rst_common::with_tokio::tokio;

    use prople_courier_core::agent::crypto::types::CryptoProvider;
    use prople_courier_core::agent::message::{PackedEnvelope, ProtocolMessage};
    use prople_courier_core::mediator::backup::types::Attachment;

    use crate::common::helpers::testkit::{sign, FakeBackend, FakeVerifier};

    fn write_config(dir: &Path, create_if_missing: bool) -> String {
        let root = dir.join("backups");
        let content = format!(
            r#"
            [agent]
            name = "relay"
            key = "did:key:z6Mkmediator"
            use_message_type_uris = false

            [backup]
            root_path = "{}"
            create_if_missing = {}
            "#,
            root.display(),
            create_if_missing
        );

        let file = dir.join("config.toml");
        std::fs::write(&file, content).unwrap();
        file.display().to_string()
    }

    #[test]
    fn test_new_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.toml");
        std::fs::write(&file, "[agent]\nname = \"\"\nkey = \"\"\n[backup]\nroot_path = \"\"\ncreate_if_missing = true\n").unwrap();

        let mediator = CourierMediator::new(&file.display().to_string());
        assert!(matches!(
            mediator.err(),
            Some(CommonError::ValidationError(_))
        ))
    }

    #[test]
    fn test_new_missing_config() {
        let mediator = CourierMediator::new("/not/existing/config.toml");
        assert!(matches!(mediator.err(), Some(CommonError::ConfigError(_))))
    }

    #[tokio::test]
    async fn test_provision() {
        let dir = tempfile::tempdir().unwrap();
        let mediator = CourierMediator::new(&write_config(dir.path(), true)).unwrap();

        assert_eq!(mediator.provision().await, Ok(Provision::Created));
        assert_eq!(mediator.provision().await, Ok(Provision::AlreadyExists));
    }

    #[tokio::test]
    async fn test_provision_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let mediator = CourierMediator::new(&write_config(dir.path(), false)).unwrap();

        assert!(matches!(
            mediator.provision().await,
            Err(CommonError::StorageError(_))
        ))
    }

    #[tokio::test]
    async fn test_list_backups() {
        let dir = tempfile::tempdir().unwrap();
        let mediator = CourierMediator::new(&write_config(dir.path(), true)).unwrap();
        mediator.provision().await.unwrap();

        assert_eq!(mediator.list_backups("did:key:z6Mkagent").await, Ok(vec![]));
        assert!(matches!(
            mediator.list_backups("../escape").await,
            Err(CommonError::ValidationError(_))
        ));

        let ctx = mediator
            .context_builder()
            .with_session(Arc::new(FakeBackend))
            .build()
            .unwrap();
        assert!(!ctx.use_message_type_uris());

        let router = mediator.build_router(FakeVerifier, DispatchRegistry::new());

        let message_type = BackupMessage::Store.message_type().render(false);
        let message = ProtocolMessage::from_body(
            message_type.clone(),
            &json!({
                "backupId": "did:key:z6Mkagent",
                "payload": [Attachment::from_bytes(None, None, b"state")],
                "payloadSignature": sign("did:key:z6Mkagent", b"state"),
            }),
        )
        .unwrap();

        let payload = ContextCrypto::new(FakeVerifier)
            .pack(
                &ctx,
                message.to_bytes().unwrap(),
                "did:key:z6Mkmediator".to_string(),
                vec![],
                Some("did:key:z6Mkagent".to_string()),
            )
            .await
            .unwrap();

        let reply = router
            .process(&ctx, PackedEnvelope::new(payload, message_type))
            .await;
        assert!(!reply.is_err());
        assert_eq!(
            reply.unwrap().message_type,
            BackupMessage::StoreResponse.message_type().render(false)
        );

        let listed = mediator.list_backups("did:key:z6Mkagent").await.unwrap();
        assert_eq!(listed.len(), 1)
    }
}
