use rst_common::standard::serde::Serialize;
use rst_common::with_logging::log::debug;

use crate::agent::context::AgentContext;
use crate::agent::message::types::MessageError;
use crate::agent::message::{ProtocolMessage, UnpackedMessageContext};

use super::messages::{
    BackupMessage, ListBackups, ListBackupsResponse, RetrieveBackup, RetrieveBackupResponse,
    StoreBackup, StoreBackupResponse,
};
use super::types::{BackupAPI, BackupError};

/// `BackupHandler` maps the inbound backup protocol messages to the [`BackupAPI`]
///
/// Each handled request produces a response message threaded to the request
#[derive(Clone)]
pub struct BackupHandler<TBackup>
where
    TBackup: BackupAPI + Send + Sync,
{
    api: TBackup,
}

impl<TBackup> BackupHandler<TBackup>
where
    TBackup: BackupAPI + Send + Sync,
{
    pub fn new(api: TBackup) -> Self {
        Self { api }
    }

    pub async fn handle(
        &self,
        ctx: &AgentContext,
        inbound: &UnpackedMessageContext,
    ) -> Result<ProtocolMessage, BackupError> {
        let kind = BackupMessage::try_from(&inbound.message_type)?;
        let request = inbound.to_message().map_err(from_message_error)?;
        debug!(
            "[backup:handle] message: {} | type: {}",
            request.get_id(),
            kind.name()
        );

        match kind {
            BackupMessage::Store => {
                let store: StoreBackup = request.parse_body().map_err(from_message_error)?;
                let backup_timestamp = self
                    .api
                    .store(store.backup_id, store.payload, store.payload_signature)
                    .await?;

                build_response(
                    ctx,
                    &request,
                    BackupMessage::StoreResponse,
                    &StoreBackupResponse { backup_timestamp },
                )
            }
            BackupMessage::Retrieve => {
                let retrieve: RetrieveBackup = request.parse_body().map_err(from_message_error)?;
                let payload = self
                    .api
                    .retrieve(retrieve.backup_id, retrieve.signature)
                    .await?;

                build_response(
                    ctx,
                    &request,
                    BackupMessage::RetrieveResponse,
                    &RetrieveBackupResponse { payload },
                )
            }
            BackupMessage::List => {
                let list: ListBackups = request.parse_body().map_err(from_message_error)?;
                let backup_list = self.api.list(list.backup_id).await?;

                build_response(
                    ctx,
                    &request,
                    BackupMessage::ListResponse,
                    &ListBackupsResponse { backup_list },
                )
            }
            _ => Err(BackupError::UnsupportedMessage(
                inbound.message_type.to_string(),
            )),
        }
    }
}

fn build_response<T: Serialize>(
    ctx: &AgentContext,
    request: &ProtocolMessage,
    kind: BackupMessage,
    body: &T,
) -> Result<ProtocolMessage, BackupError> {
    let message_type = kind.message_type().render(ctx.use_message_type_uris());
    let mut response =
        ProtocolMessage::from_body(message_type, body).map_err(from_message_error)?;

    response.set_thread_from(request);
    Ok(response)
}

fn from_message_error(err: MessageError) -> BackupError {
    BackupError::InvalidMessage(err.to_string())
}
