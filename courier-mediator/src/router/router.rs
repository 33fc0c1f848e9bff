use rst_common::with_logging::log::{debug, info, warn};

use prople_courier_core::agent::context::AgentContext;
use prople_courier_core::agent::crypto::types::CryptoProvider;
use prople_courier_core::agent::message::types::{MessageAPI, UsecaseBuilder};
use prople_courier_core::agent::message::{
    DispatchRegistry, PackedEnvelope, ProtocolMessage, UnpackedMessageContext,
    Usecase as MessageUsecase,
};
use prople_courier_core::mediator::backup::types::RepoBackupBuilder;
use prople_courier_core::mediator::backup::{BackupHandler, Usecase as BackupUsecase};

use super::types::MediatorError;

/// `Router` processes the inbound envelopes of the mediator
///
/// Only envelopes addressed to the mediator agent key are accepted, and every response is
/// packed with that key as sender
#[derive(Clone)]
pub struct Router<TCrypto, TRepo>
where
    TCrypto: CryptoProvider + Clone,
    TRepo: RepoBackupBuilder,
{
    agent_key: String,
    messages: MessageUsecase<TCrypto>,
    backup: BackupHandler<BackupUsecase<TRepo, TCrypto>>,
}

impl<TCrypto, TRepo> Router<TCrypto, TRepo>
where
    TCrypto: CryptoProvider + Clone,
    TRepo: RepoBackupBuilder,
{
    pub fn new(agent_key: String, crypto: TCrypto, repo: TRepo, registry: DispatchRegistry) -> Self {
        let backup = BackupHandler::new(BackupUsecase::new(repo, crypto.clone()));
        let messages = MessageUsecase::new(crypto, registry);

        Self {
            agent_key,
            messages,
            backup,
        }
    }

    /// `receive` unpacks an inbound envelope and checks whether it is addressed to the mediator
    /// and supported by it
    pub async fn receive(
        &self,
        ctx: &AgentContext,
        envelope: PackedEnvelope,
    ) -> Result<UnpackedMessageContext, MediatorError> {
        let inbound = self.messages.receive(ctx, envelope).await?;
        if inbound.recipient_key.as_deref() != Some(self.agent_key.as_str()) {
            warn!(
                "[router:receive] envelope addressed to: {:?}",
                inbound.recipient_key
            );
            return Err(MediatorError::MisaddressedEnvelope(
                inbound.recipient_key.unwrap_or_default(),
            ));
        }

        if !ctx.supports(&inbound.message_type) {
            warn!(
                "[router:receive] unsupported message type: {}",
                inbound.message_type
            );
            return Err(MediatorError::UnsupportedMessage(
                inbound.message_type.to_string(),
            ));
        }

        Ok(inbound)
    }

    /// `enqueue` unpacks an inbound envelope and keeps it in the context queue
    pub async fn enqueue(
        &self,
        ctx: &AgentContext,
        envelope: PackedEnvelope,
    ) -> Result<(), MediatorError> {
        let inbound = self.receive(ctx, envelope).await?;
        ctx.queue().enqueue(inbound)?;
        Ok(())
    }

    /// `handle` answers an unpacked message, the response is packed for its sender
    pub async fn handle(
        &self,
        ctx: &AgentContext,
        inbound: UnpackedMessageContext,
    ) -> Result<PackedEnvelope, MediatorError> {
        let (response, sender_key) = self.respond(ctx, &inbound).await?;

        let payload = self
            .messages
            .crypto()
            .pack(
                ctx,
                response.to_bytes()?,
                sender_key,
                vec![],
                Some(self.agent_key.to_owned()),
            )
            .await?;

        Ok(PackedEnvelope::new(payload, response.get_type()))
    }

    /// `process` takes a single envelope through the whole inbound flow
    pub async fn process(
        &self,
        ctx: &AgentContext,
        envelope: PackedEnvelope,
    ) -> Result<PackedEnvelope, MediatorError> {
        let inbound = self.receive(ctx, envelope).await?;
        self.handle(ctx, inbound).await
    }

    /// `process_queue` handles every queued message in arrival order
    ///
    /// A failing message does not stop the processing of the following ones
    pub async fn process_queue(
        &self,
        ctx: &AgentContext,
    ) -> Vec<Result<PackedEnvelope, MediatorError>> {
        let mut outputs = Vec::new();
        while let Some(inbound) = ctx.queue().dequeue().await {
            let output = self.handle(ctx, inbound).await;
            if let Err(err) = &output {
                warn!("[router:process_queue] message failed: {}", err);
            }

            outputs.push(output);
        }

        debug!("[router:process_queue] processed {} messages", outputs.len());
        outputs
    }

    /// `deliver` handles an envelope and sends the response to the sender endpoint, used when
    /// the sender did not ask for a return route
    pub async fn deliver(
        &self,
        ctx: &AgentContext,
        envelope: PackedEnvelope,
        endpoint: String,
    ) -> Result<(), MediatorError> {
        let inbound = self.receive(ctx, envelope).await?;
        let (response, sender_key) = self.respond(ctx, &inbound).await?;

        self.messages
            .send(
                ctx,
                response,
                sender_key,
                endpoint.to_owned(),
                vec![],
                Some(self.agent_key.to_owned()),
            )
            .await?;

        info!("[router:deliver] response delivered to: {}", endpoint);
        Ok(())
    }

    async fn respond(
        &self,
        ctx: &AgentContext,
        inbound: &UnpackedMessageContext,
    ) -> Result<(ProtocolMessage, String), MediatorError> {
        if !ctx.supports(&inbound.message_type) {
            return Err(MediatorError::UnsupportedMessage(
                inbound.message_type.to_string(),
            ));
        }

        let sender_key = inbound
            .sender_key
            .clone()
            .ok_or(MediatorError::AnonymousSender(
                inbound.message_type.to_string(),
            ))?;

        let response = self.backup.handle(ctx, inbound).await?;
        Ok((response, sender_key))
    }
}
