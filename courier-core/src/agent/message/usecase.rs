use std::sync::Arc;

use http::Uri;

use rst_common::standard::async_trait::async_trait;
use rst_common::with_logging::log::debug;

use crate::agent::context::types::ContextError;
use crate::agent::context::AgentContext;
use crate::agent::crypto::types::{CryptoError, CryptoProvider};

use super::envelope::{PackedEnvelope, ReturnRouteMode, UnpackedMessageContext};
use super::message::ProtocolMessage;
use super::registry::DispatchRegistry;
use super::types::{Dispatcher, MessageAPI, MessageError, UsecaseBuilder};

#[derive(Clone)]
/// `Usecase` is base logic implementation for the [`MessageAPI`]
///
/// Every outbound message is fully validated before anything is packed, so a rejected message
/// never reaches the crypto capability nor a dispatcher
pub struct Usecase<TCrypto>
where
    TCrypto: CryptoProvider + Clone,
{
    crypto: TCrypto,
    registry: Arc<DispatchRegistry>,
}

impl<TCrypto> Usecase<TCrypto>
where
    TCrypto: CryptoProvider + Clone,
{
    pub fn new(crypto: TCrypto, registry: DispatchRegistry) -> Self {
        Self {
            crypto,
            registry: Arc::new(registry),
        }
    }

    fn parse_endpoint(endpoint: &str) -> Result<Uri, MessageError> {
        if endpoint.is_empty() {
            return Err(MessageError::InvalidArgument(
                "endpoint was missing".to_string(),
            ));
        }

        let uri: Uri = endpoint
            .parse()
            .map_err(|err: http::uri::InvalidUri| MessageError::InvalidArgument(err.to_string()))?;

        if uri.scheme_str().is_none() {
            return Err(MessageError::InvalidArgument(format!(
                "endpoint has no scheme: {}",
                endpoint
            )));
        }

        Ok(uri)
    }

    fn prepare(
        &self,
        message: &ProtocolMessage,
        endpoint: &str,
    ) -> Result<(Uri, Arc<dyn Dispatcher>), MessageError> {
        message.validate()?;

        let uri = Self::parse_endpoint(endpoint)?;
        let scheme = uri.scheme_str().unwrap_or_default().to_string();
        let dispatcher = self.registry.resolve(&scheme)?;

        Ok((uri, dispatcher))
    }

    #[allow(clippy::too_many_arguments)]
    async fn pack_and_dispatch(
        &self,
        ctx: &AgentContext,
        message: ProtocolMessage,
        uri: Uri,
        dispatcher: Arc<dyn Dispatcher>,
        recipient_key: String,
        routing_keys: Vec<String>,
        sender_key: Option<String>,
    ) -> Result<Option<PackedEnvelope>, MessageError> {
        let payload = self
            .crypto
            .pack(
                ctx,
                message.to_bytes()?,
                recipient_key,
                routing_keys,
                sender_key,
            )
            .await?;

        debug!(
            "[message:dispatch] message: {} | endpoint: {}",
            message.get_id(),
            uri
        );

        let envelope = PackedEnvelope::new(payload, message.get_type());
        dispatcher.dispatch(uri, envelope).await
    }

    fn unpack_error(err: CryptoError) -> MessageError {
        match err {
            CryptoError::ContextError(ContextError::ConfigurationError(msg)) => {
                MessageError::ConfigurationError(msg)
            }
            _ => MessageError::InvalidMessage {
                reason: "unable to unpack envelope".to_string(),
                source: Some(err),
            },
        }
    }
}

impl<TCrypto> UsecaseBuilder for Usecase<TCrypto>
where
    TCrypto: CryptoProvider + Clone,
{
    type CryptoImplementer = TCrypto;

    fn crypto(&self) -> Self::CryptoImplementer {
        self.crypto.clone()
    }
}

#[async_trait]
impl<TCrypto> MessageAPI for Usecase<TCrypto>
where
    TCrypto: CryptoProvider + Clone,
{
    async fn send(
        &self,
        ctx: &AgentContext,
        message: ProtocolMessage,
        recipient_key: String,
        endpoint: String,
        routing_keys: Vec<String>,
        sender_key: Option<String>,
    ) -> Result<(), MessageError> {
        let (uri, dispatcher) = self.prepare(&message, &endpoint)?;

        let _ = self
            .pack_and_dispatch(
                ctx,
                message,
                uri,
                dispatcher,
                recipient_key,
                routing_keys,
                sender_key,
            )
            .await?;

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    async fn send_receive(
        &self,
        ctx: &AgentContext,
        message: ProtocolMessage,
        recipient_key: String,
        endpoint: String,
        routing_keys: Vec<String>,
        sender_key: Option<String>,
        return_route: ReturnRouteMode,
    ) -> Result<UnpackedMessageContext, MessageError> {
        let (uri, dispatcher) = self.prepare(&message, &endpoint)?;

        let mut message = message;
        message.set_return_route(return_route);

        let response = self
            .pack_and_dispatch(
                ctx,
                message,
                uri,
                dispatcher,
                recipient_key,
                routing_keys,
                sender_key,
            )
            .await?
            .ok_or(MessageError::InvalidOperation(
                "no response received".to_string(),
            ))?;

        if response.is_empty() {
            return Err(MessageError::InvalidOperation(
                "empty response received".to_string(),
            ));
        }

        let unpacked = self
            .crypto
            .unpack(ctx, response.payload)
            .await
            .map_err(Self::unpack_error)?;

        UnpackedMessageContext::try_from(unpacked)
            .map_err(|err| MessageError::InvalidOperation(format!("malformed response: {}", err)))
    }

    async fn receive(
        &self,
        ctx: &AgentContext,
        envelope: PackedEnvelope,
    ) -> Result<UnpackedMessageContext, MessageError> {
        if envelope.is_empty() {
            return Err(MessageError::invalid_message("envelope was empty"));
        }

        let unpacked = self
            .crypto
            .unpack(ctx, envelope.payload)
            .await
            .map_err(Self::unpack_error)?;

        UnpackedMessageContext::try_from(unpacked)
    }
}
