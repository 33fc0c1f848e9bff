use rst_common::standard::async_trait::async_trait;
use rst_common::standard::chrono::{DateTime, Utc};
use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::with_errors::thiserror::{self, Error};

/// `RegistrarError` provides all specific error types relate with the registrar resolution
#[derive(Debug, PartialEq, Error, Clone)]
pub enum RegistrarError {
    #[error("no registrar found for issuer: {0}")]
    NoRegistrarFound(String),

    #[error("ambiguous registrar for issuer: {issuer}, matched: {}", .names.join(", "))]
    AmbiguousRegistrar { issuer: String, names: Vec<String> },

    #[error("registrar error: {0}")]
    RegistrarError(String),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// `RegistryDefinition` is a revocation registry which must be published by a registrar
///
/// The definition itself is created elsewhere, registrars only publish it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(crate = "self::serde")]
#[serde(rename_all = "camelCase")]
pub struct RegistryDefinition {
    pub id: String,
    pub issuer: String,
    pub credential_definition_id: String,
    pub max_credentials: u32,
}

impl RegistryDefinition {
    pub fn validate(&self) -> Result<(), RegistrarError> {
        if self.id.is_empty() {
            return Err(RegistrarError::ValidationError(
                "registry id was missing".to_string(),
            ));
        }

        if self.issuer.is_empty() {
            return Err(RegistrarError::ValidationError(
                "issuer was missing".to_string(),
            ));
        }

        if self.credential_definition_id.is_empty() {
            return Err(RegistrarError::ValidationError(
                "credential definition id was missing".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(crate = "self::serde")]
#[serde(rename_all = "camelCase")]
pub struct RegistrationReceipt {
    pub registry_id: String,
    pub registrar: String,
    pub location: String,
    pub registered_at: DateTime<Utc>,
}

/// `Registrar` publishes revocation registries for the issuers it supports
#[async_trait]
pub trait Registrar: Send + Sync {
    fn name(&self) -> String;

    async fn supports(&self, issuer: String) -> Result<bool, RegistrarError>;

    async fn register(
        &self,
        definition: RegistryDefinition,
    ) -> Result<RegistrationReceipt, RegistrarError>;
}

/// `RegistryWriter` is the backend used by a registrar to persist a registry, it returns the
/// location of the published registry
#[async_trait]
pub trait RegistryWriter: Clone + Send + Sync {
    async fn write(&self, definition: RegistryDefinition) -> Result<String, RegistrarError>;
}
