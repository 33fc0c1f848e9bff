use rst_common::standard::async_trait::async_trait;
use rst_common::standard::chrono::Utc;
use rst_common::with_logging::log::debug;

use super::types::{
    Registrar, RegistrarError, RegistrationReceipt, RegistryDefinition, RegistryWriter,
};

/// `PatternRegistrar` supports the issuers matching one of its patterns
///
/// A pattern either matches an issuer exactly, or when it ends with `*` it matches every
/// issuer starting with the text before the wildcard
#[derive(Clone)]
pub struct PatternRegistrar<TWriter>
where
    TWriter: RegistryWriter,
{
    name: String,
    patterns: Vec<String>,
    writer: TWriter,
}

impl<TWriter> PatternRegistrar<TWriter>
where
    TWriter: RegistryWriter,
{
    pub fn new(name: &str, patterns: Vec<&str>, writer: TWriter) -> Self {
        Self {
            name: name.to_string(),
            patterns: patterns.into_iter().map(|p| p.to_string()).collect(),
            writer,
        }
    }

    fn matches(&self, issuer: &str) -> bool {
        self.patterns.iter().any(|pattern| match pattern.strip_suffix('*') {
            Some(prefix) => issuer.starts_with(prefix),
            None => pattern == issuer,
        })
    }
}

#[async_trait]
impl<TWriter> Registrar for PatternRegistrar<TWriter>
where
    TWriter: RegistryWriter,
{
    fn name(&self) -> String {
        self.name.to_owned()
    }

    async fn supports(&self, issuer: String) -> Result<bool, RegistrarError> {
        Ok(!issuer.is_empty() && self.matches(&issuer))
    }

    async fn register(
        &self,
        definition: RegistryDefinition,
    ) -> Result<RegistrationReceipt, RegistrarError> {
        definition.validate()?;
        if !self.matches(&definition.issuer) {
            return Err(RegistrarError::RegistrarError(format!(
                "{} does not support issuer: {}",
                self.name, definition.issuer
            )));
        }

        let registry_id = definition.id.to_owned();
        let location = self.writer.write(definition).await?;
        debug!(
            "[registrar:register] {} published {} at {}",
            self.name, registry_id, location
        );

        Ok(RegistrationReceipt {
            registry_id,
            registrar: self.name.to_owned(),
            location,
            registered_at: Utc::now(),
        })
    }
}
