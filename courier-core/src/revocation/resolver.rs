use std::sync::Arc;

use rst_common::with_logging::log::{debug, warn};

use super::types::{Registrar, RegistrarError, RegistrationReceipt, RegistryDefinition};

/// `Resolver` selects the single registrar responsible for an issuer
#[derive(Clone, Default)]
pub struct Resolver {
    registrars: Vec<Arc<dyn Registrar>>,
}

impl Resolver {
    pub fn new(registrars: Vec<Arc<dyn Registrar>>) -> Self {
        Self { registrars }
    }

    pub fn with_registrar(mut self, registrar: Arc<dyn Registrar>) -> Self {
        self.registrars.push(registrar);
        self
    }

    /// `resolve` asks every registrar whether it supports the issuer
    ///
    /// It fails with [`RegistrarError::NoRegistrarFound`] when none of them does, and with
    /// [`RegistrarError::AmbiguousRegistrar`] when more than one does
    pub async fn resolve(&self, issuer: String) -> Result<Arc<dyn Registrar>, RegistrarError> {
        if issuer.is_empty() {
            return Err(RegistrarError::ValidationError(
                "issuer was missing".to_string(),
            ));
        }

        let mut matches = Vec::new();
        for registrar in self.registrars.iter() {
            if registrar.supports(issuer.to_owned()).await? {
                matches.push(registrar.clone());
            }
        }

        match matches.len() {
            0 => Err(RegistrarError::NoRegistrarFound(issuer)),
            1 => {
                let registrar = matches.remove(0);
                debug!("[resolver:resolve] {} -> {}", issuer, registrar.name());
                Ok(registrar)
            }
            _ => {
                let names: Vec<String> = matches.iter().map(|r| r.name()).collect();
                warn!(
                    "[resolver:resolve] overlapping registrars for {}: {:?}",
                    issuer, names
                );

                Err(RegistrarError::AmbiguousRegistrar { issuer, names })
            }
        }
    }

    pub async fn register(
        &self,
        definition: RegistryDefinition,
    ) -> Result<RegistrationReceipt, RegistrarError> {
        definition.validate()?;

        let registrar = self.resolve(definition.issuer.to_owned()).await?;
        registrar.register(definition).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rst_common::standard::async_trait::async_trait;
    use rst_common::standard::chrono::Utc;
    use rst_common::with_tokio::tokio;

    use crate::revocation::registrar::PatternRegistrar;
    use crate::revocation::types::RegistryWriter;

    #[derive(Clone)]
    struct LedgerWriter;

    #[async_trait]
    impl RegistryWriter for LedgerWriter {
        async fn write(&self, definition: RegistryDefinition) -> Result<String, RegistrarError> {
            Ok(format!("ledger://{}", definition.id))
        }
    }

    struct BrokenRegistrar;

    #[async_trait]
    impl Registrar for BrokenRegistrar {
        fn name(&self) -> String {
            "broken".to_string()
        }

        async fn supports(&self, _issuer: String) -> Result<bool, RegistrarError> {
            Err(RegistrarError::RegistrarError("unreachable".to_string()))
        }

        async fn register(
            &self,
            definition: RegistryDefinition,
        ) -> Result<RegistrationReceipt, RegistrarError> {
            Ok(RegistrationReceipt {
                registry_id: definition.id,
                registrar: self.name(),
                location: "".to_string(),
                registered_at: Utc::now(),
            })
        }
    }

    fn registrar(name: &str, pattern: &str) -> Arc<dyn Registrar> {
        Arc::new(PatternRegistrar::new(name, vec![pattern], LedgerWriter))
    }

    #[tokio::test]
    async fn test_resolve_exactly_one() {
        let resolver = Resolver::new(vec![registrar("r1", "did:a:*"), registrar("r2", "did:b:*")]);

        let resolved = resolver.resolve("did:a:123".to_string()).await;
        assert!(!resolved.is_err());
        assert_eq!(resolved.unwrap().name(), "r1".to_string());

        let resolved = resolver.resolve("did:b:9".to_string()).await;
        assert_eq!(resolved.unwrap().name(), "r2".to_string());

        let missing = resolver.resolve("did:c:1".to_string()).await;
        assert!(matches!(
            missing.err(),
            Some(RegistrarError::NoRegistrarFound(_))
        ));

        let resolver = resolver.with_registrar(registrar("r3", "did:a:*"));
        let ambiguous = resolver.resolve("did:a:123".to_string()).await;
        match ambiguous.err() {
            Some(RegistrarError::AmbiguousRegistrar { issuer, names }) => {
                assert_eq!(issuer, "did:a:123".to_string());
                assert_eq!(names, vec!["r1".to_string(), "r3".to_string()]);
            }
            _ => panic!("expected ambiguous registrar"),
        }

        let unaffected = resolver.resolve("did:b:9".to_string()).await;
        assert_eq!(unaffected.unwrap().name(), "r2".to_string())
    }

    #[tokio::test]
    async fn test_resolve_without_registrars() {
        let resolver = Resolver::default();
        let missing = resolver.resolve("did:a:123".to_string()).await;
        assert!(matches!(
            missing.err(),
            Some(RegistrarError::NoRegistrarFound(_))
        ))
    }

    #[tokio::test]
    async fn test_resolve_registrar_failure() {
        let resolver = Resolver::new(vec![registrar("r1", "did:a:*"), Arc::new(BrokenRegistrar)]);

        let failed = resolver.resolve("did:a:123".to_string()).await;
        assert!(matches!(
            failed.err(),
            Some(RegistrarError::RegistrarError(_))
        ))
    }

    #[tokio::test]
    async fn test_register_through_resolved() {
        let resolver = Resolver::new(vec![registrar("r1", "did:a:*"), registrar("r2", "did:b:*")]);

        let receipt = resolver
            .register(RegistryDefinition {
                id: "registry-1".to_string(),
                issuer: "did:b:42".to_string(),
                credential_definition_id: "cred-def-1".to_string(),
                max_credentials: 10,
            })
            .await;

        assert!(!receipt.is_err());
        let receipt = receipt.unwrap();
        assert_eq!(receipt.registrar, "r2".to_string());
        assert_eq!(receipt.location, "ledger://registry-1".to_string());

        let ambiguous = resolver
            .with_registrar(registrar("r3", "did:b:*"))
            .register(RegistryDefinition {
                id: "registry-2".to_string(),
                issuer: "did:b:42".to_string(),
                credential_definition_id: "cred-def-1".to_string(),
                max_credentials: 10,
            })
            .await;
        assert!(matches!(
            ambiguous.unwrap_err(),
            RegistrarError::AmbiguousRegistrar { .. }
        ))
    }
}
