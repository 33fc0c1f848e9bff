use rst_common::standard::serde::{self, Deserialize};

use crate::common::types::{CommonError, ToValidate};

use super::{Agent, Backup};

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(crate = "self::serde")]
pub struct Config {
    pub(super) agent: Agent,
    pub(super) backup: Backup,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn backup(&self) -> &Backup {
        &self.backup
    }
}

impl ToValidate for Config {
    fn validate(&self) -> Result<(), CommonError> {
        self.agent.validate()?;
        self.backup.validate()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::helpers;
    use crate::common::types::CommonError;

    #[test]
    fn test_validation_failed() {
        let cfg = Config::new();
        let validation = helpers::validate(cfg);
        assert!(validation.is_err());
        assert!(matches!(
            validation.unwrap_err(),
            CommonError::ValidationError(_)
        ))
    }

    #[test]
    fn test_validation_success() {
        let cfg: Config = toml::from_str(
            r#"
            [agent]
            name = "relay"
            key = "relay-key"

            [backup]
            root_path = "./backups"
            create_if_missing = true
            "#,
        )
        .unwrap();

        assert!(!helpers::validate(cfg).is_err())
    }
}
