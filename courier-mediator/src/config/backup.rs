use std::path::PathBuf;

use rst_common::standard::serde::{self, Deserialize};

use crate::common::types::{CommonError, ToValidate};

/// `Backup` configures the filesystem storage of the backup relay
#[derive(Deserialize, Debug, Clone)]
#[serde(crate = "self::serde")]
pub struct Backup {
    pub(super) root_path: String,
    pub(super) create_if_missing: bool,
}

impl Backup {
    pub fn get_root_path(&self) -> PathBuf {
        PathBuf::from(&self.root_path)
    }

    pub fn get_create_if_missing(&self) -> bool {
        self.create_if_missing
    }
}

impl Default for Backup {
    fn default() -> Self {
        Self {
            root_path: "".to_string(),
            create_if_missing: true,
        }
    }
}

impl ToValidate for Backup {
    fn validate(&self) -> Result<(), CommonError> {
        if self.root_path.is_empty() {
            return Err(CommonError::ValidationError(
                "config: backup:root_path is missing".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::env;
    use std::path::PathBuf;

    use rstdev_config::format::use_toml;
    use rstdev_config::parser::from_file;
    use rstdev_config::{types::ConfigError, Builder};

    #[test]
    fn test_parse_backup_config() -> Result<(), ConfigError> {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("src/config/fixtures");

        let toml_file = format!("{}/config_backup.toml", path.display());
        let config_toml = {
            let config_builder: Result<Backup, ConfigError> =
                Builder::new(from_file(toml_file)).fetch()?.parse(use_toml);

            config_builder
        };

        assert!(!config_toml.is_err());

        let config_backup = config_toml.unwrap();
        assert_eq!(
            config_backup.get_root_path(),
            PathBuf::from("/var/lib/courier/backups")
        );
        assert!(!config_backup.get_create_if_missing());
        Ok(())
    }
}
