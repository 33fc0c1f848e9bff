use rst_common::standard::serde::{self, Deserialize};

use crate::common::types::{CommonError, ToValidate};

/// `Agent` is the identity of the mediator agent itself
#[derive(Deserialize, Debug, Clone)]
#[serde(crate = "self::serde")]
pub struct Agent {
    pub(super) name: String,
    pub(super) key: String,

    #[serde(default = "default_use_message_type_uris")]
    pub(super) use_message_type_uris: bool,
}

fn default_use_message_type_uris() -> bool {
    true
}

impl Agent {
    pub fn get_name(&self) -> String {
        self.name.to_owned()
    }

    pub fn get_key(&self) -> String {
        self.key.to_owned()
    }

    pub fn use_message_type_uris(&self) -> bool {
        self.use_message_type_uris
    }
}

impl Default for Agent {
    fn default() -> Self {
        Self {
            name: "courier-mediator".to_string(),
            key: "".to_string(),
            use_message_type_uris: default_use_message_type_uris(),
        }
    }
}

impl ToValidate for Agent {
    fn validate(&self) -> Result<(), CommonError> {
        if self.name.is_empty() {
            return Err(CommonError::ValidationError(
                "config: agent:name is missing".to_string(),
            ));
        }

        if self.key.is_empty() {
            return Err(CommonError::ValidationError(
                "config: agent:key is missing".to_string(),
            ));
        }

        Ok(())
    }
}
