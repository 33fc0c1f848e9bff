use cli_table::{print_stdout, Table, WithTitle};

use rst_common::standard::chrono::{TimeZone, Utc};
use rst_common::with_logging::log::debug;

use prople_courier_mediator::CourierMediator;

use crate::errors::CourierdError;

#[derive(Table, Clone, Debug, PartialEq)]
pub struct BackupRow {
    #[table(title = "Timestamp")]
    timestamp: i64,
    #[table(title = "Stored At")]
    stored_at: String,
}

impl BackupRow {
    fn new(timestamp: i64) -> Self {
        let stored_at = Utc
            .timestamp_opt(timestamp, 0)
            .single()
            .map(|at| at.to_rfc3339())
            .unwrap_or_else(|| "-".to_string());

        Self {
            timestamp,
            stored_at,
        }
    }
}

pub async fn rows(config: &str, backup_id: &str) -> Result<Vec<BackupRow>, CourierdError> {
    let mediator =
        CourierMediator::new(config).map_err(|err| CourierdError::ConfigError(err.to_string()))?;

    let timestamps = mediator
        .list_backups(backup_id)
        .await
        .map_err(|err| CourierdError::MediatorError(err.to_string()))?;

    debug!("[backups] {} -> {} backups", backup_id, timestamps.len());
    Ok(timestamps.into_iter().map(BackupRow::new).collect())
}

pub async fn run(config: &str, backup_id: &str) -> Result<(), CourierdError> {
    let table = rows(config, backup_id).await?;
    print_stdout(table.with_title()).map_err(|err| CourierdError::OutputError(err.to_string()))
}
