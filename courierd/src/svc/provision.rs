use rst_common::with_logging::log::info;

use prople_courier_core::agent::context::types::Provision;
use prople_courier_mediator::CourierMediator;

use crate::errors::CourierdError;

pub async fn run(config: &str) -> Result<Provision, CourierdError> {
    let mediator =
        CourierMediator::new(config).map_err(|err| CourierdError::ConfigError(err.to_string()))?;

    let provision = mediator
        .provision()
        .await
        .map_err(|err| CourierdError::MediatorError(err.to_string()))?;

    match provision {
        Provision::Created => info!("[provision] backup storage created"),
        Provision::AlreadyExists => info!("[provision] backup storage already provisioned"),
    }

    Ok(provision)
}
