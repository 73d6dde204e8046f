use std::collections::HashMap;

use anyhow::Result;
use opendal::services;
use opendal::Operator;

use crate::config::StorageConfig;

/// Build the OpenDAL operator backing one container
pub fn create_operator(config: &StorageConfig) -> Result<Operator> {
    match config {
        StorageConfig::Fs { root } => {
            tracing::info!("Configuring filesystem container with root: {}", root);
            let builder = services::Fs::default().root(root);
            Ok(Operator::new(builder)?.finish())
        }
        StorageConfig::Memory => {
            tracing::info!("Configuring in-memory container");
            Ok(Operator::new(services::Memory::default())?.finish())
        }
        StorageConfig::S3 {
            bucket,
            root,
            region,
            endpoint,
            access_key_id,
            secret_access_key,
            disable_config_load,
            enable_virtual_host_style,
        } => {
            tracing::info!(
                "Configuring S3 container with bucket: {}, region: {:?}",
                bucket,
                region
            );

            let mut builder = services::S3::default()
                .bucket(bucket)
                .root(root.trim_start_matches('/'));

            if let Some(region) = region {
                builder = builder.region(region);
            }
            if let Some(endpoint) = endpoint {
                builder = builder.endpoint(endpoint);
                tracing::debug!("S3 endpoint set to: {}", endpoint);
            }
            if let Some(access_key_id) = access_key_id {
                builder = builder.access_key_id(access_key_id);
            }
            if let Some(secret_access_key) = secret_access_key {
                builder = builder.secret_access_key(secret_access_key);
            }
            if *disable_config_load {
                builder = builder.disable_config_load();
            }
            if *enable_virtual_host_style {
                builder = builder.enable_virtual_host_style();
            }

            Ok(Operator::new(builder)?.finish())
        }
    }
}

/// Build one operator per configured container, probing each once.
///
/// A failed probe is only logged: the container may become reachable later
/// and every request reports its own failure anyway.
pub async fn init_operators(
    containers: &HashMap<String, StorageConfig>,
) -> Result<HashMap<String, Operator>> {
    let mut operators = HashMap::with_capacity(containers.len());
    for (name, config) in containers {
        let operator = create_operator(config)?;
        match operator.check().await {
            Ok(_) => tracing::info!(container = %name, "container backend verified"),
            Err(e) => tracing::warn!(
                container = %name,
                "container backend check failed: {}, continuing anyway",
                e
            ),
        }
        operators.insert(name.clone(), operator);
    }
    Ok(operators)
}
