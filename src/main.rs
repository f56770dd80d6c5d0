use ledger_registry::config::Config;
use ledger_registry::model::{ResourceCreate, ResourceTypeCreate, ResourceUpdate};
use ledger_registry::runtime::{setup_tracing, RegistryNetwork};
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let config = Config::from_env()?;
    info!(?config, "Starting registry network");

    let network = RegistryNetwork::new(&config)?;
    network.resource_types.init_ledger().await?;
    network.resources.init_ledger().await?;

    let span = tracing::info_span!("resource_type_creation");
    async {
        info!("Creating resource type");
        network
            .resource_types
            .create(
                "rt1",
                ResourceTypeCreate {
                    name: "Vehicle".to_string(),
                },
            )
            .await
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("resource_creation");
    let resource = async {
        info!("Creating resource");
        network
            .resources
            .create(
                "r1",
                ResourceCreate {
                    name: "Car".to_string(),
                    resource_type_id: "rt1".to_string(),
                },
            )
            .await?;
        network.resources.read("r1").await
    }
    .instrument(span)
    .await?;
    info!(?resource, "Resource created successfully");

    let span = tracing::info_span!("dangling_reference");
    let rejected = async {
        network
            .resources
            .create(
                "r2",
                ResourceCreate {
                    name: "Bike".to_string(),
                    resource_type_id: "rt-missing".to_string(),
                },
            )
            .await
    }
    .instrument(span)
    .await;
    match rejected {
        Ok(()) => error!("Resource with a missing type was accepted"),
        Err(e) => info!(error = %e, "Resource with a missing type rejected"),
    }

    network
        .resources
        .update(
            "r1",
            ResourceUpdate {
                name: Some("Sedan".to_string()),
                resource_type_id: None,
            },
        )
        .await?;
    for item in network.resources.transactions("r1").await? {
        info!(tx_id = %item.tx_id, name = %item.entity.name, "History");
    }
    info!(resources = network.resources.index().await?.len(), "Index");

    network.shutdown().await?;
    info!("Application completed successfully");
    Ok(())
}
