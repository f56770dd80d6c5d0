use crate::clients::RegistryClient;
use crate::config::Config;
use crate::model::{Resource, ResourceType};
use crate::runtime::{Gateway, Peer, PeerError};
use crate::{resource_contract, resource_type_contract};
use tracing::info;

/// A peer with both registries deployed and wired together.
///
/// `RegistryNetwork` is responsible for:
/// - **Lifecycle**: starting the ledger task and stopping it on [`shutdown`](Self::shutdown)
/// - **Wiring**: deploying the resource contract so that it validates references
///   through whichever name the resource type contract was deployed under
///
/// ```ignore
/// let network = RegistryNetwork::new(&Config::default())?;
/// network.resource_types.create("rt1", ResourceTypeCreate { name: "Vehicle".into() }).await?;
/// network.shutdown().await?;
/// ```
pub struct RegistryNetwork {
    pub resource_types: RegistryClient<ResourceType>,
    pub resources: RegistryClient<Resource>,
    peer: Peer,
}

impl RegistryNetwork {
    pub fn new(config: &Config) -> Result<Self, PeerError> {
        let peer = Peer::new(config)?;

        peer.deploy(resource_type_contract::new(&config.resource_types_contract))?;
        peer.deploy(resource_contract::new(
            &config.resources_contract,
            &config.resource_types_contract,
        ))?;

        let resource_types = RegistryClient::new(peer.gateway(), &config.resource_types_contract);
        let resources = RegistryClient::new(peer.gateway(), &config.resources_contract);

        info!(
            resource_types = %config.resource_types_contract,
            resources = %config.resources_contract,
            "Registry network ready"
        );
        Ok(Self {
            resource_types,
            resources,
            peer,
        })
    }

    pub fn gateway(&self) -> Gateway {
        self.peer.gateway()
    }

    pub fn open_cursors(&self) -> usize {
        self.peer.open_cursors()
    }

    /// Drops the clients and stops the peer.
    pub async fn shutdown(self) -> Result<(), PeerError> {
        drop(self.resource_types);
        drop(self.resources);
        self.peer.shutdown().await
    }
}
