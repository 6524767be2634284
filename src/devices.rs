//! Device Registry
//!
//! Cast devices arrive one by one from discovery; playback clients are
//! fetched from the server whenever they are marked dirty. The discovery
//! task is the only writer and always swaps in a complete snapshot, so
//! readers never observe a half-applied update.

use crate::error::{AssistError, AssistResult};
use crate::providers::ClientSource;
use crate::utils::fuzzy::{fuzzy, Scorer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// A playback client registered with the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub title: String,
    pub machine_id: String,
}

/// A discovered cast device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceHandle {
    pub friendly_name: String,
    #[serde(default)]
    pub address: Option<String>,
}

impl DeviceHandle {
    pub fn new(friendly_name: impl Into<String>) -> Self {
        Self {
            friendly_name: friendly_name.into(),
            address: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Cast,
    Client,
}

/// Where playback should go
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceTarget {
    pub name: String,
    pub kind: DeviceKind,
    /// Cast address or client machine id
    pub id: Option<String>,
}

/// Immutable view of everything playback can be sent to
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceSnapshot {
    devices: BTreeMap<String, DeviceHandle>,
    clients: Vec<Client>,
    aliases: BTreeMap<String, String>,
}

impl DeviceSnapshot {
    pub fn device_names(&self) -> Vec<String> {
        self.devices.keys().cloned().collect()
    }

    pub fn client_names(&self) -> Vec<String> {
        self.clients.iter().map(|c| c.title.clone()).collect()
    }

    pub fn alias_names(&self) -> Vec<String> {
        self.aliases.keys().cloned().collect()
    }

    /// Devices, then clients, then aliases
    pub fn all_names(&self) -> Vec<String> {
        let mut names = self.device_names();
        names.extend(self.client_names());
        names.extend(self.alias_names());
        names
    }

    fn target(&self, name: &str) -> Option<DeviceTarget> {
        if let Some(handle) = self.devices.get(name) {
            return Some(DeviceTarget {
                name: name.to_string(),
                kind: DeviceKind::Cast,
                id: handle.address.clone(),
            });
        }
        self.clients
            .iter()
            .find(|c| c.title == name)
            .map(|c| DeviceTarget {
                name: c.title.clone(),
                kind: DeviceKind::Client,
                id: Some(c.machine_id.clone()),
            })
    }
}

/// Events produced by device discovery
#[derive(Debug, Clone, PartialEq)]
pub enum DiscoveryEvent {
    Device(DeviceHandle),
    ClientsChanged,
}

#[derive(Debug)]
pub struct DeviceRegistry {
    current: RwLock<Arc<DeviceSnapshot>>,
    clients_dirty: AtomicBool,
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

impl DeviceRegistry {
    /// `aliases` maps a spoken name to a device or client name.
    /// Clients start dirty so the first discovery event fetches them.
    pub fn new(aliases: HashMap<String, String>) -> Self {
        let snapshot = DeviceSnapshot {
            aliases: aliases.into_iter().collect(),
            ..Default::default()
        };
        Self {
            current: RwLock::new(Arc::new(snapshot)),
            clients_dirty: AtomicBool::new(true),
        }
    }

    pub fn snapshot(&self) -> Arc<DeviceSnapshot> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    pub fn replace(&self, snapshot: DeviceSnapshot) {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(snapshot);
    }

    pub fn mark_clients_dirty(&self) {
        self.clients_dirty.store(true, Ordering::Release);
    }

    /// Apply one discovery event. Only the discovery task calls this.
    pub async fn apply(&self, event: DiscoveryEvent, source: &dyn ClientSource) {
        let mut next = (*self.snapshot()).clone();

        match event {
            DiscoveryEvent::Device(handle) => {
                info!("📡 Discovered cast device: {}", handle.friendly_name);
                next.devices.insert(handle.friendly_name.clone(), handle);
            }
            DiscoveryEvent::ClientsChanged => self.mark_clients_dirty(),
        }

        if self.clients_dirty.swap(false, Ordering::AcqRel) {
            match source.clients().await {
                Ok(clients) => {
                    debug!("Fetched {} clients", clients.len());
                    next.clients = clients;
                }
                Err(e) => {
                    warn!("⚠️ Could not fetch clients: {}", e);
                    self.mark_clients_dirty();
                }
            }
        }

        self.replace(next);
    }

    /// Fuzzy-match a spoken device name. Aliases resolve to their target.
    pub fn resolve(&self, name: &str, cutoff: u8) -> AssistResult<DeviceTarget> {
        let snapshot = self.snapshot();
        let best = fuzzy(name, &snapshot.all_names(), Scorer::Quick);
        if best.value.is_empty() || best.score < cutoff {
            return Err(AssistError::DeviceNotFound(name.to_string()));
        }

        let target_name = snapshot
            .aliases
            .get(&best.value)
            .cloned()
            .unwrap_or(best.value);
        debug!("🎯 Device '{}' -> '{}' ({})", name, target_name, best.score);

        snapshot
            .target(&target_name)
            .ok_or(AssistError::DeviceNotFound(target_name))
    }
}

/// Drain discovery events into the registry until the sender side closes
pub async fn run_discovery(
    registry: Arc<DeviceRegistry>,
    mut events: mpsc::Receiver<DiscoveryEvent>,
    source: Arc<dyn ClientSource>,
) {
    while let Some(event) = events.recv().await {
        registry.apply(event, source.as_ref()).await;
    }
    debug!("Discovery channel closed");
}
