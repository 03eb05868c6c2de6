//! Live client instances keyed by configuration entry

use std::collections::HashMap;

use crate::client::RouterClient;

/// Owner of the live [`RouterClient`] instances, one per configured device
///
/// The calling layer holds one registry and passes it (by reference) to
/// whatever needs a client. There is no interior locking: the registry hands
/// out `&mut` access, so serializing calls against a given device falls out
/// of the borrow rules rather than a runtime discipline.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: HashMap<String, RouterClient>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the client for a config entry, replacing (and returning) any
    /// previous one.
    pub fn insert(
        &mut self,
        entry_id: impl Into<String>,
        client: RouterClient,
    ) -> Option<RouterClient> {
        self.clients.insert(entry_id.into(), client)
    }

    pub fn get_mut(&mut self, entry_id: &str) -> Option<&mut RouterClient> {
        self.clients.get_mut(entry_id)
    }

    /// Drop the client for an unloaded entry, handing it back for teardown.
    pub fn remove(&mut self, entry_id: &str) -> Option<RouterClient> {
        self.clients.remove(entry_id)
    }

    pub fn contains(&self, entry_id: &str) -> bool {
        self.clients.contains_key(entry_id)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
