//! Per-device interface tables.
//!
//! This file manages the named interface collection owned by a device:
//! insertion-ordered entries, duplicate-name rejection, and per-entry
//! connection state toward a fabric.

use log::debug;

use super::addr::{Interface, InterfaceError};

/// Identity of an interface within its owning device.
///
/// Ids are assigned at insertion and never reused, so routing state can
/// refer to an interface regardless of what else is added or removed.
pub type InterfaceId = u64;

/// What an interface is connected to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerRef {
    /// Name of the fabric holding the far end
    pub fabric: String,
    /// Port number on that fabric
    pub port: usize,
}

/// A named interface slot on a device
#[derive(Debug, Clone)]
pub struct InterfaceEntry {
    id: InterfaceId,
    connected_to: Option<PeerRef>,
    iface: Interface,
}

impl InterfaceEntry {
    pub fn id(&self) -> InterfaceId {
        self.id
    }

    pub fn connected_to(&self) -> Option<&PeerRef> {
        self.connected_to.as_ref()
    }

    pub fn iface(&self) -> &Interface {
        &self.iface
    }

    pub(crate) fn iface_mut(&mut self) -> &mut Interface {
        &mut self.iface
    }
}

/// Insertion-ordered collection of named interfaces with duplicate detection.
///
/// Assigning a name that already exists fails instead of overwriting or
/// renaming the collision away.
#[derive(Debug)]
pub struct InterfaceSet {
    entries: Vec<InterfaceEntry>,
    next_id: InterfaceId,
}

impl InterfaceSet {
    pub fn new() -> Self {
        InterfaceSet {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a new named interface, copied from `template` when one is given.
    ///
    /// The stored interface carries `name` even when built from a template,
    /// so the template descriptor and the stored copy stay independent.
    pub fn insert(
        &mut self,
        name: &str,
        template: Option<&Interface>,
    ) -> Result<InterfaceId, InterfaceError> {
        if self.entries.iter().any(|e| e.iface.name() == name) {
            return Err(InterfaceError::DuplicateName {
                name: name.to_string(),
            });
        }

        let iface = match template {
            Some(template) => template.renamed(name),
            None => Interface::new(name),
        };

        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(InterfaceEntry {
            id,
            connected_to: None,
            iface,
        });
        Ok(id)
    }

    /// Remove an interface by name, returning its entry. Unknown names
    /// return `None` rather than failing.
    pub fn remove(&mut self, name: &str) -> Option<InterfaceEntry> {
        let pos = self.entries.iter().position(|e| e.iface.name() == name)?;
        Some(self.entries.remove(pos))
    }

    pub fn get(&self, name: &str) -> Option<&InterfaceEntry> {
        self.entries.iter().find(|e| e.iface.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut InterfaceEntry> {
        self.entries.iter_mut().find(|e| e.iface.name() == name)
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &InterfaceEntry> {
        self.entries.iter()
    }

    /// Point `name` at `peer`. Unknown names are tolerated; repeat calls
    /// overwrite the previous peer.
    pub fn connect(&mut self, name: &str, peer: PeerRef) {
        if let Some(entry) = self.get_mut(name) {
            debug!("interface {} now connects to {}:{}", name, peer.fabric, peer.port);
            entry.connected_to = Some(peer);
        }
    }

    /// Clear the connection state of `name`. Idempotent; unknown names are
    /// tolerated.
    pub fn disconnect(&mut self, name: &str) {
        if let Some(entry) = self.get_mut(name) {
            entry.connected_to = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(port: usize) -> PeerRef {
        PeerRef {
            fabric: "switch0".to_string(),
            port,
        }
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut set = InterfaceSet::new();
        set.insert("eth0", None).unwrap();

        assert_eq!(
            set.insert("eth0", None),
            Err(InterfaceError::DuplicateName {
                name: "eth0".to_string()
            })
        );
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_insert_from_template_is_a_copy() {
        let mut template = Interface::new("template");
        template.set_address("192.168.10.10").unwrap();
        template.set_prefix_len(22).unwrap();

        let mut set = InterfaceSet::new();
        set.insert("eth0", Some(&template)).unwrap();

        // The stored interface takes the assigned name
        let entry = set.get("eth0").unwrap();
        assert_eq!(entry.iface().name(), "eth0");
        assert_eq!(entry.iface().address(), Some("192.168.10.10".parse().unwrap()));

        // Later template mutation does not reach the stored copy
        template.set_address("10.0.0.1").unwrap();
        let entry = set.get("eth0").unwrap();
        assert_eq!(entry.iface().address(), Some("192.168.10.10".parse().unwrap()));
    }

    #[test]
    fn test_ids_are_unique_and_never_reused() {
        let mut set = InterfaceSet::new();
        let first = set.insert("eth0", None).unwrap();
        let second = set.insert("eth1", None).unwrap();
        assert_ne!(first, second);

        set.remove("eth1");
        let third = set.insert("eth1", None).unwrap();
        assert_ne!(third, second);
        assert_ne!(third, first);
    }

    #[test]
    fn test_remove_unknown_returns_none() {
        let mut set = InterfaceSet::new();
        set.insert("eth0", None).unwrap();
        assert!(set.remove("eth9").is_none());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_connect_disconnect_idempotent() {
        let mut set = InterfaceSet::new();
        set.insert("eth0", None).unwrap();

        // Unknown names are tolerated on both operations
        set.connect("eth9", peer(1));
        set.disconnect("eth9");

        set.connect("eth0", peer(1));
        set.connect("eth0", peer(2));
        assert_eq!(set.get("eth0").unwrap().connected_to(), Some(&peer(2)));

        set.disconnect("eth0");
        set.disconnect("eth0");
        assert_eq!(set.get("eth0").unwrap().connected_to(), None);
    }

    #[test]
    fn test_iteration_preserves_insertion_order() {
        let mut set = InterfaceSet::new();
        set.insert("eth2", None).unwrap();
        set.insert("eth0", None).unwrap();
        set.insert("eth1", None).unwrap();

        let names: Vec<&str> = set.iter().map(|e| e.iface().name()).collect();
        assert_eq!(names, vec!["eth2", "eth0", "eth1"]);
    }
}
