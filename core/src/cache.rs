//! Query cache and the change events that invalidate it.
//!
//! # Design
//! Mutations do not touch the cache directly. Each one publishes a single
//! `ChangeEvent` and the cache, as the one invalidation subscriber, decides
//! which keys go stale. A device event drops the list for the device's list
//! kind and the cached detail record for its guid.

use std::collections::HashMap;

use tracing::debug;

use crate::types::{Device, DeviceType};

/// Something on the server changed because of a client mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    DeviceChanged { guid: String, device_type: DeviceType },
    DeviceRemoved { guid: String, device_type: DeviceType },
    RuleCreated { input_guid: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// A device list, keyed by list kind (`Sensor` or `Aktuator`).
    Devices(DeviceType),
    Device(String),
}

impl QueryKey {
    pub fn devices(device_type: DeviceType) -> Self {
        QueryKey::Devices(device_type.list_kind())
    }
}

#[derive(Debug, Clone)]
enum Entry {
    List(Vec<Device>),
    One(Device),
}

#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<QueryKey, Entry>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self, device_type: DeviceType) -> Option<&[Device]> {
        match self.entries.get(&QueryKey::devices(device_type)) {
            Some(Entry::List(devices)) => Some(devices),
            _ => None,
        }
    }

    pub fn device(&self, guid: &str) -> Option<&Device> {
        match self.entries.get(&QueryKey::Device(guid.to_string())) {
            Some(Entry::One(device)) => Some(device),
            _ => None,
        }
    }

    pub fn store_list(&mut self, device_type: DeviceType, devices: Vec<Device>) {
        self.entries.insert(QueryKey::devices(device_type), Entry::List(devices));
    }

    pub fn store_device(&mut self, device: Device) {
        self.entries
            .insert(QueryKey::Device(device.guid.clone()), Entry::One(device));
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn invalidate(&mut self, key: &QueryKey) {
        if self.entries.remove(key).is_some() {
            debug!(?key, "query invalidated");
        }
    }

    /// Apply a change event.
    pub fn handle(&mut self, event: &ChangeEvent) {
        match event {
            ChangeEvent::DeviceChanged { guid, device_type }
            | ChangeEvent::DeviceRemoved { guid, device_type } => {
                self.invalidate(&QueryKey::devices(*device_type));
                self.invalidate(&QueryKey::Device(guid.clone()));
            }
            ChangeEvent::RuleCreated { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PowerState;

    fn device(guid: &str, device_type: DeviceType) -> Device {
        Device {
            id: None,
            guid: guid.to_string(),
            mac: "AA".to_string(),
            device_type,
            quantity: 1,
            name: guid.to_string(),
            version: "1".to_string(),
            minor: "a".to_string(),
            status: PowerState::Off,
            status_device: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn seeded() -> QueryCache {
        let mut cache = QueryCache::new();
        cache.store_list(DeviceType::Sensor, vec![device("S1", DeviceType::SensorParking)]);
        cache.store_list(DeviceType::Aktuator, vec![device("A1", DeviceType::Aktuator)]);
        cache.store_device(device("A1", DeviceType::Aktuator));
        cache
    }

    #[test]
    fn subtypes_share_the_sensor_list() {
        let cache = seeded();
        assert_eq!(cache.list(DeviceType::SensorTemperature).unwrap().len(), 1);
    }

    #[test]
    fn device_change_invalidates_only_its_kind() {
        let mut cache = seeded();
        cache.handle(&ChangeEvent::DeviceChanged {
            guid: "A1".to_string(),
            device_type: DeviceType::Aktuator,
        });
        assert!(cache.list(DeviceType::Aktuator).is_none());
        assert!(cache.device("A1").is_none());
        assert!(cache.list(DeviceType::Sensor).is_some());
    }

    #[test]
    fn sensor_subtype_removal_invalidates_sensor_list() {
        let mut cache = seeded();
        cache.handle(&ChangeEvent::DeviceRemoved {
            guid: "S1".to_string(),
            device_type: DeviceType::SensorParking,
        });
        assert!(!cache.contains(&QueryKey::Devices(DeviceType::Sensor)));
        assert!(cache.list(DeviceType::Aktuator).is_some());
    }

    #[test]
    fn rule_creation_keeps_device_queries() {
        let mut cache = seeded();
        cache.handle(&ChangeEvent::RuleCreated {
            input_guid: "S1".to_string(),
        });
        assert!(cache.list(DeviceType::Sensor).is_some());
        assert!(cache.device("A1").is_some());
    }
}
