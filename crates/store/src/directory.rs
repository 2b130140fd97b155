//! Resident directory and zone registry.
//!
//! Both are seams: the eligibility step takes trait objects so the
//! static fixtures here can be swapped for a real backing store without
//! touching the step itself.

use std::collections::HashMap;

use relief_common::ResidentRecord;

/// Lookup of resident eligibility records. Total: an unknown name is
/// `None`, never a failure.
pub trait ResidentDirectory: Send + Sync {
    /// Exact, case-sensitive match on the resident's name.
    fn lookup(&self, name: &str) -> Option<ResidentRecord>;
}

/// The currently designated disaster zones. Pure; no failure mode.
pub trait ZoneRegistry: Send + Sync {
    fn active_zones(&self) -> Vec<String>;
}

/// In-memory directory backed by a fixed map.
pub struct StaticResidentDirectory {
    records: HashMap<String, ResidentRecord>,
}

impl StaticResidentDirectory {
    pub fn new(records: HashMap<String, ResidentRecord>) -> Self {
        Self { records }
    }

    /// The demo directory: three residents of Virginia with differing
    /// rebate and relief flags.
    pub fn fixture() -> Self {
        let mut records = HashMap::new();
        records.insert(
            "John Doe".to_string(),
            ResidentRecord {
                address: "123 Maple St, Virginia".into(),
                tax_rebate_eligible: true,
                disaster_affected: false,
            },
        );
        records.insert(
            "Jane Smith".to_string(),
            ResidentRecord {
                address: "456 Oak Ave, Virginia".into(),
                tax_rebate_eligible: false,
                disaster_affected: true,
            },
        );
        records.insert(
            "Ryan Sessions".to_string(),
            ResidentRecord {
                address: "789 Pine Rd, Virginia".into(),
                tax_rebate_eligible: true,
                disaster_affected: true,
            },
        );
        Self { records }
    }
}

impl ResidentDirectory for StaticResidentDirectory {
    fn lookup(&self, name: &str) -> Option<ResidentRecord> {
        self.records.get(name).cloned()
    }
}

/// Zone registry backed by a fixed list.
pub struct StaticZoneRegistry {
    zones: Vec<String>,
}

impl StaticZoneRegistry {
    pub fn new(zones: Vec<String>) -> Self {
        Self { zones }
    }

    /// The demo registry: Virginia, Richmond, Palisades.
    pub fn fixture() -> Self {
        Self {
            zones: vec!["Virginia".into(), "Richmond".into(), "Palisades".into()],
        }
    }
}

impl ZoneRegistry for StaticZoneRegistry {
    fn active_zones(&self) -> Vec<String> {
        self.zones.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_lookup_john_doe() {
        let directory = StaticResidentDirectory::fixture();
        let record = directory.lookup("John Doe").unwrap();
        assert_eq!(record.address, "123 Maple St, Virginia");
        assert!(record.tax_rebate_eligible);
        assert!(!record.disaster_affected);
    }

    #[test]
    fn lookup_is_total() {
        let directory = StaticResidentDirectory::fixture();
        assert!(directory.lookup("Nobody Here").is_none());
        assert!(directory.lookup("").is_none());
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let directory = StaticResidentDirectory::fixture();
        assert!(directory.lookup("john doe").is_none());
        assert!(directory.lookup("John Doe").is_some());
    }

    #[test]
    fn fixture_zones_exact() {
        let registry = StaticZoneRegistry::fixture();
        assert_eq!(
            registry.active_zones(),
            vec![
                "Virginia".to_string(),
                "Richmond".to_string(),
                "Palisades".to_string()
            ]
        );
    }
}
