// Interface state accumulator: owns the canonical per-interface records and
// applies per-source fact maps. Each source mutates only the fields it is
// authoritative for; apply calls are serialized by the one-cycle-at-a-time
// poller, so no locking beyond the table's own RwLock is needed.

use crate::models::{InterfaceKind, InterfaceStats, NetworkSnapshot, WirelessStats};
use crate::parse::LinkFacts;
use std::collections::{BTreeMap, HashMap};

pub struct InterfaceTable {
    records: BTreeMap<String, InterfaceStats>,
}

impl InterfaceTable {
    /// One default record per monitored name: not existing, kind Other,
    /// everything else absent or zero.
    pub fn new(names: &[String]) -> Self {
        let records = names
            .iter()
            .map(|n| (n.clone(), InterfaceStats::new(n.clone())))
            .collect();
        Self { records }
    }

    /// Adds a name to the monitored set. Existing records are kept as-is so
    /// re-tracking does not reset accumulated counters.
    pub fn track(&mut self, name: &str) {
        self.records
            .entry(name.to_string())
            .or_insert_with(|| InterfaceStats::new(name));
    }

    /// Removes a name from the monitored set (explicit user removal; records
    /// are never dropped otherwise).
    pub fn untrack(&mut self, name: &str) {
        self.records.remove(name);
    }

    pub fn get(&self, name: &str) -> Option<&InterfaceStats> {
        self.records.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /// Clones the current records into a broadcast payload.
    pub fn snapshot(&self, timestamp: u64) -> NetworkSnapshot {
        NetworkSnapshot {
            timestamp,
            interfaces: self.records.clone(),
        }
    }

    /// Applies one cycle's link facts. A record absent from the map was not
    /// reported by the link tool at all; its address fields are cleared and
    /// deltas zeroed, but meters and packet totals keep their last values.
    /// Facts for unmonitored names are discarded.
    pub fn apply_link(&mut self, facts: &HashMap<String, LinkFacts>) {
        for record in self.records.values_mut() {
            match facts.get(&record.name) {
                Some(f) => {
                    record.existing = true;
                    record.kind = f.kind;
                    set_available(record, f.available);
                    record.ip_address = f.ip_address.clone();
                    record.broadcast_address = f.broadcast_address.clone();
                    record.subnet_mask = f.subnet_mask.clone();
                    record.ptp_address = f.ptp_address.clone();
                    record.hw_address = f.hw_address.clone();
                    if let Some(p) = f.rx_packets {
                        record.rx_packets_total = p;
                    }
                    if let Some(p) = f.tx_packets {
                        record.tx_packets_total = p;
                    }
                    match f.rx_bytes {
                        Some(raw) => record.rx_bytes.observe(raw),
                        None => record.rx_bytes.cycle_delta = 0,
                    }
                    match f.tx_bytes {
                        Some(raw) => record.tx_bytes.observe(raw),
                        None => record.tx_bytes.cycle_delta = 0,
                    }
                }
                None => {
                    record.existing = false;
                    record.kind = InterfaceKind::Other;
                    set_available(record, false);
                    record.ip_address = None;
                    record.broadcast_address = None;
                    record.subnet_mask = None;
                    record.ptp_address = None;
                    record.hw_address = None;
                    record.rx_bytes.cycle_delta = 0;
                    record.tx_bytes.cycle_delta = 0;
                }
            }
        }
    }

    /// Replaces each record's wireless readings with this cycle's map entry;
    /// absence (including "no wireless extensions") clears them.
    pub fn apply_wireless(&mut self, facts: &HashMap<String, WirelessStats>) {
        for record in self.records.values_mut() {
            record.wireless = facts.get(&record.name).cloned();
        }
    }

    /// Sets each record's default gateway from this cycle's routing capture;
    /// an interface with no default-route row has its gateway cleared, not
    /// left stale.
    pub fn apply_routes(&mut self, gateways: &HashMap<String, String>) {
        for record in self.records.values_mut() {
            record.default_gateway = gateways.get(&record.name).cloned();
        }
    }

    /// Marks every record gone. Invoked after the configured number of
    /// consecutive failed link captures; other fields stay stale until a
    /// successful capture.
    pub fn degrade_links(&mut self) {
        for record in self.records.values_mut() {
            record.existing = false;
            set_available(record, false);
            record.rx_bytes.cycle_delta = 0;
            record.tx_bytes.cycle_delta = 0;
        }
    }
}

fn set_available(record: &mut InterfaceStats, available: bool) {
    if record.available != available {
        tracing::info!(
            interface = %record.name,
            available,
            "interface availability changed"
        );
    }
    record.available = available;
}
