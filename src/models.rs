// Data contract consumed by observers (tray/config UI): per-interface state
// records plus the per-cycle snapshot published over the broadcast channel.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Classic net-tools byte counters wrap at 31 bits.
pub const RAW_COUNTER_WRAP: u64 = 0x7FFF_FFFF;

/// Interface classification; derived from parser evidence every cycle, never
/// from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceKind {
    Ethernet,
    Ppp,
    #[default]
    Other,
}

/// Wireless extension readings, fully replaced each cycle. Every field is an
/// independent best-effort parse; drivers report wildly different subsets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirelessStats {
    pub essid: Option<String>,
    pub mode: Option<String>,
    pub frequency: Option<String>,
    pub bit_rate: Option<String>,
    pub signal_level: Option<String>,
    pub noise_level: Option<String>,
    pub link_quality: Option<String>,
}

/// Wrap/reset-safe byte accounting for one traffic direction.
///
/// `accumulated` counts bytes observed since monitoring began, not the raw
/// kernel counter: the raw counter resets to zero when an interface is
/// removed and reattached, and wraps on long-lived links.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficMeter {
    pub accumulated: u64,
    pub prev_raw: u64,
    pub cycle_delta: u64,
}

impl TrafficMeter {
    /// Folds a freshly captured raw counter value into the running total.
    /// `cycle_delta` ends up holding this cycle's byte delta (rate basis).
    pub fn observe(&mut self, raw: u64) {
        if raw < self.prev_raw {
            // Wrap or reset of the raw counter.
            self.accumulated = self
                .accumulated
                .saturating_add(RAW_COUNTER_WRAP.saturating_sub(self.prev_raw));
            self.prev_raw = 0;
        }
        if self.accumulated == 0 {
            // First observation since process start: baseline only, do not
            // count traffic that predates monitoring.
            self.accumulated = raw;
            self.prev_raw = raw;
        } else {
            self.accumulated += raw - self.prev_raw;
        }
        self.cycle_delta = raw - self.prev_raw;
        self.prev_raw = raw;
    }
}

/// Canonical state record for one monitored interface. The name is the stable
/// key; everything else is rewritten in place each poll cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceStats {
    pub name: String,
    pub kind: InterfaceKind,
    /// The last poll found this name in the link source at all.
    pub existing: bool,
    /// Administratively up and carrying an IP/route. Implies `existing`.
    pub available: bool,
    pub ip_address: Option<String>,
    pub subnet_mask: Option<String>,
    pub broadcast_address: Option<String>,
    pub ptp_address: Option<String>,
    pub hw_address: Option<String>,
    pub default_gateway: Option<String>,
    pub rx_packets_total: u64,
    pub tx_packets_total: u64,
    pub rx_bytes: TrafficMeter,
    pub tx_bytes: TrafficMeter,
    pub wireless: Option<WirelessStats>,
}

impl InterfaceStats {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: InterfaceKind::Other,
            existing: false,
            available: false,
            ip_address: None,
            subnet_mask: None,
            broadcast_address: None,
            ptp_address: None,
            hw_address: None,
            default_gateway: None,
            rx_packets_total: 0,
            tx_packets_total: 0,
            rx_bytes: TrafficMeter::default(),
            tx_bytes: TrafficMeter::default(),
            wireless: None,
        }
    }
}

/// One completed poll cycle's view of every monitored interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSnapshot {
    pub timestamp: u64,
    pub interfaces: BTreeMap<String, InterfaceStats>,
}
