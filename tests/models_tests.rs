// TrafficMeter accounting properties and model serialization (JSON camelCase)

use ifwatch::models::*;
use std::collections::BTreeMap;

#[test]
fn test_meter_first_observation_is_baseline_not_traffic() {
    let mut meter = TrafficMeter::default();
    meter.observe(500_000);
    assert_eq!(meter.accumulated, 500_000);
    assert_eq!(meter.prev_raw, 500_000);
    assert_eq!(meter.cycle_delta, 0, "historical traffic must not count as this cycle's delta");
}

#[test]
fn test_meter_accumulates_deltas_after_baseline() {
    let mut meter = TrafficMeter::default();
    let observations = [1_000u64, 1_500, 1_500, 9_999, 20_000];
    for raw in observations {
        meter.observe(raw);
    }
    // Baseline (first raw) plus the per-cycle deltas since then.
    assert_eq!(meter.accumulated, 1_000 + (20_000 - 1_000));
    assert_eq!(meter.cycle_delta, 20_000 - 9_999);
}

#[test]
fn test_meter_wrap_handling() {
    let mut meter = TrafficMeter {
        accumulated: 5_000,
        prev_raw: 0x7FFF_FFF0,
        cycle_delta: 0,
    };
    meter.observe(10);
    assert_eq!(meter.accumulated, 5_000 + (0x7FFF_FFFF - 0x7FFF_FFF0) + 10);
    assert_eq!(meter.prev_raw, 10);
    assert_eq!(meter.cycle_delta, 10);
}

#[test]
fn test_meter_never_decreases_across_resets() {
    let mut meter = TrafficMeter::default();
    let mut last = 0;
    // Interface reset twice: raw drops back toward zero each time.
    for raw in [100_000u64, 200_000, 50, 3_000, 10, 400] {
        meter.observe(raw);
        assert!(meter.accumulated >= last, "accumulated decreased at raw={raw}");
        last = meter.accumulated;
    }
}

#[test]
fn test_interface_stats_serialization_camel_case() {
    let mut stats = InterfaceStats::new("eth0");
    stats.ip_address = Some("10.0.0.5".into());
    stats.default_gateway = Some("10.0.0.1".into());
    stats.rx_bytes.observe(1234);
    let json = serde_json::to_string(&stats).unwrap();
    assert!(json.contains("\"ipAddress\""));
    assert!(json.contains("\"defaultGateway\""));
    assert!(json.contains("\"rxPacketsTotal\""));
    assert!(json.contains("\"prevRaw\""));
    assert!(json.contains("\"cycleDelta\""));
    let back: InterfaceStats = serde_json::from_str(&json).unwrap();
    assert_eq!(back, stats);
}

#[test]
fn test_interface_kind_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&InterfaceKind::Ethernet).unwrap(), "\"ethernet\"");
    assert_eq!(serde_json::to_string(&InterfaceKind::Ppp).unwrap(), "\"ppp\"");
    assert_eq!(serde_json::to_string(&InterfaceKind::Other).unwrap(), "\"other\"");
}

#[test]
fn test_network_snapshot_json_roundtrip() {
    let mut interfaces = BTreeMap::new();
    let mut eth0 = InterfaceStats::new("eth0");
    eth0.existing = true;
    eth0.available = true;
    eth0.kind = InterfaceKind::Ethernet;
    eth0.wireless = Some(WirelessStats {
        essid: Some("homelab".into()),
        ..Default::default()
    });
    interfaces.insert("eth0".to_string(), eth0);
    let snapshot = NetworkSnapshot {
        timestamp: 12345,
        interfaces,
    };
    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.contains("\"timestamp\":12345"));
    let back: NetworkSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snapshot);
}
