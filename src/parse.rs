// Pure parsers: one captured tool output -> map of interface name to facts.
// All parsers are total; malformed input yields empty or partial maps.

use crate::models::{InterfaceKind, WirelessStats};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Facts the link tool reports for one interface in one cycle. Every field
/// beyond `kind`/`available` is an independent best-effort match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkFacts {
    pub kind: InterfaceKind,
    pub available: bool,
    pub ip_address: Option<String>,
    pub broadcast_address: Option<String>,
    pub subnet_mask: Option<String>,
    pub ptp_address: Option<String>,
    pub hw_address: Option<String>,
    pub rx_packets: Option<u64>,
    pub tx_packets: Option<u64>,
    pub rx_bytes: Option<u64>,
    pub tx_bytes: Option<u64>,
}

static ADDR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,3}(?:\.\d{1,3}){3}").unwrap());
static INET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"inet\s+(?:addr:\s*)?(\d{1,3}(?:\.\d{1,3}){3})").unwrap());
static HW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b[0-9a-f]{2}(?::[0-9a-f]{2}){5}\b").unwrap());
// First integer after the packets label; the three further groups
// (errors/drops/overruns) anchor the match and are discarded.
static RX_PACKETS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"RX packets[:\s]+(\d+)\D+\d+\D+\d+\D+\d+").unwrap());
static TX_PACKETS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"TX packets[:\s]+(\d+)\D+\d+\D+\d+\D+\d+").unwrap());
// Byte counters are the integer preceding the parenthesized human size.
static RX_BYTES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"RX [^(\n]*?bytes[:\s]+(\d+)\s*\(").unwrap());
static TX_BYTES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"TX [^(\n]*?bytes[:\s]+(\d+)\s*\(").unwrap());

static ESSID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"ESSID:\s*(?:"([^"]*)"|(\S+))"#).unwrap());
static MODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Mode:\s*(\S+)").unwrap());
static FREQ_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Frequency[:=]\s*([\d.]+(?:\s*\w+)?)").unwrap());
static CHANNEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Channel[:=]?\s*(\d+)").unwrap());
static BIT_RATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bit Rate[:=]\s*([\d.]+(?:\s*[\w/]+)?)").unwrap());
static SIGNAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Signal level[:=]\s*(-?\d+(?:/\d+)?(?:\s*dBm)?)").unwrap());
static NOISE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Noise level[:=]\s*(-?\d+(?:/\d+)?(?:\s*dBm)?)").unwrap());
static QUALITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Link Quality[:=]\s*(\d+(?:/\d+)?)").unwrap());

/// Splits block-structured tool output (ifconfig/iwconfig style) into
/// (interface name, block text) pairs. Blocks are blank-line separated; the
/// name is the block header up to the first whitespace, trailing ':' trimmed
/// (modern ifconfig prints "eth0: flags=...").
fn blocks(text: &str) -> impl Iterator<Item = (&str, &str)> {
    text.split("\n\n").filter_map(|block| {
        let name = block.split_whitespace().next()?.trim_end_matches(':');
        (!name.is_empty()).then_some((name, block))
    })
}

/// Parses the link tool's full output into per-interface facts.
pub fn parse_link_info(text: &str) -> HashMap<String, LinkFacts> {
    blocks(text)
        .map(|(name, block)| (name.to_string(), parse_link_block(block)))
        .collect()
}

fn parse_link_block(block: &str) -> LinkFacts {
    let kind = if block.contains("Ethernet") {
        InterfaceKind::Ethernet
    } else {
        InterfaceKind::Ppp
    };
    let available = block.contains("inet ") || block.contains("RUNNING");
    let mut facts = LinkFacts {
        kind,
        available,
        ..Default::default()
    };
    if !available {
        // Down interface: nothing beyond classification is trustworthy.
        return facts;
    }

    facts.ip_address = INET_RE
        .captures(block)
        .map(|c| c[1].to_string());

    // A line carrying exactly three dotted quads reads addr/broadcast/mask on
    // Ethernet and addr/peer/mask on point-to-point links. Kind must already
    // be decided before roles are assigned.
    for line in block.lines() {
        let addrs: Vec<&str> = ADDR_RE.find_iter(line).map(|m| m.as_str()).collect();
        if addrs.len() == 3 {
            match kind {
                InterfaceKind::Ethernet => {
                    facts.broadcast_address = Some(addrs[1].to_string());
                    facts.subnet_mask = Some(addrs[2].to_string());
                }
                _ => facts.ptp_address = Some(addrs[1].to_string()),
            }
            break;
        }
    }

    if kind == InterfaceKind::Ethernet {
        facts.hw_address = HW_RE.find(block).map(|m| m.as_str().to_string());
    }

    facts.rx_packets = RX_PACKETS_RE
        .captures(block)
        .and_then(|c| c[1].parse().ok());
    facts.tx_packets = TX_PACKETS_RE
        .captures(block)
        .and_then(|c| c[1].parse().ok());
    facts.rx_bytes = RX_BYTES_RE
        .captures(block)
        .and_then(|c| c[1].parse().ok());
    facts.tx_bytes = TX_BYTES_RE
        .captures(block)
        .and_then(|c| c[1].parse().ok());
    facts
}

/// Parses the wireless tool's full output. Interfaces reporting
/// "no wireless extensions" yield no entry at all.
pub fn parse_wireless_info(text: &str) -> HashMap<String, WirelessStats> {
    let mut out = HashMap::new();
    for (name, block) in blocks(text) {
        if block.contains("no wireless extensions") {
            continue;
        }
        let stats = WirelessStats {
            essid: ESSID_RE
                .captures(block)
                .and_then(|c| c.get(1).or_else(|| c.get(2)))
                .map(|m| m.as_str().to_string()),
            mode: capture_string(&MODE_RE, block),
            // Some drivers report a channel number instead of a frequency.
            frequency: capture_string(&FREQ_RE, block)
                .or_else(|| capture_string(&CHANNEL_RE, block)),
            bit_rate: capture_string(&BIT_RATE_RE, block),
            signal_level: capture_string(&SIGNAL_RE, block),
            noise_level: capture_string(&NOISE_RE, block),
            link_quality: capture_string(&QUALITY_RE, block),
        };
        out.insert(name.to_string(), stats);
    }
    out
}

fn capture_string(re: &Regex, block: &str) -> Option<String> {
    re.captures(block).map(|c| c[1].trim().to_string())
}

/// Parses the routing table (`route -n` layout) into interface -> default
/// gateway. Only default-route rows (all-zeros destination) are kept; the
/// first matching row per interface wins.
pub fn parse_routes(text: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for line in text.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() >= 8 && fields[0] == "0.0.0.0" {
            out.entry(fields[7].to_string())
                .or_insert_with(|| fields[1].to_string());
        }
    }
    out
}
