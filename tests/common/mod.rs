// Shared test helpers: stub tool scripts standing in for the real net-tools
// binaries.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Writes an executable shell script that prints `body` on stdout.
#[cfg(unix)]
pub fn stub_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    stub_script(dir, name, &format!("#!/bin/sh\ncat <<'STUB_EOF'\n{body}\nSTUB_EOF\n"))
}

/// Writes an arbitrary executable script (for slow or stderr-emitting stubs).
#[cfg(unix)]
pub fn stub_script(dir: &Path, name: &str, script: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    std::fs::write(&path, script).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

/// Classic ifconfig-style link output: a running Ethernet interface, a
/// running point-to-point link, and an up-but-not-running Ethernet port.
pub const LINK_FIXTURE: &str = "\
eth0      Link encap:Ethernet  HWaddr 00:1A:2B:3C:4D:5E
          inet addr:10.0.0.5  Bcast:10.0.0.255  Mask:255.255.255.0
          UP BROADCAST RUNNING MULTICAST  MTU:1500  Metric:1
          RX packets:1200 errors:0 dropped:0 overruns:0 frame:0
          TX packets:800 errors:0 dropped:0 overruns:0 carrier:0
          RX bytes:500000 (488.2 KiB)  TX bytes:250000 (244.1 KiB)

ppp0      Link encap:Point-to-Point Protocol
          inet addr:192.168.9.1  P-t-P:192.168.9.2  Mask:255.255.255.255
          UP POINTOPOINT RUNNING NOARP MULTICAST  MTU:1492  Metric:1
          RX packets:40 errors:0 dropped:0 overruns:0 frame:0
          TX packets:41 errors:0 dropped:0 overruns:0 carrier:0
          RX bytes:2048 (2.0 KiB)  TX bytes:1024 (1.0 KiB)

eth3      Link encap:Ethernet  HWaddr 00:AA:BB:CC:DD:EE
          UP BROADCAST MULTICAST  MTU:1500  Metric:1
          RX packets:0 errors:0 dropped:0 overruns:0 frame:0
          TX packets:0 errors:0 dropped:0 overruns:0 carrier:0
          RX bytes:0 (0.0 b)  TX bytes:0 (0.0 b)

wlan0     Link encap:Ethernet  HWaddr 02:0F:B5:01:02:03
          inet addr:192.168.1.42  Bcast:192.168.1.255  Mask:255.255.255.0
          UP BROADCAST RUNNING MULTICAST  MTU:1500  Metric:1
          RX packets:9000 errors:0 dropped:0 overruns:0 frame:0
          TX packets:7000 errors:0 dropped:0 overruns:0 carrier:0
          RX bytes:7340032 (7.0 MiB)  TX bytes:1048576 (1.0 MiB)
";

pub const WIRELESS_FIXTURE: &str = "\
wlan0     IEEE 802.11  ESSID:\"homelab\"
          Mode:Managed  Frequency:2.437 GHz  Access Point: 00:11:22:33:44:55
          Bit Rate=72.2 Mb/s   Tx-Power=31 dBm
          Link Quality=58/70  Signal level=-52 dBm

eth0      no wireless extensions.

lo        no wireless extensions.
";

pub const ROUTE_FIXTURE: &str = "\
Kernel IP routing table
Destination     Gateway         Genmask         Flags Metric Ref    Use Iface
0.0.0.0         192.168.1.1     0.0.0.0         UG    100    0        0 eth0
10.0.0.0        0.0.0.0         255.255.255.0   U     100    0        0 eth0
192.168.1.0     0.0.0.0         255.255.255.0   U     600    0        0 wlan0
";
