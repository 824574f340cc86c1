// Default route detection: `ip -4 route show default`, falling back to `route -n`

use serde::Serialize;
use std::fmt;
use std::net::Ipv4Addr;

use crate::backends::NetToolsBackend;

/// Minimum number of columns in a well-formed `route -n` row
const LEGACY_MIN_FIELDS: usize = 8;

/// Which query produced the default interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSource {
    Primary,
    Fallback,
}

impl fmt::Display for RouteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteSource::Primary => write!(f, "ip route"),
            RouteSource::Fallback => write!(f, "route -n"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefaultRoute {
    pub interface: String,
    pub source: RouteSource,
}

/// Extract `<name>` from the first `default via <ipv4> dev <name>` sequence
pub fn parse_primary(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let fields: Vec<&str> = line.split_whitespace().collect();
        fields.windows(5).find_map(|w| {
            let is_match = w[0] == "default"
                && w[1] == "via"
                && w[2].parse::<Ipv4Addr>().is_ok()
                && w[3] == "dev";
            is_match.then(|| w[4].to_string())
        })
    })
}

/// Take the last column of the first `0.0.0.0`/`default` row of `route -n`.
///
/// Only the first such row is considered; if it is truncated the result is
/// `None` rather than a guess from a partial line.
pub fn parse_legacy(output: &str) -> Option<String> {
    let fields: Vec<&str> = output
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>())
        .find(|fields| matches!(fields.first(), Some(&"0.0.0.0") | Some(&"default")))?;

    if fields.len() < LEGACY_MIN_FIELDS {
        log::debug!("Ignoring truncated default route row: {:?}", fields);
        return None;
    }

    fields.last().map(|name| name.to_string())
}

/// Find the interface carrying the default IPv4 route, if any
pub fn detect_default_route(backend: &dyn NetToolsBackend) -> Option<DefaultRoute> {
    let primary = backend.default_route().unwrap_or_else(|e| {
        log::debug!("Primary route query failed: {e:#}");
        String::new()
    });

    if let Some(interface) = parse_primary(&primary) {
        log::info!("Default route via {} (ip route)", interface);
        return Some(DefaultRoute {
            interface,
            source: RouteSource::Primary,
        });
    }

    log::debug!("No default route in primary output, trying route -n");
    let legacy = backend.legacy_route_table().unwrap_or_else(|e| {
        log::debug!("Legacy route query failed: {e:#}");
        String::new()
    });

    if let Some(interface) = parse_legacy(&legacy) {
        log::info!("Default route via {} (route -n)", interface);
        return Some(DefaultRoute {
            interface,
            source: RouteSource::Fallback,
        });
    }

    log::warn!("Could not determine the default route interface; it will not be excluded");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::fake::FakeBackend;

    const ROUTE_N: &str = "\
Kernel IP routing table
Destination     Gateway         Genmask         Flags Metric Ref    Use Iface
0.0.0.0         192.168.1.1     0.0.0.0         UG    100    0        0 eth0
192.168.1.0     0.0.0.0         255.255.255.0   U     100    0        0 eth0
";

    #[test]
    fn test_primary_exact_name() {
        assert_eq!(
            parse_primary("default via 10.0.2.1 dev enp0s3"),
            Some("enp0s3".to_string())
        );
        assert_eq!(
            parse_primary("default via 10.0.2.1 dev enp0s3 proto dhcp src 10.0.2.15 metric 100\n"),
            Some("enp0s3".to_string())
        );
    }

    #[test]
    fn test_primary_first_match_wins() {
        let output = "default via 192.168.1.1 dev wlan0 metric 600\ndefault via 10.0.0.1 dev eth0 metric 100\n";
        assert_eq!(parse_primary(output), Some("wlan0".to_string()));
    }

    #[test]
    fn test_primary_requires_gateway_address() {
        assert_eq!(parse_primary("default dev wg0 scope link"), None);
        assert_eq!(parse_primary("default via fe80::1 dev eth0"), None);
        assert_eq!(parse_primary(""), None);
    }

    #[test]
    fn test_legacy_table() {
        assert_eq!(parse_legacy(ROUTE_N), Some("eth0".to_string()));
        assert_eq!(
            parse_legacy("default         gw.lan          0.0.0.0         UG    0      0        0 enp1s0\n"),
            Some("enp1s0".to_string())
        );
    }

    #[test]
    fn test_legacy_truncated_row_is_absent() {
        assert_eq!(parse_legacy("0.0.0.0         192.168.1.1     0.0.0.0         UG\n"), None);
    }

    #[test]
    fn test_legacy_without_default_row() {
        assert_eq!(
            parse_legacy("192.168.1.0     0.0.0.0         255.255.255.0   U     100    0        0 eth0\n"),
            None
        );
    }

    #[test]
    fn test_detect_prefers_primary() {
        let backend = FakeBackend::new("", "default via 10.0.2.1 dev enp0s3\n", ROUTE_N);
        let route = detect_default_route(&backend).unwrap();
        assert_eq!(route.interface, "enp0s3");
        assert_eq!(route.source, RouteSource::Primary);
    }

    #[test]
    fn test_detect_falls_back_on_empty_primary() {
        let backend = FakeBackend::new("", "", ROUTE_N);
        let route = detect_default_route(&backend).unwrap();
        assert_eq!(route.interface, "eth0");
        assert_eq!(route.source, RouteSource::Fallback);
    }

    #[test]
    fn test_detect_falls_back_when_primary_tool_missing() {
        let mut backend = FakeBackend::new("", "", ROUTE_N);
        backend.route = None;
        assert_eq!(detect_default_route(&backend).unwrap().interface, "eth0");
    }

    #[test]
    fn test_detect_absent_on_truncated_fallback() {
        let backend = FakeBackend::new("", "", "0.0.0.0 10.0.0.1 0.0.0.0 UG 0\n");
        assert_eq!(detect_default_route(&backend), None);
    }
}
