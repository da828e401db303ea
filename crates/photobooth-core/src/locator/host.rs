//! Host classification for locator rewriting.

use std::net::{Ipv4Addr, Ipv6Addr};
use url::Host;

/// True for `localhost`, any `*.localhost` name, `127.0.0.0/8`, `::1`
/// and IPv4-mapped loopback addresses.
pub fn is_loopback(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(name) => {
            let name = name.trim_end_matches('.');
            name.eq_ignore_ascii_case("localhost")
                || name
                    .rsplit_once('.')
                    .map(|(_, tld)| tld.eq_ignore_ascii_case("localhost"))
                    .unwrap_or(false)
                || is_loopback_literal(name)
        }
        Host::Ipv4(addr) => addr.is_loopback(),
        Host::Ipv6(addr) => is_loopback_v6(addr),
    }
}

/// True if `host` is one of `placeholders` (ASCII case-insensitive).
pub fn is_placeholder(host: &Host<&str>, placeholders: &[String]) -> bool {
    match host {
        Host::Domain(name) => {
            let name = name.trim_end_matches('.');
            placeholders
                .iter()
                .any(|p| p.trim().eq_ignore_ascii_case(name))
        }
        Host::Ipv4(_) | Host::Ipv6(_) => false,
    }
}

fn is_loopback_v6(addr: &Ipv6Addr) -> bool {
    addr.is_loopback()
        || addr
            .to_ipv4_mapped()
            .map(|v4| v4.is_loopback())
            .unwrap_or(false)
}

/// Non-special schemes keep IP literals as opaque domain strings.
fn is_loopback_literal(name: &str) -> bool {
    if let Ok(v4) = name.parse::<Ipv4Addr>() {
        return v4.is_loopback();
    }
    let bracketed = name.trim_start_matches('[').trim_end_matches(']');
    bracketed
        .parse::<Ipv6Addr>()
        .map(|v6| is_loopback_v6(&v6))
        .unwrap_or(false)
}
