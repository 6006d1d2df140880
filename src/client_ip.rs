use axum::http::HeaderMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Proxy headers consulted before the peer address, most trusted first.
const FORWARDING_HEADERS: [&str; 4] = [
    "cf-connecting-ip",
    "x-forwarded-for",
    "x-real-ip",
    "client-ip",
];

/// Picks the address sent upstream for geo filtering.
///
/// The first forwarding header holding a public address wins; a header
/// with a comma separated chain contributes its first entry. Private or
/// reserved addresses are only returned when they are the peer address.
pub fn resolve(headers: &HeaderMap, peer: Option<IpAddr>) -> Option<IpAddr> {
    let forwarded = FORWARDING_HEADERS
        .iter()
        .filter_map(|name| headers.get(*name)?.to_str().ok())
        .filter_map(|value| value.split(',').next()?.trim().parse::<IpAddr>().ok());

    forwarded
        .chain(peer)
        .find(|ip| is_public(*ip))
        .or(peer)
}

fn is_public(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_public_v4(v4),
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map_or_else(|| is_public_v6(v6), is_public_v4),
    }
}

fn is_public_v4(ip: Ipv4Addr) -> bool {
    let [first, ..] = ip.octets();
    !(ip.is_private()
        || ip.is_loopback()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast()
        || first == 0
        || first >= 240)
}

fn is_public_v6(ip: Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    !(ip.is_loopback()
        || ip.is_unspecified()
        // unique local fc00::/7
        || first & 0xfe00 == 0xfc00
        // link local fe80::/10
        || first & 0xffc0 == 0xfe80)
}
