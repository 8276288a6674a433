use std::net::{IpAddr, Ipv4Addr, UdpSocket};

const LOOPBACK: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Addresses worth printing in the startup banner: loopback first, then a
/// specific bind host, then the address of the interface carrying the
/// default route. Other interfaces of a multi-homed machine are not listed.
pub fn reachable_addresses(bind_host: IpAddr) -> Vec<IpAddr> {
    let mut discovered = Vec::new();

    if !bind_host.is_unspecified() {
        discovered.push(bind_host);
    }

    match outbound_address() {
        Some(addr) => discovered.push(addr),
        None => tracing::warn!("Could not determine a network address for this machine"),
    }

    with_loopback(discovered)
}

/// Local address of the interface used for outbound traffic. Connecting a
/// UDP socket only selects a route; nothing is sent.
fn outbound_address() -> Option<IpAddr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect((Ipv4Addr::new(192, 0, 2, 1), 80)).ok()?;
    socket.local_addr().ok().map(|addr| addr.ip())
}

fn with_loopback(mut addresses: Vec<IpAddr>) -> Vec<IpAddr> {
    addresses.retain(|addr| !addr.is_unspecified() && *addr != LOOPBACK);
    addresses.sort();
    addresses.dedup();
    addresses.insert(0, LOOPBACK);
    addresses
}
