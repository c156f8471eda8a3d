//! Local address discovery for callback URLs

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

/// Detect the local IPv4 address used for outbound connections
///
/// Connecting a UDP socket only selects a route; no data is sent. Returns
/// `None` when there is no usable route or the chosen address is loopback.
pub fn local_ipv4() -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    usable_ipv4(socket.local_addr().ok()?.ip())
}

fn usable_ipv4(ip: IpAddr) -> Option<Ipv4Addr> {
    match ip {
        IpAddr::V4(addr) if !addr.is_loopback() && !addr.is_unspecified() => Some(addr),
        _ => None,
    }
}

/// Build the URL a device should send NOTIFY requests to
pub fn callback_url(ip: Ipv4Addr, port: u16, callback_path: &str) -> String {
    format!("http://{}:{}{}", ip, port, callback_path)
}
