//! basic example to showcase routing sessions onto service endpoints with SlotRing

extern crate slot_hashring;
use slot_hashring::SlotRing;
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Hash, PartialEq)]
struct EndPoint {
    svc_name: String,
    ip: IpAddr,
}
impl EndPoint {
    fn new(svc_name: &str, ip: &str) -> Arc<Self> {
        Arc::new(EndPoint {
            svc_name: svc_name.to_string(),
            ip: IpAddr::from_str(ip).unwrap(),
        })
    }
}

fn main() -> Result<(), slot_hashring::Error> {
    let endpoints = vec![
        EndPoint::new("svc-1", "192.168.1.10"),
        EndPoint::new("svc-2", "192.168.1.57"),
        EndPoint::new("svc-3", "10.163.68.160"),
        EndPoint::new("svc-4", "::1"),
    ];
    let mut ring = SlotRing::new(endpoints.clone());

    // primary and backup endpoint for a session
    println!("session abc: {:?}", ring.neighbors("abc")?);

    // svc-3 leaves, its slot stays behind as a gap
    ring.remove(&endpoints[2])?;
    println!("session abc after removal: {:?}", ring.neighbors("abc")?);
    println!("slots: {}, occupied: {}", ring.len(), ring.occupied_len());

    // a new endpoint takes over the gap, no other session moves
    let index = ring.insert(EndPoint::new("svc-5", "10.163.68.163"));
    println!("svc-5 placed in slot {index}");

    // maintenance window: drop remaining gaps
    ring.remove(&endpoints[0])?;
    ring.compact();
    println!("after compaction: {:?}", ring.nodes());

    Ok(())
}
