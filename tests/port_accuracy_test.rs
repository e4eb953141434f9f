//! Port accuracy tests against real sockets on the loopback interface
//!
//! Every listener that is open must be reported, and no port without a
//! listener may show up as open.

use std::net::{IpAddr, Ipv4Addr, TcpListener};
use std::sync::Arc;
use std::time::Duration;

use tcpsweep::network::TcpConnectProber;
use tcpsweep::ScanScheduler;

const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Test server that opens multiple ports
struct TestServer {
    _listeners: Vec<TcpListener>,
    ports: Vec<u16>,
}

impl TestServer {
    fn new(count: usize) -> std::io::Result<Self> {
        let mut listeners = Vec::new();
        let mut ports = Vec::new();

        for _ in 0..count {
            let listener = TcpListener::bind("127.0.0.1:0")?;
            ports.push(listener.local_addr()?.port());
            listeners.push(listener);
        }

        Ok(Self {
            _listeners: listeners,
            ports,
        })
    }
}

/// Ports that were just free; nothing listens on them afterwards
fn closed_ports(count: usize) -> Vec<u16> {
    let listeners: Vec<TcpListener> = (0..count)
        .map(|_| TcpListener::bind("127.0.0.1:0").unwrap())
        .collect();
    listeners
        .iter()
        .map(|listener| listener.local_addr().unwrap().port())
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_detects_every_open_port() {
    let server = TestServer::new(25).unwrap();
    let closed = closed_ports(25);

    let mut ports = server.ports.clone();
    ports.extend(&closed);

    let scheduler = ScanScheduler::new(Arc::new(TcpConnectProber::default()));
    let open = scheduler
        .scan(LOCALHOST, &ports, Duration::from_secs(2), 10)
        .await
        .unwrap();

    let mut detected: Vec<u16> = open.iter().map(|o| o.port).collect();
    detected.sort_unstable();
    let mut expected = server.ports.clone();
    expected.sort_unstable();

    assert_eq!(detected, expected, "missed or extra ports");
    assert!(open.iter().all(|o| o.is_open && o.service == "unknown"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_accuracy_independent_of_concurrency() {
    let server = TestServer::new(10).unwrap();
    let mut ports = server.ports.clone();
    ports.extend(closed_ports(10));

    let scheduler = ScanScheduler::new(Arc::new(TcpConnectProber::default()));
    let mut by_cap = Vec::new();
    for cap in [1, 5, 20] {
        let open = scheduler
            .scan(LOCALHOST, &ports, Duration::from_secs(2), cap)
            .await
            .unwrap();
        let mut detected: Vec<u16> = open.iter().map(|o| o.port).collect();
        detected.sort_unstable();
        by_cap.push(detected);
    }

    assert_eq!(by_cap[0], by_cap[1]);
    assert_eq!(by_cap[1], by_cap[2]);
    assert_eq!(by_cap[0].len(), 10);
}
