//! End-to-end scans through `ScanService`

use std::net::{IpAddr, TcpListener};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::json;
use tcpsweep::{
    network::{HostResolver, SystemResolver, TcpConnectProber},
    PortRange, PortSet, ProbeOutcome, Prober, ScanConfig, ScanError, ScanReport, ScanRequest,
    ScanService, Settings,
};

fn request(value: serde_json::Value) -> ScanRequest {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn test_localhost_single_port() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let service = ScanService::new(&Settings::default());
    let result = service
        .run_scan(request(json!({"target": "127.0.0.1", "portRange": [port, port]})))
        .await
        .unwrap();

    assert_eq!(result.target, "127.0.0.1");
    assert_eq!(result.open_ports, vec![ProbeOutcome::open(port, "unknown")]);
    assert_eq!(result.total_open, 1);

    let report = ScanReport::from(&result);
    assert_eq!(report.total_open_ports, 1);
    assert_eq!(report.open_ports[0].port, port);
}

#[tokio::test]
async fn test_hostname_is_resolved() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let config = ScanConfig::new("localhost")
        .with_ports(PortSet::Range(PortRange::new(port as i64, port as i64).unwrap()))
        .with_timeout(Duration::from_millis(500));

    let service = ScanService::with_components(
        Arc::new(SystemResolver),
        Arc::new(TcpConnectProber::default()),
        &Settings::default(),
    );
    let result = service.execute(config).await.unwrap();

    assert!(result.target_ip.is_loopback());
    assert_eq!(result.target, "localhost");
}

#[tokio::test]
async fn test_unresolvable_host() {
    let service = ScanService::new(&Settings::default());
    let err = service
        .run_scan(request(json!({"target": "no-such-host.invalid"})))
        .await
        .unwrap_err();

    assert!(matches!(err, ScanError::ResolutionError { .. }));
    assert_eq!(err.to_string(), "Could not resolve hostname 'no-such-host.invalid'");
}

#[tokio::test]
async fn test_closed_range_is_empty_success() {
    // Grab a free port and release it so nothing listens there
    let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();

    let service = ScanService::new(&Settings::default());
    let result = service
        .run_scan(request(json!({"target": "127.0.0.1", "portRange": [port, port], "timeout": 0.5})))
        .await
        .unwrap();

    assert!(result.open_ports.is_empty());
    assert_eq!(result.total_open, 0);
    assert!(result.scan_duration < Duration::from_secs(5));
}

#[tokio::test]
async fn test_unroutable_target_bounded_by_timeout() {
    // TEST-NET-1 is never routed; connects either fail fast or hit the timeout
    let service = ScanService::new(&Settings::default());
    let started = Instant::now();
    let result = service
        .run_scan(request(json!({
            "target": "192.0.2.1",
            "portRange": [1, 50],
            "timeout": 0.2,
            "threads": 50,
        })))
        .await
        .unwrap();

    assert!(result.open_ports.is_empty());
    assert!(started.elapsed() < Duration::from_secs(5));
}

/// Every probe takes a fixed time; port 22 is open
struct SlowProber(Duration);

#[async_trait]
impl Prober for SlowProber {
    async fn probe(&self, _ip: IpAddr, port: u16, _timeout: Duration) -> ProbeOutcome {
        tokio::time::sleep(self.0).await;
        if port == 22 {
            ProbeOutcome::open(port, "ssh")
        } else {
            ProbeOutcome::closed(port)
        }
    }
}

struct Loopback;

#[async_trait]
impl HostResolver for Loopback {
    async fn resolve_hostname(&self, _name: &str) -> tcpsweep::Result<IpAddr> {
        Ok(IpAddr::from([127, 0, 0, 1]))
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_changes_latency_not_results() {
    let delay = Duration::from_millis(25);
    let service = ScanService::with_components(
        Arc::new(Loopback),
        Arc::new(SlowProber(delay)),
        &Settings::default(),
    );

    let serial = service
        .run_scan(request(json!({"target": "box", "portRange": [11, 30], "threads": 1})))
        .await
        .unwrap();
    let parallel = service
        .run_scan(request(json!({"target": "box", "portRange": [11, 30], "threads": 20})))
        .await
        .unwrap();

    assert_eq!(serial.open_ports, parallel.open_ports);
    assert_eq!(serial.port_numbers(), vec![22]);
    assert!(serial.scan_duration >= delay * 20);
    assert!(parallel.scan_duration < serial.scan_duration);
}
