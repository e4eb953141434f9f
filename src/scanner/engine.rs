//! Bounded-concurrency scan scheduler

use crate::network::{ProbeOutcome, Prober, TcpConnectProber};
use crate::ScanError;
use futures::future::join_all;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};

/// Fans probes out over at most `max_concurrency` concurrent tasks
#[derive(Clone)]
pub struct ScanScheduler {
    prober: Arc<dyn Prober>,
}

impl Default for ScanScheduler {
    fn default() -> Self {
        Self::new(Arc::new(TcpConnectProber::default()))
    }
}

impl ScanScheduler {
    pub fn new(prober: Arc<dyn Prober>) -> Self {
        Self { prober }
    }

    /// Probe every port in `ports` and return the open ones, in no particular order
    ///
    /// A permit is taken from the semaphore before each task is spawned, so
    /// neither tasks nor sockets ever exceed the cap. Each task is cut off at
    /// `timeout` and counted closed. Outcomes are handed to a single collector
    /// over a channel. Returns once every task has finished.
    pub async fn scan(
        &self,
        ip: IpAddr,
        ports: &[u16],
        timeout: Duration,
        max_concurrency: usize,
    ) -> crate::Result<Vec<ProbeOutcome>> {
        if max_concurrency == 0 {
            return Err(ScanError::InvalidInput("Thread count must be greater than 0".to_string()));
        }
        if ports.is_empty() {
            return Ok(Vec::new());
        }

        // More permits than ports would never be used
        let semaphore = Arc::new(Semaphore::new(max_concurrency.min(ports.len())));

        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<ProbeOutcome>();
        let collector = tokio::spawn(async move {
            let mut open = Vec::new();
            while let Some(outcome) = outcome_rx.recv().await {
                if outcome.is_open {
                    log::debug!("{}:{} open ({})", ip, outcome.port, outcome.service);
                    open.push(outcome);
                }
            }
            open
        });

        let mut handles = Vec::with_capacity(ports.len());
        for &port in ports {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| ScanError::UnexpectedError(format!("Scheduler closed: {}", e)))?;
            let prober = self.prober.clone();
            let sender = outcome_tx.clone();

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                // Bounded here too, whatever the prober does with `timeout`
                let outcome = tokio::time::timeout(timeout, prober.probe(ip, port, timeout))
                    .await
                    .unwrap_or_else(|_| {
                        log::trace!("{}:{} exceeded {:?}, counted closed", ip, port, timeout);
                        ProbeOutcome::closed(port)
                    });
                // The collector outlives every sender
                let _ = sender.send(outcome);
            }));
        }
        drop(outcome_tx);

        let mut failure = None;
        for joined in join_all(handles).await {
            if let Err(e) = joined {
                log::error!("Probe task failed: {}", e);
                failure.get_or_insert_with(|| ScanError::UnexpectedError(format!("Probe task failed: {}", e)));
            }
        }

        let open = collector
            .await
            .map_err(|e| ScanError::UnexpectedError(format!("Result collector failed: {}", e)))?;

        match failure {
            Some(err) => Err(err),
            None => Ok(open),
        }
    }
}
