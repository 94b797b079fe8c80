//! Prometheus metrics for the watch loop.

use governance::ProposalState;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::time::Duration;

/// Handle for recording kromactl metrics.
///
/// Descriptions are registered with the global registry on creation.
#[derive(Debug, Clone)]
pub struct Metrics {
    _private: (),
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self::register_descriptions();
        Self { _private: () }
    }

    fn register_descriptions() {
        describe_counter!(
            "kromactl_watch_cycles_total",
            "Total number of watch cycles executed"
        );
        describe_counter!(
            "kromactl_watch_cycles_failure_total",
            "Total number of failed watch cycles"
        );
        describe_histogram!(
            "kromactl_watch_cycle_duration_seconds",
            "Duration of each watch cycle in seconds"
        );

        describe_gauge!(
            "kromactl_proposals",
            "Proposals in the lookback window by state"
        );
        describe_gauge!(
            "kromactl_council_pending_transactions",
            "Council transactions submitted but not executed"
        );
        describe_gauge!(
            "kromactl_council_executable_transactions",
            "Pending council transactions that reached quorum"
        );
        describe_gauge!(
            "kromactl_vault_balance_wei",
            "Current ProtocolVault balance in wei"
        );
    }

    pub fn record_cycle(&self, success: bool, duration: Duration) {
        counter!("kromactl_watch_cycles_total").increment(1);
        histogram!("kromactl_watch_cycle_duration_seconds").record(duration.as_secs_f64());

        if !success {
            counter!("kromactl_watch_cycles_failure_total").increment(1);
        }
    }

    pub fn set_proposals(&self, state: ProposalState, count: usize) {
        gauge!("kromactl_proposals", "state" => state.as_str()).set(count as f64);
    }

    pub fn set_council_transactions(&self, pending: usize, executable: usize) {
        gauge!("kromactl_council_pending_transactions").set(pending as f64);
        gauge!("kromactl_council_executable_transactions").set(executable as f64);
    }

    pub fn set_vault_balance(&self, balance_wei: u128) {
        gauge!("kromactl_vault_balance_wei").set(balance_wei as f64);
    }
}

/// Install the Prometheus metrics exporter and start the HTTP server.
pub fn install_prometheus_exporter(port: u16) -> eyre::Result<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::net::SocketAddr;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| eyre::eyre!("Failed to install Prometheus exporter: {}", e))?;

    Ok(())
}
