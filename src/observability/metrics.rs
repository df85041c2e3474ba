use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use tracing::info;
use std::sync::Arc;
use tokio::sync::OnceCell;


// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the process-wide `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE.get_or_init(|| async {
        info!("Initializing Metrics ...");
        Metrics::new()}
    ).await
}

/// Render every registered metric in the Prometheus text format.
pub async fn encode_metrics() -> anyhow::Result<String> {
    let metrics = get_metrics().await;
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&metrics.registry.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}


#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Token exchange
    pub token_requests: IntCounterVec,
    pub token_failures: IntCounterVec,
    pub token_expiry_unix: IntGauge,

    // Dispatch
    pub requests: IntCounterVec,
    pub request_failures: IntCounterVec,
    pub request_duration: HistogramVec,
}

impl Metrics {
    // fixed metric set, names cannot collide
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("rapidclient".into()), None).expect("metrics registry");

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Token
            token_requests: IntCounterVec::new(Opts::new("token_requests_total", "Token exchange attempts by grant"),&["grant"],).expect("token_requests"),
            token_failures: IntCounterVec::new(Opts::new("token_failures_total", "Token exchange failures by grant and reason"),&["grant", "reason"],).expect("token_failures"),
            token_expiry_unix: IntGauge::new("token_expiry_unix_seconds", "Expiry of the currently held token").expect("token_expiry_unix"),

            // Dispatch
            requests: IntCounterVec::new(Opts::new("requests_total", "Dispatched requests by method and status"),&["method", "status"],).expect("requests"),
            request_failures: IntCounterVec::new(Opts::new("request_failures_total", "Dispatch failures by method and reason"),&["method", "reason"],).expect("request_failures"),
            request_duration: HistogramVec::new(HistogramOpts::new("request_duration_seconds", "Dispatch duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 30.0]),&["method"],).expect("request_duration"),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.token_requests.clone())).expect("register token_requests");
        reg.register(Box::new(metrics.token_failures.clone())).expect("register token_failures");
        reg.register(Box::new(metrics.token_expiry_unix.clone())).expect("register token_expiry_unix");
        reg.register(Box::new(metrics.requests.clone())).expect("register requests");
        reg.register(Box::new(metrics.request_failures.clone())).expect("register request_failures");
        reg.register(Box::new(metrics.request_duration.clone())).expect("register request_duration");

        metrics
    }
}
