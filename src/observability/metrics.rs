use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use tracing::info;
use std::sync::Arc;
use tokio::sync::OnceCell;


// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE.get_or_init(|| async {
        info!("Initializing Metrics ...");
        Metrics::new()}
    ).await
}


#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Upstream metrics
    pub upstream_requests: IntCounterVec,
    pub upstream_failures: IntCounterVec,
    pub upstream_duration: HistogramVec,

    // Token metrics
    pub auth_exchanges: IntCounterVec,
    pub token_invalidations: IntCounter,
    pub token_expiry_unix: IntGauge,

    // Public routes
    pub http_responses: IntCounterVec,

    // Config/runtime
    pub config_validation_errors: IntCounter,
    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("catalogproxy".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Upstream
            upstream_requests: IntCounterVec::new(Opts::new("upstream_requests_total","Total upstream calls by path",),&["path", "method"],).unwrap(),
            upstream_failures: IntCounterVec::new(Opts::new("upstream_failures_total", "Upstream failures by reason"),&["path", "reason"],).unwrap(),
            upstream_duration: HistogramVec::new(HistogramOpts::new("upstream_request_duration_seconds", "Upstream call duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 15.0]),&["path"],).unwrap(),

            // Token
            auth_exchanges: IntCounterVec::new(Opts::new("auth_exchanges_total", "Login exchanges by outcome"),&["outcome"],).unwrap(),
            token_invalidations: IntCounter::new("token_invalidations_total","Cached tokens dropped after a 401",).unwrap(),
            token_expiry_unix: IntGauge::new("token_expiry_unix_seconds", "Cached token expiry timestamp").unwrap(),

            // Routes
            http_responses: IntCounterVec::new(Opts::new("http_responses_total", "Responses served by route and status"),&["route", "status"],).unwrap(),

            // Config/runtime
            config_validation_errors: IntCounter::new("config_validation_errors_total","Validation errors during startup",).unwrap(),
            up: IntGauge::new("up", "1 if service is healthy").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.upstream_requests.clone())).unwrap();
        reg.register(Box::new(metrics.upstream_failures.clone())).unwrap();
        reg.register(Box::new(metrics.upstream_duration.clone())).unwrap();
        reg.register(Box::new(metrics.auth_exchanges.clone())).unwrap();
        reg.register(Box::new(metrics.token_invalidations.clone())).unwrap();
        reg.register(Box::new(metrics.token_expiry_unix.clone())).unwrap();
        reg.register(Box::new(metrics.http_responses.clone())).unwrap();
        reg.register(Box::new(metrics.config_validation_errors.clone())).unwrap();
        reg.register(Box::new(metrics.up.clone())).unwrap();

        metrics
    }
}
