use anyhow::Result;
use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct ServiceMetrics {
    registry: Registry,
    login_attempts: IntCounterVec,
    registrations: IntCounterVec,
    guard_rejections: IntCounterVec,
}

impl ServiceMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let login_attempts = IntCounterVec::new(
            Opts::new(
                "auth_login_attempts_total",
                "Count of login attempts grouped by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(login_attempts.clone()))?;

        let registrations = IntCounterVec::new(
            Opts::new(
                "auth_registrations_total",
                "Count of registration attempts grouped by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(registrations.clone()))?;

        let guard_rejections = IntCounterVec::new(
            Opts::new(
                "auth_guard_rejections_total",
                "Count of access guard rejections grouped by kind",
            ),
            &["kind"],
        )?;
        registry.register(Box::new(guard_rejections.clone()))?;

        Ok(Self {
            registry,
            login_attempts,
            registrations,
            guard_rejections,
        })
    }

    pub fn login_attempt(&self, outcome: &str) {
        self.login_attempts.with_label_values(&[outcome]).inc();
    }

    pub fn registration(&self, outcome: &str) {
        self.registrations.with_label_values(&[outcome]).inc();
    }

    pub fn guard_rejection(&self, kind: &str) {
        self.guard_rejections.with_label_values(&[kind]).inc();
    }

    pub fn render(&self) -> Result<Response> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        let response = Response::builder()
            .status(StatusCode::OK)
            .header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; version=0.0.4"),
            )
            .body(Body::from(buffer))?;
        Ok(response)
    }
}
