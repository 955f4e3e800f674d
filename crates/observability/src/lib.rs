use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    commands_total: AtomicU64,
    navigations_total: AtomicU64,
    not_recognized_total: AtomicU64,
    help_fallback_total: AtomicU64,
    model_calls_total: AtomicU64,
    failures_total: AtomicU64,
    total_latency_millis: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub commands_total: u64,
    pub navigations_total: u64,
    pub not_recognized_total: u64,
    pub help_fallback_total: u64,
    pub model_calls_total: u64,
    pub failures_total: u64,
    pub avg_latency_millis: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_command(&self) {
        self.commands_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_navigation(&self) {
        self.navigations_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_not_recognized(&self) {
        self.not_recognized_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_help_fallback(&self) {
        self.help_fallback_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_model_call(&self) {
        self.model_calls_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_failure(&self) {
        self.failures_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_millis
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let commands = self.commands_total.load(Ordering::Relaxed);
        let latency = self.total_latency_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            commands_total: commands,
            navigations_total: self.navigations_total.load(Ordering::Relaxed),
            not_recognized_total: self.not_recognized_total.load(Ordering::Relaxed),
            help_fallback_total: self.help_fallback_total.load(Ordering::Relaxed),
            model_calls_total: self.model_calls_total.load(Ordering::Relaxed),
            failures_total: self.failures_total.load(Ordering::Relaxed),
            avg_latency_millis: if commands == 0 {
                0.0
            } else {
                latency as f64 / commands as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,agrolink_api=info,agrolink_agents=info,agrolink_ml=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .init();
    });
}
