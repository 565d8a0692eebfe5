use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::time::{Duration, sleep};
use tracing::{error, info};

use warmup_core::config::LogConfig;
use warmup_core::observability::init_logging;
use warmup_core::{AppBuilder, Initializer, TaskError};

/// Set `WARMUP_DEMO_FAIL=<name>` to make one demo initializer fail.
const DEMO_FAIL_ENV: &str = "WARMUP_DEMO_FAIL";

#[derive(Debug, Deserialize)]
struct Settings {
    database_url: String,
    cache_ttl_secs: u64,
}

/// Pretends to talk to a slow dependency.
struct Dependency {
    name: &'static str,
    latency: Duration,
    fail: bool,
}

impl Dependency {
    fn new(name: &'static str, latency_ms: u64, fail_name: Option<&str>) -> Self {
        Self {
            name,
            latency: Duration::from_millis(latency_ms),
            fail: fail_name == Some(name),
        }
    }
}

#[async_trait]
impl Initializer for Dependency {
    fn name(&self) -> &str {
        self.name
    }

    async fn initialize(&self) -> Result<(), TaskError> {
        sleep(self.latency).await;
        if self.fail {
            return Err(TaskError::new(format!("{} is unreachable", self.name)));
        }
        Ok(())
    }
}

/// Retries its own connection a few times before giving up.
struct FlakyQueue {
    remaining_failures: AtomicU32,
}

#[async_trait]
impl Initializer for FlakyQueue {
    fn name(&self) -> &str {
        "message-queue"
    }

    async fn initialize(&self) -> Result<(), TaskError> {
        // Err means the counter was already at zero
        while let Ok(left) = self
            .remaining_failures
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
        {
            info!(left, "message queue not ready yet");
            sleep(Duration::from_millis(20)).await;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    // (A) ログ設定（不正な値ならデフォルトで続行）
    let log_config = LogConfig::from_env().unwrap_or_else(|e| {
        eprintln!("{e}; using default log settings");
        LogConfig::default()
    });
    init_logging(&log_config);

    let fail_name = std::env::var(DEMO_FAIL_ENV).ok();
    let fail_name = fail_name.as_deref();

    let settings = Arc::new(tokio::sync::OnceCell::<Settings>::new());
    let loaded = Arc::clone(&settings);

    // (B) initializer を登録
    //   0: settings
    //   1: database, cache, message-queue (parallel)
    //   2: http-routes
    let app = AppBuilder::new()
        .add_fn("settings", move || {
            let loaded = Arc::clone(&loaded);
            async move {
                let raw = r#"{"database_url":"postgres://localhost/app","cache_ttl_secs":60}"#;
                let parsed: Settings = serde_json::from_str(raw).map_err(TaskError::from_error)?;
                // a re-run keeps the first settings
                let _ = loaded.set(parsed);
                Ok(())
            }
        })
        .add_parallel(|batch| {
            batch
                .add(Dependency::new("database", 120, fail_name))
                .add(Dependency::new("cache", 40, fail_name))
                .add(FlakyQueue {
                    remaining_failures: AtomicU32::new(2),
                });
        })
        .add_initializer(Dependency::new("http-routes", 10, fail_name))
        .build();

    let app = match app {
        Ok(app) => app,
        Err(err) => {
            error!(error = %err, "failed to build application");
            std::process::exit(1);
        }
    };

    // (C) 初期化を実行し、失敗したら起動を中止
    match app.init().await {
        Ok(summary) => {
            if let Some(s) = settings.get() {
                info!(database_url = %s.database_url, cache_ttl_secs = s.cache_ttl_secs, "settings loaded");
            }
            match serde_json::to_string(&summary) {
                Ok(json) => println!("{json}"),
                Err(e) => error!(error = %e, "failed to encode run summary"),
            }
        }
        Err(e) => {
            error!(error = %e, "startup aborted");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn concurrent_queue_retries_never_wrap_the_counter() {
        let queue = FlakyQueue {
            remaining_failures: AtomicU32::new(3),
        };

        let (a, b) = tokio::join!(queue.initialize(), queue.initialize());

        assert!(a.is_ok() && b.is_ok());
        assert_eq!(queue.remaining_failures.load(Ordering::Relaxed), 0);
    }
}
