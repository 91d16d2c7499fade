// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(feature = "memory")]

//! Storage operations and configuration through the client.

use std::time::Duration;

use cachestore::{Client, ClientConfig, Engine, ErrorKind, MemoryConfig};
use cachestore_tier::testing::{MockStore, StoreOp};
use recoverable::{Recovery, RecoveryKind};
use tick::{Clock, ClockControl};

#[tokio::test]
async fn set_get_delete() {
    let client = Client::builder(Clock::new_frozen()).build().await.unwrap();

    client.set("user:1", "ada").await.unwrap();
    assert_eq!(client.get("user:1").await.unwrap().as_deref(), Some("ada"));

    client.set("user:1", "grace").await.unwrap();
    assert_eq!(client.get("user:1").await.unwrap().as_deref(), Some("grace"));

    client.delete("user:1").await.unwrap();
    assert_eq!(client.get("user:1").await.unwrap(), None);

    // Deleting again is fine.
    client.delete("user:1").await.unwrap();
}

#[tokio::test]
async fn set_with_ttl_expires() {
    let control = ClockControl::new();
    let client = Client::builder(control.to_clock()).build().await.unwrap();

    client.set_with_ttl("token", "abc", Duration::from_secs(5)).await.unwrap();
    control.advance(Duration::from_secs(4));
    assert_eq!(client.get("token").await.unwrap().as_deref(), Some("abc"));

    control.advance(Duration::from_secs(1));
    assert_eq!(client.get("token").await.unwrap(), None);
}

#[tokio::test]
async fn zero_ttl_never_expires() {
    let control = ClockControl::new();
    let client = Client::builder(control.to_clock()).build().await.unwrap();

    client.set_with_ttl("config", "on", Duration::ZERO).await.unwrap();
    control.advance(Duration::from_secs(3600));

    assert_eq!(client.get("config").await.unwrap().as_deref(), Some("on"));
}

#[tokio::test]
async fn empty_cache_removes_values_and_locks() {
    let client = Client::builder(Clock::new_frozen()).build().await.unwrap();
    client.set("a", "1").await.unwrap();
    client.acquire("lock", Duration::from_secs(30)).await.unwrap();

    client.empty_cache().await.unwrap();

    assert_eq!(client.get("a").await.unwrap(), None);
    client.acquire("lock", Duration::from_secs(30)).await.unwrap();
}

#[tokio::test]
async fn blank_keys_are_rejected() {
    let client = Client::builder(Clock::new_frozen()).build().await.unwrap();

    for key in ["", " ", "\t\n"] {
        assert_eq!(client.set(key, "v").await.unwrap_err().kind(), ErrorKind::KeyRequired);
        assert_eq!(client.get(key).await.unwrap_err().kind(), ErrorKind::KeyRequired);
        assert_eq!(client.delete(key).await.unwrap_err().kind(), ErrorKind::KeyRequired);
        assert_eq!(
            client.acquire(key, Duration::from_secs(1)).await.unwrap_err().kind(),
            ErrorKind::KeyRequired
        );
    }
}

#[tokio::test]
async fn unicode_keys_round_trip() {
    let client = Client::builder(Clock::new_frozen()).build().await.unwrap();

    client.set(" 键:ключ ", "值").await.unwrap();

    assert_eq!(client.get("键:ключ").await.unwrap().as_deref(), Some("值"));
}

#[tokio::test]
async fn engine_and_debug_flags() {
    let client = Client::builder(Clock::new_frozen()).debug(true).build().await.unwrap();
    assert_eq!(client.engine(), Engine::Memory);
    assert!(client.is_debug());

    let custom = Client::builder(Clock::new_frozen())
        .storage(MockStore::new())
        .build()
        .await
        .unwrap();
    assert_eq!(custom.engine(), Engine::Custom);
    assert!(!custom.is_debug());
}

#[tokio::test]
async fn clones_share_the_engine() {
    let client = Client::builder(Clock::new_frozen()).build().await.unwrap();
    let clone = client.clone();

    client.set("shared", "yes").await.unwrap();
    client.close();

    assert_eq!(clone.get("shared").await.unwrap().as_deref(), Some("yes"));
}

#[tokio::test]
async fn from_config_builds_memory_client() {
    let config: ClientConfig = serde_json::from_str(
        r#"{
            "engine": "memory",
            "debug": true,
            "lock_poll_interval_ms": 50,
            "secret_bytes": 8,
            "memory": { "max_capacity": 100, "name": "sessions" }
        }"#,
    )
    .unwrap();

    let client = Client::from_config(Clock::new_frozen(), &config).await.unwrap();

    assert_eq!(client.engine(), Engine::Memory);
    assert!(client.is_debug());
    assert_eq!(client.locks().poll_interval(), Duration::from_millis(50));
    assert_eq!(client.acquire("job", Duration::from_secs(1)).await.unwrap().len(), 16);
}

#[tokio::test]
async fn from_config_rejects_custom_engine() {
    let error = Client::from_config(Clock::new_frozen(), &ClientConfig::new(Engine::Custom))
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Configuration);
    assert_eq!(error.recovery().kind(), RecoveryKind::Never);
}

#[tokio::test]
async fn memory_config_builder() {
    let client = Client::builder(Clock::new_frozen())
        .memory_config(MemoryConfig::new().with_max_capacity(10))
        .build()
        .await
        .unwrap();

    client.set("k", "v").await.unwrap();
    assert_eq!(client.get("k").await.unwrap().as_deref(), Some("v"));
}

#[tokio::test]
async fn backend_errors_are_unavailable() {
    let store = MockStore::new();
    store.fail_when(|op| matches!(op, StoreOp::Get(_)));
    let client = Client::builder(Clock::new_frozen()).storage(store).build().await.unwrap();

    let error = client.get("k").await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Backend);
    assert_eq!(error.recovery().kind(), RecoveryKind::Unavailable);
    client.set("k", "v").await.unwrap();
}

#[cfg(feature = "logs")]
mod logs {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Buffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Buffer {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn lock_events_are_logged() {
        let buffer = Buffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let client = Client::builder(Clock::new_frozen()).logs().build().await.unwrap();
        let secret = client.acquire("job", Duration::from_secs(5)).await.unwrap();
        client.release("job", &secret).await.unwrap();
        client.get("quiet").await.unwrap();

        let output = buffer.contents();
        assert!(output.contains("lock.acquired"), "missing acquire event: {output}");
        assert!(output.contains("lock.released"), "missing release event: {output}");
        assert!(!output.contains("store.miss"), "miss logged without debug: {output}");
        assert!(!output.contains(&secret));
    }
}

#[cfg(feature = "metrics")]
mod metrics {
    use opentelemetry::KeyValue;
    use opentelemetry_sdk::metrics::data::{AggregatedMetrics, MetricData};
    use opentelemetry_sdk::metrics::{InMemoryMetricExporter, SdkMeterProvider};

    use super::*;

    #[tokio::test]
    async fn operations_are_counted() {
        let exporter = InMemoryMetricExporter::default();
        let provider = SdkMeterProvider::builder().with_periodic_exporter(exporter.clone()).build();

        let client = Client::builder(Clock::new_frozen()).metrics(&provider).build().await.unwrap();
        client.get("absent").await.unwrap();
        provider.force_flush().unwrap();

        let attributes: Vec<KeyValue> = exporter
            .get_finished_metrics()
            .unwrap()
            .iter()
            .flat_map(|resource| resource.scope_metrics())
            .flat_map(|scope| scope.metrics())
            .filter(|metric| metric.name() == "cachestore.event.count")
            .flat_map(|metric| match metric.data() {
                AggregatedMetrics::U64(MetricData::Sum(sum)) => sum.data_points().flat_map(|p| p.attributes().cloned()).collect(),
                _ => Vec::new(),
            })
            .collect();

        assert!(attributes.contains(&KeyValue::new("cachestore.activity", "store.miss")));
        assert!(attributes.contains(&KeyValue::new("cachestore.engine", "memory")));
    }
}
