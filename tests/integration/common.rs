//! Common test harness for Gantry SDK integration tests.

use std::{sync::Once, time::Duration};

use gantry::{Connection, ConnectionBuilder, Credential, RetryConfig, Settings};

/// Bearer token used by [`connection`].
pub const TEST_TOKEN: &str = "test-token";

static TRACING: Once = Once::new();

/// Installs a test subscriber honoring `RUST_LOG`, once per process.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A builder aimed at `server`, isolated from the process environment, with
/// millisecond backoff.
pub fn builder(server: &mockito::Server) -> ConnectionBuilder {
    init_tracing();
    Connection::builder()
        .settings(Settings::default())
        .base_url(server.url())
        .retry_config(RetryConfig::new().with_backoff_factor(Duration::from_millis(1)))
}

/// A bearer-authenticated connection to `server` with `max_retries` retries.
pub fn connection(server: &mockito::Server, max_retries: u32) -> Connection {
    builder(server)
        .credential(Credential::bearer(TEST_TOKEN))
        .max_retry_count(max_retries)
        .build()
        .expect("connection should build")
}

/// A base URL nothing is listening on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
