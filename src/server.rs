use std::{net::SocketAddr, path::Path};

use anyhow::Context;
use axum::{middleware, Router};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    decompression::RequestDecompressionLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};

use crate::{
    error::ErrorVerbosity,
    middleware::{
        method_not_allowed::method_not_allowed, not_found::not_found,
        trace_headers::trace_headers, trace_response_body::trace_response_body,
    },
    openapi,
    route::books,
    state::ApiState,
    store::StoreConfig,
};

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TraceConfig {
    /// Log request and response headers.
    #[serde(default)]
    pub headers: bool,
    /// Log response bodies. Expensive, every body is buffered.
    #[serde(default)]
    pub response_body: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    socket_address: SocketAddr,
    #[serde(default)]
    error_verbosity: ErrorVerbosity,
    #[serde(default)]
    trace: TraceConfig,
    store: StoreConfig,
}

impl ServerConfig {
    pub async fn from_config_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(config)
    }

    pub fn with_socket_address(mut self, socket_address: SocketAddr) -> Self {
        self.socket_address = socket_address;
        self
    }

    pub fn with_mongodb_uri(mut self, uri: String) -> Self {
        match &mut self.store {
            StoreConfig::Mongo(config) => config.uri = uri,
            StoreConfig::Memory => {
                tracing::warn!("Ignoring MongoDB connection string, the in-memory store is configured")
            }
        }

        self
    }
}

pub struct Server {
    config: ServerConfig,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let store = self
            .config
            .store
            .connect()
            .await
            .context("Failed to connect to the store")?;

        let state = ApiState::new(self.config.error_verbosity, store);
        let app = app(state, self.config.trace);

        tracing::info!(addr = %self.config.socket_address, "Starting server");

        let listener = TcpListener::bind(&self.config.socket_address)
            .await
            .context("Bind failed")?;

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

        Ok(())
    }
}

/// Builds the full router with its middleware stack.
pub fn app(state: ApiState, trace: TraceConfig) -> Router {
    let mut router = Router::<ApiState>::new()
        .merge(books::app::app())
        .merge(openapi::app())
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            method_not_allowed::<ApiState>,
        ));

    if trace.response_body {
        router = router.layer(middleware::from_fn_with_state(
            state.clone(),
            trace_response_body::<ApiState>,
        ));
    }

    if trace.headers {
        router = router.layer(middleware::from_fn(trace_headers));
    }

    router.with_state(state).layer(
        ServiceBuilder::new()
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                    .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                    .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
            )
            .layer(RequestDecompressionLayer::new())
            .layer(CompressionLayer::new())
            .layer(CorsLayer::permissive()),
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");

        tracing::info!("CTRL+C received");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM signal handler")
            .recv()
            .await;

        tracing::info!("SIGTERM received");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> ServerConfig {
        serde_yaml::from_str(yaml).expect("Config is not parsable")
    }

    #[test]
    fn memory_store_config_is_valid() {
        let config = parse("socket_address: 127.0.0.1:0\nstore:\n  type: memory\n");

        assert!(matches!(config.store, StoreConfig::Memory));
        assert!(matches!(config.error_verbosity, ErrorVerbosity::Message));
        assert!(!config.trace.headers && !config.trace.response_body);
    }

    #[test]
    fn mongodb_uri_override_keeps_memory_store() {
        let config = parse("socket_address: 127.0.0.1:0\nstore:\n  type: memory\n")
            .with_mongodb_uri("mongodb://ignored".to_string());

        assert!(matches!(config.store, StoreConfig::Memory));
    }

    #[test]
    fn mongodb_uri_override_replaces_configured_uri() {
        let config = parse(
            "socket_address: 127.0.0.1:0\nstore:\n  type: mongo\n  uri: mongodb://file:27017\n",
        )
        .with_mongodb_uri("mongodb://env:27017".to_string());

        let StoreConfig::Mongo(mongo) = config.store else {
            panic!("Expected the mongo store");
        };

        assert_eq!(mongo.uri, "mongodb://env:27017");
        assert_eq!(mongo.database, "store");
        assert_eq!(mongo.collection, "books");
    }
}
