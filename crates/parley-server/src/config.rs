//! Server and upstream configuration.
//!
//! Both structs are immutable for the lifetime of the process and injected
//! at startup — the upstream address is never a literal inside request
//! logic, so tests can point the gateway at a mock server.

use serde::{Deserialize, Serialize};

/// Configuration for the HTTP server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind (default `"127.0.0.1"`).
    pub host: String,
    /// Port to bind (default `0` for auto-assign).
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
        }
    }
}

/// Configuration for the upstream agent gateway.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Address of the orchestrating agent's RPC endpoint.
    pub url: String,
    /// Substring identifying the orchestrating agent in routing annotations.
    pub orchestrator: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:10001".into(),
            orchestrator: "person_a".into(),
        }
    }
}
