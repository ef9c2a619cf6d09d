//! Command-line and environment configuration for the `charla` binary.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::{ClientConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_EVENT_CHANNEL_CAPACITY};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5001";

#[derive(Debug, Clone, Parser)]
#[command(name = "charla")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Terminal client for a Socket.IO chat server")]
#[command(
    long_about = "Terminal client for a Socket.IO chat server.\nType a name to join, then chat. /listar lists connected users, /quitar leaves."
)]
pub struct Config {
    /// Server host; takes precedence over --url when given with PORT
    #[arg(requires = "port")]
    pub host: Option<String>,

    /// Server port
    pub port: Option<u16>,

    /// Server URL (http, https, ws or wss)
    #[arg(long, env = "CHARLA_URL", default_value = DEFAULT_SERVER_URL)]
    pub url: String,

    /// Join with this name as soon as the connection is up
    #[arg(short, long, env = "CHARLA_NAME")]
    pub name: Option<String>,

    /// Also append the conversation as HTML to this file
    #[arg(long, env = "CHARLA_TRANSCRIPT")]
    pub transcript: Option<PathBuf>,

    /// How long status notices stay on screen
    #[arg(long, env = "CHARLA_STATUS_TIMEOUT_MS", default_value_t = 3000)]
    pub status_timeout_ms: u64,

    /// Inbound events buffered between the transport and the UI
    #[arg(long, env = "CHARLA_EVENT_CAPACITY", default_value_t = DEFAULT_EVENT_CHANNEL_CAPACITY)]
    pub event_capacity: usize,

    /// Give up connecting after this long
    #[arg(long, env = "CHARLA_CONNECT_TIMEOUT_MS", default_value_t = DEFAULT_CONNECT_TIMEOUT.as_millis() as u64)]
    pub connect_timeout_ms: u64,
}

impl Config {
    /// Address of the chat server
    pub fn server_url(&self) -> String {
        match (&self.host, self.port) {
            (Some(host), Some(port)) if host.contains(':') => format!("http://[{}]:{}", host, port),
            (Some(host), Some(port)) => format!("http://{}:{}", host, port),
            _ => self.url.clone(),
        }
    }

    pub fn status_timeout(&self) -> Duration {
        Duration::from_millis(self.status_timeout_ms)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_event_channel_capacity(self.event_capacity)
            .with_connect_timeout(Duration::from_millis(self.connect_timeout_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["charla", "--url", DEFAULT_SERVER_URL]).unwrap();

        assert_eq!(config.server_url(), "http://localhost:5001");
        assert_eq!(config.status_timeout(), Duration::from_secs(3));
        assert_eq!(
            config.client_config().event_channel_capacity,
            DEFAULT_EVENT_CHANNEL_CAPACITY
        );
        assert_eq!(config.client_config().connect_timeout, DEFAULT_CONNECT_TIMEOUT);
        assert!(config.transcript.is_none());
    }

    #[test]
    fn test_host_and_port() {
        let config = Config::try_parse_from(["charla", "10.0.0.5", "5002"]).unwrap();
        assert_eq!(config.server_url(), "http://10.0.0.5:5002");

        let ipv6 = Config::try_parse_from(["charla", "::1", "5001"]).unwrap();
        assert_eq!(ipv6.server_url(), "http://[::1]:5001");
    }

    #[test]
    fn test_host_requires_port() {
        assert!(Config::try_parse_from(["charla", "10.0.0.5"]).is_err());
        assert!(Config::try_parse_from(["charla", "10.0.0.5", "puerto"]).is_err());
    }

    #[test]
    fn test_flags() {
        let config = Config::try_parse_from([
            "charla",
            "--url",
            "https://chat.example.org",
            "--name",
            "Alice",
            "--transcript",
            "chat.html",
            "--status-timeout-ms",
            "500",
            "--event-capacity",
            "0",
            "--connect-timeout-ms",
            "2500",
        ])
        .unwrap();

        assert_eq!(config.server_url(), "https://chat.example.org");
        assert_eq!(config.name.as_deref(), Some("Alice"));
        assert_eq!(config.transcript, Some(PathBuf::from("chat.html")));
        assert_eq!(config.status_timeout(), Duration::from_millis(500));
        assert_eq!(config.client_config().event_channel_capacity, 1);
        assert_eq!(
            config.client_config().connect_timeout,
            Duration::from_millis(2500)
        );
    }
}
