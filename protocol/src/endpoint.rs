use crate::ParseError;
use anyhow::Result;
use url::Url;

pub const ENGINE_IO_VERSION: &str = "4";

/// Turn a server address into its Socket.IO websocket endpoint.
///
/// `http://localhost:5001` becomes
/// `ws://localhost:5001/socket.io/?EIO=4&transport=websocket`.
/// An explicit `/socket.io/` path is kept; any other path is used as a prefix.
pub fn socket_io_url(base: &str) -> Result<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| ParseError::InvalidFormat(format!("invalid server url {}: {}", base, e)))?;

    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => {
            return Err(ParseError::InvalidFormat(format!("unsupported url scheme: {}", other)).into());
        }
    };
    url.set_scheme(scheme)
        .map_err(|_| ParseError::InvalidFormat(format!("cannot use scheme {} for {}", scheme, base)))?;

    let prefix = url.path().trim_end_matches('/').to_string();
    let path = if prefix.ends_with("/socket.io") {
        format!("{}/", prefix)
    } else {
        format!("{}/socket.io/", prefix)
    };
    url.set_path(&path);

    url.query_pairs_mut()
        .clear()
        .append_pair("EIO", ENGINE_IO_VERSION)
        .append_pair("transport", "websocket");

    Ok(url)
}
