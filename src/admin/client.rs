//! Blocking admin client over newline-delimited JSON.
//!
//! Administrative calls use one fixed timeout and never retry on their own;
//! timeouts and rejections surface to the caller. The capability set is
//! declared once at connect time through [`AdminOptions`].

use std::io::{self, BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, instrument};

use crate::admin::types::{Capabilities, ReplicationProperty, Request, Response};
use crate::core::edit::DocumentStore;

pub const DEFAULT_ADMIN_ADDR: &str = "127.0.0.1:6440";

/// Fixed timeout for administrative calls.
pub const ADMIN_TIMEOUT: Duration = Duration::from_secs(60);

/// Explicit connection settings for a capability-scoped handle.
#[derive(Debug, Clone)]
pub struct AdminOptions {
    pub addr: String,
    pub timeout: Duration,
    pub capabilities: Capabilities,
}

impl Default for AdminOptions {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADMIN_ADDR.to_owned(),
            timeout: ADMIN_TIMEOUT,
            capabilities: Capabilities::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("failed to connect to admin server at {addr}: {source}")]
    Connect { addr: String, source: io::Error },

    #[error("admin request failed: {0}")]
    Io(#[from] io::Error),

    #[error("malformed admin response: {0}")]
    Protocol(String),

    #[error("{0}")]
    Rejected(String),

    #[error("admin server closed the connection")]
    Disconnected,
}

/// Connected handle to the admin server.
#[derive(Debug)]
pub struct AdminClient {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    addr: String,
}

impl AdminClient {
    /// Connect, apply the fixed timeouts, and declare capabilities. The
    /// returned handle is ready for calls.
    #[instrument(skip(options), fields(addr = %options.addr))]
    pub fn connect(options: AdminOptions) -> Result<Self, AdminError> {
        let addr = resolve(&options.addr)?;
        let stream =
            TcpStream::connect_timeout(&addr, options.timeout).map_err(|source| {
                AdminError::Connect {
                    addr: options.addr.clone(),
                    source,
                }
            })?;
        stream.set_read_timeout(Some(options.timeout))?;
        stream.set_write_timeout(Some(options.timeout))?;

        let writer = stream.try_clone()?;
        let mut client = Self {
            reader: BufReader::new(stream),
            writer,
            addr: options.addr,
        };
        client.call(&Request::Hello {
            capabilities: options.capabilities,
        })?;
        debug!("connected to admin server");
        Ok(client)
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    fn call(&mut self, request: &Request) -> Result<Response, AdminError> {
        let mut line = serde_json::to_string(request)
            .map_err(|e| AdminError::Protocol(e.to_string()))?;
        line.push('\n');
        self.writer.write_all(line.as_bytes())?;
        self.writer.flush()?;

        let mut buf = String::new();
        if self.reader.read_line(&mut buf)? == 0 {
            return Err(AdminError::Disconnected);
        }
        let response: Response = serde_json::from_str(buf.trim_end())
            .map_err(|e| AdminError::Protocol(e.to_string()))?;

        if response.ok {
            Ok(response)
        } else {
            Err(AdminError::Rejected(
                response
                    .message
                    .unwrap_or_else(|| "request rejected without a message".to_owned()),
            ))
        }
    }

    /// Fetch the authoritative encoded config.
    pub fn fetch_config(&mut self) -> Result<Vec<u8>, AdminError> {
        let response = self.call(&Request::FetchConfig)?;
        let payload = response.payload.ok_or_else(|| {
            AdminError::Protocol("fetch-config response carried no payload".to_owned())
        })?;
        Ok(payload.into_bytes())
    }

    /// Overwrite the authoritative config with a fully encoded document.
    pub fn overwrite_config(&mut self, encoded: &[u8]) -> Result<(), AdminError> {
        let payload = String::from_utf8(encoded.to_vec())
            .map_err(|_| AdminError::Protocol("config payload is not UTF-8".to_owned()))?;
        self.call(&Request::OverwriteConfig { payload })?;
        Ok(())
    }

    /// Finalize initial cluster setup with the given replication property.
    #[instrument(skip(self))]
    pub fn bootstrap(
        &mut self,
        replication: &ReplicationProperty,
    ) -> Result<Option<String>, AdminError> {
        let response = self.call(&Request::Bootstrap {
            replication: replication.clone(),
        })?;
        Ok(response.message)
    }

    /// Remove nodes from the configuration. The server enforces that the
    /// nodes are dead and hold no data.
    #[instrument(skip(self))]
    pub fn remove_nodes(&mut self, node_indexes: &[u64]) -> Result<Option<String>, AdminError> {
        let response = self.call(&Request::RemoveNodes {
            node_indexes: node_indexes.to_vec(),
        })?;
        Ok(response.message)
    }
}

impl DocumentStore for AdminClient {
    fn fetch(&mut self) -> Result<Vec<u8>> {
        Ok(self.fetch_config()?)
    }

    fn write(&mut self, encoded: &[u8]) -> Result<()> {
        Ok(self.overwrite_config(encoded)?)
    }
}

fn resolve(addr: &str) -> Result<SocketAddr, AdminError> {
    addr.to_socket_addrs()
        .map_err(|source| AdminError::Connect {
            addr: addr.to_owned(),
            source,
        })?
        .next()
        .ok_or_else(|| AdminError::Connect {
            addr: addr.to_owned(),
            source: io::Error::new(io::ErrorKind::NotFound, "address resolved to nothing"),
        })
}
