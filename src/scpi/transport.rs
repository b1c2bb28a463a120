//! Transport boundary: byte-oriented duplex channels to instruments.
//!
//! The protocol layer only needs `write` and `read_response`; everything
//! else (USB enumeration, vendor control objects) lives behind this trait.
//! A TCP implementation is built in for `IP:`-form addresses; USBTMC devices
//! are reached by handing a user implementation to the client builder.

use std::collections::VecDeque;
use std::io::{Read, Write};
use std::net::{IpAddr, SocketAddr, TcpStream};
use std::sync::{Arc, Mutex};

use log::{debug, warn};

use crate::error::ScpiError;
use crate::scpi::client::ConnectionConfig;

/// Duplex text channel to one instrument.
pub trait Transport: Send {
    /// Write one command. Line termination is the implementation's concern.
    fn write(&mut self, command: &str) -> Result<(), ScpiError>;

    /// Read one response of at most `max_bytes` bytes, with trailing line
    /// terminators stripped.
    fn read_response(&mut self, max_bytes: usize) -> Result<String, ScpiError>;
}

fn io_error(source: std::io::Error, context: impl Into<String>) -> ScpiError {
    if matches!(
        source.kind(),
        std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
    ) {
        ScpiError::Timeout
    } else {
        ScpiError::Io {
            source,
            context: context.into(),
        }
    }
}

/// TCP transport for ethernet-attached instruments.
pub struct TcpTransport {
    stream: TcpStream,
    peer: String,
}

impl TcpTransport {
    /// Port the LeCroy scopes listen on.
    pub const DEFAULT_PORT: u16 = 1861;

    /// Whether `address` is something this transport can dial
    /// (`IP:<host>[:port]` or a bare IP address).
    pub fn supports(address: &str) -> bool {
        Self::socket_addr(address).is_ok()
    }

    fn socket_addr(address: &str) -> Result<SocketAddr, ScpiError> {
        let host = address.strip_prefix("IP:").unwrap_or(address);
        if let Ok(addr) = host.parse::<SocketAddr>() {
            return Ok(addr);
        }
        host.parse::<IpAddr>()
            .map(|ip| SocketAddr::new(ip, Self::DEFAULT_PORT))
            .map_err(|_| {
                ScpiError::InvalidCommand(format!("not a usable network address: {address}"))
            })
    }

    /// Connect with the configured timeouts.
    pub fn connect(address: &str, config: &ConnectionConfig) -> Result<Self, ScpiError> {
        let socket_addr = Self::socket_addr(address)?;
        debug!("Connecting to instrument at {socket_addr}");

        let stream =
            TcpStream::connect_timeout(&socket_addr, config.connect_timeout).map_err(|e| {
                warn!("Failed to connect to {address}: {e}");
                io_error(e, format!("Failed to connect to {address}"))
            })?;
        stream
            .set_read_timeout(Some(config.read_timeout))
            .map_err(|e| io_error(e, "Failed to set read timeout"))?;
        stream
            .set_write_timeout(Some(config.write_timeout))
            .map_err(|e| io_error(e, "Failed to set write timeout"))?;

        debug!("Connected to {socket_addr}");
        Ok(Self {
            stream,
            peer: address.to_string(),
        })
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }
}

impl Transport for TcpTransport {
    fn write(&mut self, command: &str) -> Result<(), ScpiError> {
        let mut line = command.to_string();
        if !line.ends_with('\n') {
            line.push('\n');
        }
        self.stream
            .write_all(line.as_bytes())
            .map_err(|e| io_error(e, format!("Failed to write to {}", self.peer)))
    }

    fn read_response(&mut self, max_bytes: usize) -> Result<String, ScpiError> {
        // Responses may arrive in several TCP segments; keep reading until
        // the line terminator or the byte cap.
        let mut buf = Vec::with_capacity(max_bytes.min(4096));
        let mut chunk = [0u8; 1024];
        while buf.len() < max_bytes {
            let want = (max_bytes - buf.len()).min(chunk.len());
            let n = self
                .stream
                .read(&mut chunk[..want])
                .map_err(|e| io_error(e, format!("Failed to read from {}", self.peer)))?;
            if n == 0 {
                if buf.is_empty() {
                    return Err(ScpiError::Io {
                        source: std::io::Error::new(
                            std::io::ErrorKind::UnexpectedEof,
                            "connection closed",
                        ),
                        context: format!("Connection to {} closed by peer", self.peer),
                    });
                }
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if chunk[..n].contains(&b'\n') {
                break;
            }
        }
        let text = String::from_utf8_lossy(&buf);
        Ok(text.trim_end_matches(['\r', '\n']).to_string())
    }
}

#[derive(Debug, Default)]
struct LoopbackInner {
    written: Vec<String>,
    responses: VecDeque<String>,
}

/// Scripted in-memory transport for driver tests.
///
/// Records every command written and answers reads from a queue of canned
/// responses. Cloning yields a second handle onto the same channel, so a
/// test can keep one handle while the client owns the other.
#[derive(Debug, Clone, Default)]
pub struct LoopbackTransport {
    inner: Arc<Mutex<LoopbackInner>>,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for a future `read_response` call.
    pub fn push_response(&self, response: impl Into<String>) {
        self.lock().responses.push_back(response.into());
    }

    /// Everything written so far, in order.
    pub fn written(&self) -> Vec<String> {
        self.lock().written.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LoopbackInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Transport for LoopbackTransport {
    fn write(&mut self, command: &str) -> Result<(), ScpiError> {
        self.lock().written.push(command.to_string());
        Ok(())
    }

    fn read_response(&mut self, max_bytes: usize) -> Result<String, ScpiError> {
        let mut response = self.lock().responses.pop_front().ok_or(ScpiError::Timeout)?;
        if response.len() > max_bytes {
            let mut cut = max_bytes;
            while cut > 0 && !response.is_char_boundary(cut) {
                cut -= 1;
            }
            response.truncate(cut);
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loopback_records_writes_in_order() {
        let loopback = LoopbackTransport::new();
        let mut handle = loopback.clone();
        handle.write("*RST").unwrap();
        handle.write("OUTPUT1 ON").unwrap();
        assert_eq!(loopback.written(), vec!["*RST", "OUTPUT1 ON"]);
    }

    #[test]
    fn loopback_caps_response_length() {
        let loopback = LoopbackTransport::new();
        loopback.push_response("0123456789");
        let mut handle = loopback.clone();
        assert_eq!(handle.read_response(4).unwrap(), "0123");
    }

    #[test]
    fn loopback_times_out_without_queued_response() {
        let mut loopback = LoopbackTransport::new();
        assert!(matches!(
            loopback.read_response(80),
            Err(ScpiError::Timeout)
        ));
    }

    #[test]
    fn tcp_read_reassembles_segmented_response() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = std::thread::spawn(move || {
            let (mut sock, _) = listener.accept().unwrap();
            sock.write_all(b"AGILENT,").unwrap();
            sock.flush().unwrap();
            std::thread::sleep(std::time::Duration::from_millis(100));
            sock.write_all(b"33522A\n").unwrap();
        });

        let mut transport =
            TcpTransport::connect(&addr.to_string(), &ConnectionConfig::default()).unwrap();
        assert_eq!(transport.read_response(80).unwrap(), "AGILENT,33522A");
        server.join().unwrap();
    }

    #[test]
    fn tcp_read_stops_at_byte_cap() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = std::thread::spawn(move || {
            let (mut sock, _) = listener.accept().unwrap();
            sock.write_all(b"0123456789\n").unwrap();
        });

        let mut transport =
            TcpTransport::connect(&addr.to_string(), &ConnectionConfig::default()).unwrap();
        assert_eq!(transport.read_response(4).unwrap(), "0123");
        server.join().unwrap();
    }

    #[test]
    fn tcp_address_forms() {
        assert!(TcpTransport::supports("IP:192.168.3.220"));
        assert!(TcpTransport::supports("192.168.3.220:1861"));
        assert!(TcpTransport::supports("10.0.0.5"));
        assert!(!TcpTransport::supports("USB0::2391::8967::INSTR"));
    }
}
