//! Instrument client core: connection building, half-duplex request/response
//! protocol, and the VBS scripting passthrough.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use log::{debug, warn};

use crate::error::ScpiError;
use crate::scpi::address::{InstrumentAddress, SelectorTable};
use crate::scpi::command::Command;
use crate::scpi::protocol::{DEFAULT_RESPONSE_CAP, LinkState};
use crate::scpi::transport::{TcpTransport, Transport};
use crate::settings;
use crate::trace::{Direction, TraceLog};

pub mod fgen;
pub mod oscilloscope;

pub use fgen::FunctionGenerator;
pub use oscilloscope::{
    ByteOrder, HeaderFormat, InspectFormat, Oscilloscope, TriggerMode, TriggerSetup, TriggerSlope,
    WaveformFormat, WaveformWindow,
};

/// Connection timeouts for the built-in TCP transport.
///
/// The protocol itself defines no timeout; a blocking read with no response
/// is bounded only by these socket deadlines.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Timeout for establishing the initial TCP connection
    pub connect_timeout: Duration,
    /// Timeout for reading a response from the instrument
    pub read_timeout: Duration,
    /// Timeout for writing a command to the instrument
    pub write_timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(10),
            write_timeout: Duration::from_secs(5),
        }
    }
}

/// Builder for [`ScpiClient`] instances.
///
/// The address may be given directly or as a selector into a table; selector
/// resolution happens once, in [`build`](Self::build). `IP:`-form addresses
/// get a TCP transport automatically; anything else (USBTMC resources)
/// requires a transport supplied via [`transport`](Self::transport).
///
/// ```no_run
/// use benchlink::{oscilloscope_selectors, ScpiClient};
///
/// let client = ScpiClient::builder()
///     .selector(1)
///     .selector_table(oscilloscope_selectors())
///     .build()?;
/// # Ok::<(), benchlink::ScpiError>(())
/// ```
#[derive(Default)]
pub struct ScpiClientBuilder {
    address: Option<InstrumentAddress>,
    selectors: SelectorTable,
    config: ConnectionConfig,
    transport: Option<Box<dyn Transport>>,
    trace_path: Option<PathBuf>,
    trace_buffer: usize,
}

impl ScpiClientBuilder {
    /// Set the instrument address directly.
    pub fn address(mut self, addr: &str) -> Self {
        self.address = Some(InstrumentAddress::from(addr));
        self
    }

    /// Address the instrument by selector key.
    pub fn selector(mut self, key: u32) -> Self {
        self.address = Some(InstrumentAddress::Selector(key));
        self
    }

    /// Table consulted when the address is a selector.
    pub fn selector_table(mut self, table: SelectorTable) -> Self {
        self.selectors = table;
        self
    }

    /// Set the full connection configuration.
    pub fn config(mut self, config: ConnectionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set read timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = timeout;
        self
    }

    /// Set write timeout.
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.config.write_timeout = timeout;
        self
    }

    /// Use an externally constructed transport instead of the built-in TCP
    /// one (USBTMC devices, vendor control objects, test doubles).
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Append all wire traffic to a JSONL trace file.
    pub fn trace_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.trace_path = Some(path.into());
        self
    }

    /// Entries buffered between trace file flushes (default 1, flush every
    /// entry).
    pub fn trace_buffer(mut self, entries: usize) -> Self {
        self.trace_buffer = entries;
        self
    }

    /// Resolve the address, connect, and build the client.
    pub fn build(self) -> Result<ScpiClient, ScpiError> {
        let address = self.address.ok_or_else(|| {
            ScpiError::InvalidCommand("Instrument address must be specified".to_string())
        })?;
        let resolved = address.resolve(&self.selectors)?;

        let transport: Box<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None if TcpTransport::supports(&resolved) => {
                Box::new(TcpTransport::connect(&resolved, &self.config)?)
            }
            None => {
                return Err(ScpiError::InvalidCommand(format!(
                    "No built-in transport for address \"{resolved}\"; supply one with ScpiClientBuilder::transport"
                )));
            }
        };

        let trace = self
            .trace_path
            .map(|path| TraceLog::new(path, self.trace_buffer.max(1)));

        debug!("Client ready for {resolved}");
        Ok(ScpiClient {
            transport,
            address: resolved,
            link: LinkState::Idle,
            trace,
        })
    }
}

/// Textual-command protocol client for one instrument.
///
/// Owns one transport connection and the half-duplex link state: every query
/// must be read before the next command is issued, and a read without a
/// pending query is rejected instead of returning stale buffer contents.
/// A handle must not be shared across threads without external
/// synchronization; independent handles are fully independent.
pub struct ScpiClient {
    transport: Box<dyn Transport>,
    address: String,
    link: LinkState,
    trace: Option<TraceLog>,
}

impl fmt::Debug for ScpiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScpiClient")
            .field("address", &self.address)
            .field("link", &self.link)
            .field("trace", &self.trace)
            .finish_non_exhaustive()
    }
}

impl ScpiClient {
    pub fn builder() -> ScpiClientBuilder {
        ScpiClientBuilder::default()
    }

    /// Wrap an already-connected transport. Used for user transports and
    /// tests; no address resolution takes place.
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
            address: String::new(),
            link: LinkState::Idle,
            trace: None,
        }
    }

    /// Resolved instrument address (empty for [`with_transport`](Self::with_transport) clients).
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn link_state(&self) -> LinkState {
        self.link
    }

    fn guard_idle(&self) -> Result<(), ScpiError> {
        match self.link {
            LinkState::Idle => Ok(()),
            LinkState::AwaitingResponse => Err(ScpiError::ProtocolOutOfOrder(
                "command issued while a query response is pending",
            )),
        }
    }

    /// Record traffic that actually crossed the wire. Trace failures are
    /// logged, never surfaced on the command path.
    fn trace_record(&mut self, direction: Direction, text: &str) {
        if let Some(trace) = &mut self.trace {
            if let Err(e) = trace.record(direction, text) {
                warn!("Wire trace failed: {e}");
            }
        }
    }

    /// Write one pre-formed command verbatim, with no response expected.
    pub fn write(&mut self, command: &str) -> Result<(), ScpiError> {
        self.guard_idle()?;
        debug!("TX {command}");
        self.transport.write(command)?;
        self.trace_record(Direction::Tx, command);
        Ok(())
    }

    /// Write a composed command (set form).
    pub fn send(&mut self, command: &Command) -> Result<(), ScpiError> {
        self.write(&command.to_wire())
    }

    /// Issue the query form of a composed command. The next protocol
    /// operation on this handle must be a read.
    pub fn query(&mut self, command: &Command) -> Result<(), ScpiError> {
        self.query_raw(&command.to_query())
    }

    /// Issue a pre-built query-form command verbatim.
    pub fn query_raw(&mut self, command: &str) -> Result<(), ScpiError> {
        self.guard_idle()?;
        debug!("TX {command}");
        self.transport.write(command)?;
        self.link = LinkState::AwaitingResponse;
        self.trace_record(Direction::Tx, command);
        Ok(())
    }

    /// Read the response to the immediately preceding query, capped at
    /// `max_bytes`. Fails with [`ScpiError::ProtocolOutOfOrder`] if no query
    /// is pending. A failed read abandons the exchange: the link returns to
    /// idle either way.
    pub fn read(&mut self, max_bytes: usize) -> Result<String, ScpiError> {
        if self.link != LinkState::AwaitingResponse {
            return Err(ScpiError::ProtocolOutOfOrder(
                "read with no pending query",
            ));
        }
        self.link = LinkState::Idle;
        match self.transport.read_response(max_bytes) {
            Ok(text) => {
                debug!("RX {text}");
                self.trace_record(Direction::Rx, &text);
                Ok(text)
            }
            Err(e) => {
                warn!("Read from {} failed: {e}", self.address);
                Err(e)
            }
        }
    }

    /// [`read`](Self::read) with the default 80-byte cap.
    pub fn read_default(&mut self) -> Result<String, ScpiError> {
        self.read(DEFAULT_RESPONSE_CAP)
    }

    /// Query and read in one step, default response cap.
    pub fn ask(&mut self, command: &Command) -> Result<String, ScpiError> {
        self.query(command)?;
        self.read(DEFAULT_RESPONSE_CAP)
    }

    /// Query and read in one step with an explicit response cap.
    pub fn ask_capped(
        &mut self,
        command: &Command,
        max_bytes: usize,
    ) -> Result<String, ScpiError> {
        self.query(command)?;
        self.read(max_bytes)
    }

    /// Write a pre-built query string and read the response.
    pub fn ask_raw(&mut self, command: &str) -> Result<String, ScpiError> {
        self.query_raw(command)?;
        self.read(DEFAULT_RESPONSE_CAP)
    }

    // IEEE-488 common commands

    /// `*IDN?` identity string.
    pub fn idn(&mut self) -> Result<String, ScpiError> {
        self.ask_raw("*IDN?")
    }

    /// `*CLS`: clear the instrument's error queue. No response is produced.
    pub fn clear_errors(&mut self) -> Result<(), ScpiError> {
        self.write("*CLS")
    }

    /// `*RST`: reset the instrument to defaults.
    pub fn reset(&mut self) -> Result<(), ScpiError> {
        self.write("*RST")
    }

    // VBS scripting passthrough

    /// Evaluate an instrument-native scripting expression, fire-and-forget.
    pub fn vbs_run(&mut self, expr: &str) -> Result<(), ScpiError> {
        self.write(&format!("VBS  '{expr} ' "))
    }

    /// Evaluate an expression and leave its value in the instrument's output
    /// buffer; the caller reads it with [`read`](Self::read).
    pub fn vbs_query(&mut self, expr: &str) -> Result<(), ScpiError> {
        self.query_raw(&format!("VBS?  'return={expr} ' "))
    }

    /// Evaluate an expression and return its value. Equivalent to
    /// [`vbs_query`](Self::vbs_query) followed by a default-cap read.
    pub fn vbs_ask(&mut self, expr: &str) -> Result<String, ScpiError> {
        self.vbs_query(expr)?;
        self.read(DEFAULT_RESPONSE_CAP)
    }

    /// Apply a settings file: one pre-formed command per line, blank lines
    /// and `#` comments skipped, each remaining line written verbatim.
    /// Returns the number of commands written.
    pub fn apply_settings(&mut self, path: &std::path::Path) -> Result<usize, ScpiError> {
        let lines = settings::read_settings(path)?;
        log::info!("Loading {} command(s) from {}", lines.len(), path.display());
        for line in &lines {
            self.write(line)?;
        }
        Ok(lines.len())
    }
}
