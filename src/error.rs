use thiserror::Error;

use crate::scpi::waveform::WaveformViolations;

#[derive(Error, Debug)]
pub enum ScpiError {
    #[error("IO error: {context}: {source}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },
    #[error("Transport timeout")]
    Timeout,
    #[error("Invalid {what} \"{input}\". Acceptable values are {allowed:?}")]
    InvalidIdentifier {
        what: &'static str,
        input: String,
        allowed: Vec<&'static str>,
    },
    #[error("Invalid boolean On/Off value: {0:?}")]
    InvalidBoolean(String),
    #[error("Invalid waveform: {0}")]
    InvalidWaveform(WaveformViolations),
    #[error("Unknown instrument error code: {0}")]
    UnknownErrorCode(i32),
    #[error("Protocol out of order: {0}")]
    ProtocolOutOfOrder(&'static str),
    #[error("No address registered for instrument selector {0}")]
    AddressResolution(u32),
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
    #[error("Unparsable response: {0:?}")]
    Response(String),
}
