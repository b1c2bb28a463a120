pub mod address;
pub mod client;
pub mod command;
pub mod ident;
pub mod protocol;
pub mod transport;
pub mod waveform;

// Re-export the main types from client
pub use client::{
    ConnectionConfig, FunctionGenerator, Oscilloscope, ScpiClient, ScpiClientBuilder,
};
pub use command::{Command, OnOff, ScpiValue};
pub use protocol::LinkState;
pub use transport::Transport;
pub use waveform::Waveform;
