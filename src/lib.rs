pub mod config;
pub mod error;
pub mod scpi;
pub mod settings;
pub mod trace;

pub use config::{load_config, load_config_or_default, AppConfig};
pub use error::ScpiError;
pub use scpi::address::{
    fgen_selectors, oscilloscope_selectors, InstrumentAddress, SelectorTable,
};
pub use scpi::client::{
    ByteOrder, ConnectionConfig, FunctionGenerator, HeaderFormat, InspectFormat, Oscilloscope,
    ScpiClient, ScpiClientBuilder, TriggerMode, TriggerSetup, TriggerSlope, WaveformFormat,
    WaveformWindow,
};
pub use scpi::command::{Command, OnOff, ScpiValue, SwitchInput};
pub use scpi::ident::{
    keyword, normalize, normalize_any, normalize_with, CaseSensitivity, IdentInput,
    IdentifierClass,
};
pub use scpi::protocol::{
    describe_error, parse_float, parse_leading_int, LinkState, DEFAULT_RESPONSE_CAP, ERROR_CODES,
};
pub use scpi::transport::{LoopbackTransport, TcpTransport, Transport};
pub use scpi::waveform::{
    Waveform, WaveformViolations, MAX_POINTS, MIN_POINTS, SAMPLE_MAX, SAMPLE_MIN,
};
pub use trace::{Direction, TraceEntry, TraceLog};
