//! LeCroy WaveSurfer oscilloscope driver.

use std::str::FromStr;

use crate::error::ScpiError;
use crate::scpi::command::{Command, OnOff, ScpiValue, SwitchInput};
use crate::scpi::ident::{self, IdentInput, IdentifierClass};
use crate::scpi::protocol::{self, DEFAULT_RESPONSE_CAP};

use super::ScpiClient;

/// Identifier classes usable as an `INSPECT?` target.
const INSPECT_CLASSES: &[IdentifierClass] = &[
    IdentifierClass::Channel,
    IdentifierClass::MemoryBank,
    IdentifierClass::Trace,
    IdentifierClass::ExternalTrigger,
    IdentifierClass::LineTrigger,
];

/// Identifier classes usable as a trigger source.
const TRIGGER_SOURCE_CLASSES: &[IdentifierClass] = &[
    IdentifierClass::Channel,
    IdentifierClass::ExternalTrigger,
];

/// Coupling keywords for channel trigger sources.
pub const CHANNEL_COUPLINGS: &[&str] = &["AC", "DC", "HF", "HFREJ", "LFREJ"];
/// Coupling keywords for external trigger sources.
pub const EXTERNAL_COUPLINGS: &[&str] = &["DC50", "GND", "DC1M", "AC1M"];

/// Acquisition trigger mode (`TRMD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerMode {
    Auto,
    Norm,
    Single,
    Stop,
}

impl TriggerMode {
    pub const fn mnemonic(self) -> &'static str {
        match self {
            TriggerMode::Auto => "AUTO",
            TriggerMode::Norm => "NORM",
            TriggerMode::Single => "SINGLE",
            TriggerMode::Stop => "STOP",
        }
    }
}

impl FromStr for TriggerMode {
    type Err = ScpiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match ident::keyword(s, &["AUTO", "NORM", "SINGLE", "STOP"], "trigger mode")? {
            "AUTO" => Ok(TriggerMode::Auto),
            "NORM" => Ok(TriggerMode::Norm),
            "SINGLE" => Ok(TriggerMode::Single),
            _ => Ok(TriggerMode::Stop),
        }
    }
}

/// Trigger slope direction (`TRSL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSlope {
    Pos,
    Neg,
}

impl TriggerSlope {
    pub const fn mnemonic(self) -> &'static str {
        match self {
            TriggerSlope::Pos => "POS",
            TriggerSlope::Neg => "NEG",
        }
    }
}

impl FromStr for TriggerSlope {
    type Err = ScpiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match ident::keyword(s, &["POS", "NEG"], "slope")? {
            "POS" => Ok(TriggerSlope::Pos),
            _ => Ok(TriggerSlope::Neg),
        }
    }
}

/// Query response header verbosity (`COMM_HEADER`).
///
/// `Long` -> `C1:TRIG_SLOPE NEG`, `Short` -> `C1:TRSL NEG`, `Off` -> `NEG`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderFormat {
    Long,
    Short,
    Off,
}

impl HeaderFormat {
    pub const fn mnemonic(self) -> &'static str {
        match self {
            HeaderFormat::Long => "LONG",
            HeaderFormat::Short => "SHORT",
            HeaderFormat::Off => "OFF",
        }
    }
}

impl FromStr for HeaderFormat {
    type Err = ScpiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match ident::keyword(s, &["LONG", "SHORT", "OFF"], "header format")? {
            "LONG" => Ok(HeaderFormat::Long),
            "SHORT" => Ok(HeaderFormat::Short),
            _ => Ok(HeaderFormat::Off),
        }
    }
}

/// Byte order for waveform dumps (`COMM_ORDER`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    HighByteFirst,
    LowByteFirst,
}

impl ByteOrder {
    pub const fn wire_value(self) -> i64 {
        match self {
            ByteOrder::HighByteFirst => 0,
            ByteOrder::LowByteFirst => 1,
        }
    }
}

/// Output formatting for `INSPECT?` dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectFormat {
    Byte,
    Word,
}

impl InspectFormat {
    pub const fn mnemonic(self) -> &'static str {
        match self {
            InspectFormat::Byte => "BYTE",
            InspectFormat::Word => "WORD",
        }
    }
}

/// Waveform transfer window (`WFSU`): which part of an acquired waveform is
/// transmitted to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveformWindow {
    /// Points to transmit; 0 sends all data points.
    pub points: u32,
    /// Interval between transmitted points; 0 and 1 both send every point.
    pub sparsing: u32,
    /// Address of the first point to send (segment-relative in sequence
    /// mode).
    pub first_point: u32,
    /// Segment to send in sequence mode; 0 sends all segments.
    pub segment: u32,
}

impl Default for WaveformWindow {
    fn default() -> Self {
        Self {
            points: 0,
            sparsing: 1,
            first_point: 0,
            segment: 0,
        }
    }
}

/// Waveform dump format (`CFMT`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveformFormat {
    pub block_format: String,
    pub data_type: String,
    pub encoding: String,
}

impl Default for WaveformFormat {
    fn default() -> Self {
        Self {
            block_format: "DEF9".to_string(),
            data_type: "WORD".to_string(),
            encoding: "BIN".to_string(),
        }
    }
}

/// Optional follow-up settings for [`Oscilloscope::set_trigger`]. Absent
/// fields issue no command at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriggerSetup {
    pub mode: Option<TriggerMode>,
    pub slope: Option<TriggerSlope>,
    /// Trigger delay (`TRDL`).
    pub delay: Option<f64>,
    /// Trigger level (`TRLV`).
    pub level: Option<f64>,
    /// Coupling keyword, validated against the source's coupling set.
    pub coupling: Option<String>,
}

/// Oscilloscope facade over [`ScpiClient`].
///
/// Channel, trace, memory and trigger-source arguments accept integers or
/// strings and are normalized against the instrument's whitelists before
/// anything is written.
pub struct Oscilloscope {
    client: ScpiClient,
}

impl Oscilloscope {
    pub fn new(client: ScpiClient) -> Self {
        Self { client }
    }

    /// Direct access to the underlying client.
    pub fn client(&mut self) -> &mut ScpiClient {
        &mut self.client
    }

    /// `*IDN?` identity string.
    pub fn idn(&mut self) -> Result<String, ScpiError> {
        self.client.idn()
    }

    /// Write a custom pre-formed command verbatim.
    pub fn write_raw(&mut self, command: &str) -> Result<(), ScpiError> {
        self.client.write(command)
    }

    /// Read the instrument's output buffer, at most `max_bytes` bytes.
    pub fn read_buffer(&mut self, max_bytes: usize) -> Result<String, ScpiError> {
        self.client.read(max_bytes)
    }

    /// `CMR?`: read and clear the command error register, returning the
    /// description of the last syntax error.
    pub fn read_clear_error(&mut self) -> Result<&'static str, ScpiError> {
        let buffer = self.client.ask_raw("CMR?")?;
        let code = protocol::parse_leading_int(&buffer)?;
        protocol::describe_error(code)
    }

    // Acquisition control

    /// `WFSU`: set how much of a waveform is transmitted to the controller.
    pub fn setup_waveform(&mut self, window: &WaveformWindow) -> Result<(), ScpiError> {
        let cmd = Command::new("WFSU")
            .pair("NP", window.points)
            .pair("SP", window.sparsing)
            .pair("FP", window.first_point)
            .pair("SN", window.segment);
        self.client.send(&cmd)
    }

    /// `<channel>:WAVEFORM?`: request a waveform dump. The response can be
    /// large; read it with [`read_buffer`](Self::read_buffer) and an
    /// explicit cap.
    pub fn dump_waveform(&mut self, channel: impl Into<IdentInput>) -> Result<(), ScpiError> {
        let channel = ident::normalize(IdentifierClass::Channel, channel)?;
        self.client.query_raw(&format!("{channel}:WAVEFORM?"))
    }

    /// `SEQ`: configure sequence-mode acquisition. `max_size` is only
    /// emitted when `segments` is given.
    pub fn sequence(
        &mut self,
        mode: impl Into<SwitchInput>,
        segments: Option<u32>,
        max_size: Option<u32>,
    ) -> Result<(), ScpiError> {
        let mode = OnOff::normalize(mode)?;
        let cmd = Command::new("SEQ")
            .arg(mode)
            .arg_opt(segments)
            .arg_opt(segments.and(max_size));
        self.client.send(&cmd)
    }

    /// `ARM`: arm the scope, forcing a single acquisition if already armed.
    pub fn arm(&mut self) -> Result<(), ScpiError> {
        self.client.write("ARM")
    }

    /// `WAIT`: wait for the current acquisition to complete. `None` waits
    /// indefinitely.
    pub fn wait(&mut self, timeout_s: Option<f64>) -> Result<(), ScpiError> {
        let cmd = Command::new("WAIT").arg_opt(timeout_s);
        self.client.send(&cmd)
    }

    // Trigger control

    /// `TRMD`: set the trigger mode.
    pub fn set_trigger_mode(&mut self, mode: TriggerMode) -> Result<(), ScpiError> {
        self.set_param("TRMD", mode.mnemonic())
    }

    /// `TRSL`: set the trigger slope direction.
    pub fn set_trigger_slope(&mut self, slope: TriggerSlope) -> Result<(), ScpiError> {
        self.set_param("TRSL", slope.mnemonic())
    }

    /// `<source>:TRCP`: set the coupling of a trigger source. Channel
    /// sources and external sources accept different keyword sets.
    pub fn set_trigger_coupling(
        &mut self,
        source: impl Into<IdentInput>,
        coupling: &str,
    ) -> Result<(), ScpiError> {
        let source = ident::normalize_any(TRIGGER_SOURCE_CLASSES, source)?;
        let allowed = if source.starts_with('C') {
            CHANNEL_COUPLINGS
        } else {
            EXTERNAL_COUPLINGS
        };
        let coupling = ident::keyword(coupling, allowed, "trigger coupling")?;
        self.set_param(&format!("{source}:TRCP"), coupling)
    }

    /// `TRSE EDGE,SR,<source>` plus optional mode/slope/delay/level/coupling
    /// follow-ups. Only edge triggering is supported.
    pub fn set_trigger(
        &mut self,
        source: impl Into<IdentInput>,
        setup: &TriggerSetup,
    ) -> Result<(), ScpiError> {
        let source = ident::normalize_any(TRIGGER_SOURCE_CLASSES, source)?;
        let cmd = Command::new("TRSE").arg("EDGE").pair("SR", source);
        self.client.send(&cmd)?;

        if let Some(mode) = setup.mode {
            self.set_trigger_mode(mode)?;
        }
        if let Some(slope) = setup.slope {
            self.set_trigger_slope(slope)?;
        }
        if let Some(delay) = setup.delay {
            self.set_param("TRDL", delay)?;
        }
        if let Some(level) = setup.level {
            self.set_param("TRLV", level)?;
        }
        if let Some(coupling) = &setup.coupling {
            self.set_trigger_coupling(source, coupling)?;
        }
        Ok(())
    }

    // Display control

    /// `CLSW`: restart cumulative processing (averages, extrema, histograms,
    /// persistence, pass/fail counters).
    pub fn clear_sweeps(&mut self) -> Result<(), ScpiError> {
        self.client.write("CLSW")
    }

    /// Apply a settings file: one command per line, blank lines and `#`
    /// comments skipped. Returns the number of commands written.
    pub fn load_params(&mut self, path: &std::path::Path) -> Result<usize, ScpiError> {
        self.client.apply_settings(path)
    }

    /// `<trace>:TRA`: turn a channel or trace on or off.
    pub fn set_visibility(
        &mut self,
        trace: impl Into<IdentInput>,
        visibility: impl Into<SwitchInput>,
    ) -> Result<(), ScpiError> {
        let trace = ident::normalize_any(
            &[IdentifierClass::Channel, IdentifierClass::Trace],
            trace,
        )?;
        let visibility = OnOff::normalize(visibility)?;
        let cmd = Command::scoped(trace, "TRA").arg(visibility);
        self.client.send(&cmd)
    }

    // Memory management

    /// `CLM`: clear a waveform memory bank.
    pub fn clear_mem(&mut self, bank: impl Into<IdentInput>) -> Result<(), ScpiError> {
        let bank = ident::normalize(IdentifierClass::MemoryBank, bank)?;
        self.client.write(&format!("CLM {bank}"))
    }

    // Abstract parameter I/O

    /// Set an arbitrary parameter: `<parameter> <value>`.
    pub fn set_param(
        &mut self,
        parameter: &str,
        value: impl Into<ScpiValue>,
    ) -> Result<(), ScpiError> {
        let cmd = Command::new(parameter).arg(value);
        self.client.send(&cmd)
    }

    /// Set a parameter scoped to a normalized target:
    /// `<target>:<parameter> <value>`.
    pub fn set_target_param(
        &mut self,
        target: impl Into<IdentInput>,
        parameter: &str,
        value: impl Into<ScpiValue>,
    ) -> Result<(), ScpiError> {
        let target = ident::normalize_any(INSPECT_CLASSES, target)?;
        let cmd = Command::scoped(target, parameter).arg(value);
        self.client.send(&cmd)
    }

    /// Query a parameter (`<parameter>?`). The result lands in the output
    /// buffer; fetch it with [`read_buffer`](Self::read_buffer).
    pub fn query_param(&mut self, parameter: &str) -> Result<(), ScpiError> {
        self.client.query_raw(&format!("{parameter}?"))
    }

    /// Query a parameter and read the response in one step.
    pub fn ask_param(&mut self, parameter: &str) -> Result<String, ScpiError> {
        self.query_param(parameter)?;
        self.client.read(DEFAULT_RESPONSE_CAP)
    }

    /// `<header>:INSPECT? "<parameter>"[, <format>]`: request a readable
    /// dump of a parameter. Data-block dumps can run to thousands of items;
    /// the caller reads the response with an appropriate cap.
    pub fn inspect(
        &mut self,
        header: impl Into<IdentInput>,
        parameter: &str,
        format: Option<InspectFormat>,
    ) -> Result<(), ScpiError> {
        let header = ident::normalize_any(INSPECT_CLASSES, header)?;
        let cmd = Command::scoped(header, "INSPECT")
            .spaced_args()
            .arg(ScpiValue::quoted(parameter))
            .arg_opt(format.map(|f| f.mnemonic()));
        self.client.query(&cmd)
    }

    // Formatting / configuration

    /// `COMM_HEADER`: set the query response format.
    pub fn format_header(&mut self, format: HeaderFormat) -> Result<(), ScpiError> {
        self.client
            .write(&format!("COMM_HEADER {}", format.mnemonic()))
    }

    /// `COMM_ORDER`: set the byte order for waveform dumps.
    pub fn format_byte_order(&mut self, order: ByteOrder) -> Result<(), ScpiError> {
        self.client
            .write(&format!("COMM_ORDER {}", order.wire_value()))
    }

    /// `CFMT`: select the waveform dump format.
    pub fn format_waveform(&mut self, format: &WaveformFormat) -> Result<(), ScpiError> {
        let cmd = Command::new("CFMT")
            .arg(format.block_format.as_str())
            .arg(format.data_type.as_str())
            .arg(format.encoding.as_str());
        self.client.send(&cmd)
    }

    // VBS passthrough

    /// Run an instrument-native automation expression, no response.
    pub fn vbs_command(&mut self, expr: &str) -> Result<(), ScpiError> {
        self.client.vbs_run(expr)
    }

    /// Evaluate an expression, leaving the value in the output buffer.
    pub fn vbs_query(&mut self, expr: &str) -> Result<(), ScpiError> {
        self.client.vbs_query(expr)
    }

    /// Evaluate an expression and return its value.
    pub fn vbs_return(&mut self, expr: &str) -> Result<String, ScpiError> {
        self.client.vbs_ask(expr)
    }

    // Miscellaneous

    /// `BUZZ BEEP`: short beep.
    pub fn buzz(&mut self) -> Result<(), ScpiError> {
        self.client.write("BUZZ BEEP")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scpi::transport::LoopbackTransport;

    fn scope_with_loopback() -> (Oscilloscope, LoopbackTransport) {
        let loopback = LoopbackTransport::new();
        let scope = Oscilloscope::new(ScpiClient::with_transport(loopback.clone()));
        (scope, loopback)
    }

    #[test]
    fn setup_waveform_emits_flat_keyword_pairs() {
        let (mut scope, loopback) = scope_with_loopback();
        scope.setup_waveform(&WaveformWindow::default()).unwrap();
        scope
            .setup_waveform(&WaveformWindow {
                points: 5000,
                sparsing: 100,
                first_point: 5,
                segment: 0,
            })
            .unwrap();
        assert_eq!(
            loopback.written(),
            vec!["WFSU NP,0,SP,1,FP,0,SN,0", "WFSU NP,5000,SP,100,FP,5,SN,0"]
        );
    }

    #[test]
    fn read_clear_error_decodes_cmr_table() {
        let (mut scope, loopback) = scope_with_loopback();
        loopback.push_response("0");
        assert_eq!(scope.read_clear_error().unwrap(), "No Error");
        loopback.push_response("5\n");
        assert_eq!(scope.read_clear_error().unwrap(), "Unrecognized keyword");
        assert_eq!(loopback.written(), vec!["CMR?", "CMR?"]);
    }

    #[test]
    fn read_clear_error_rejects_unknown_code() {
        let (mut scope, loopback) = scope_with_loopback();
        loopback.push_response("42");
        assert!(matches!(
            scope.read_clear_error(),
            Err(ScpiError::UnknownErrorCode(42))
        ));
    }

    #[test]
    fn sequence_optional_clause_suppression() {
        let (mut scope, loopback) = scope_with_loopback();
        scope.sequence("ON", None, None).unwrap();
        scope.sequence(true, Some(200), None).unwrap();
        scope.sequence(1, Some(200), Some(25000)).unwrap();
        // max_size without segments is dropped along with it
        scope.sequence("off", None, Some(25000)).unwrap();
        assert_eq!(
            loopback.written(),
            vec!["SEQ ON", "SEQ ON,200", "SEQ ON,200,25000", "SEQ OFF"]
        );
    }

    #[test]
    fn trigger_setup_with_optional_followups() {
        let (mut scope, loopback) = scope_with_loopback();
        scope
            .set_trigger(
                "ex",
                &TriggerSetup {
                    mode: Some(TriggerMode::Norm),
                    slope: Some(TriggerSlope::Neg),
                    delay: None,
                    level: Some(0.5),
                    coupling: Some("dc50".to_string()),
                },
            )
            .unwrap();
        assert_eq!(
            loopback.written(),
            vec![
                "TRSE EDGE,SR,EX",
                "TRMD NORM",
                "TRSL NEG",
                "TRLV 0.5",
                "EX:TRCP DC50",
            ]
        );
    }

    #[test]
    fn bare_trigger_source_writes_only_trse() {
        let (mut scope, loopback) = scope_with_loopback();
        scope.set_trigger(1, &TriggerSetup::default()).unwrap();
        assert_eq!(loopback.written(), vec!["TRSE EDGE,SR,C1"]);
    }

    #[test]
    fn trigger_coupling_keyword_set_depends_on_source() {
        let (mut scope, loopback) = scope_with_loopback();
        scope.set_trigger_coupling(2, "hfrej").unwrap();
        scope.set_trigger_coupling("EX10", "gnd").unwrap();
        assert_eq!(
            loopback.written(),
            vec!["C2:TRCP HFREJ", "EX10:TRCP GND"]
        );
        // A channel-only coupling is rejected for an external source.
        assert!(matches!(
            scope.set_trigger_coupling("EX", "HFREJ"),
            Err(ScpiError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn visibility_accepts_channels_and_traces() {
        let (mut scope, loopback) = scope_with_loopback();
        scope.set_visibility(1, "ON").unwrap();
        scope.set_visibility("f5", false).unwrap();
        assert_eq!(loopback.written(), vec!["C1:TRA ON", "F5:TRA OFF"]);
        assert!(matches!(
            scope.set_visibility("F2", true),
            Err(ScpiError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn clear_mem_normalizes_bank() {
        let (mut scope, loopback) = scope_with_loopback();
        scope.clear_mem(3).unwrap();
        scope.clear_mem("m1").unwrap();
        assert_eq!(loopback.written(), vec!["CLM M3", "CLM M1"]);
    }

    #[test]
    fn param_set_and_query() {
        let (mut scope, loopback) = scope_with_loopback();
        scope.set_param("TDIV", 5e-6).unwrap();
        scope.set_target_param(1, "VDIV", 0.06).unwrap();
        scope.query_param("WFSU").unwrap();
        loopback.push_response("WFSU NP,0,SP,1,FP,0,SN,0");
        let response = scope.read_buffer(100).unwrap();
        assert_eq!(response, "WFSU NP,0,SP,1,FP,0,SN,0");
        assert_eq!(
            loopback.written(),
            vec!["TDIV 0.000005", "C1:VDIV 0.06", "WFSU?"]
        );
    }

    #[test]
    fn inspect_quotes_parameter_and_appends_format() {
        let (mut scope, loopback) = scope_with_loopback();
        scope.inspect(1, "SIMPLE", Some(InspectFormat::Byte)).unwrap();
        loopback.push_response("C1:INSP \"SIMPLE\"...");
        scope.read_buffer(1_000_000).unwrap();
        scope.inspect("M2", "VERTICAL_GAIN", None).unwrap();
        loopback.push_response("...");
        scope.read_buffer(80).unwrap();
        assert_eq!(
            loopback.written(),
            vec![
                "C1:INSPECT? \"SIMPLE\", BYTE",
                "M2:INSPECT? \"VERTICAL_GAIN\"",
            ]
        );
    }

    #[test]
    fn formatting_commands() {
        let (mut scope, loopback) = scope_with_loopback();
        scope.format_header(HeaderFormat::Off).unwrap();
        scope.format_byte_order(ByteOrder::LowByteFirst).unwrap();
        scope.format_waveform(&WaveformFormat::default()).unwrap();
        assert_eq!(
            loopback.written(),
            vec!["COMM_HEADER OFF", "COMM_ORDER 1", "CFMT DEF9,WORD,BIN"]
        );
    }

    #[test]
    fn dump_waveform_is_a_query() {
        let (mut scope, loopback) = scope_with_loopback();
        scope.dump_waveform("c2").unwrap();
        loopback.push_response("C2:WF DAT1,#9000000010...");
        scope.read_buffer(80).unwrap();
        assert_eq!(loopback.written(), vec!["C2:WAVEFORM?"]);
    }

    #[test]
    fn mode_keywords_parse_case_insensitively() {
        assert_eq!("norm".parse::<TriggerMode>().unwrap(), TriggerMode::Norm);
        assert_eq!("POS".parse::<TriggerSlope>().unwrap(), TriggerSlope::Pos);
        assert_eq!("off".parse::<HeaderFormat>().unwrap(), HeaderFormat::Off);
        assert!("sometimes".parse::<TriggerMode>().is_err());
    }

    #[test]
    fn vbs_round_trip_through_facade() {
        let (mut scope, loopback) = scope_with_loopback();
        scope
            .vbs_command("app.Measure.P1.ParamEngine=\"Mean\"")
            .unwrap();
        loopback.push_response("3.1e-2");
        let value = scope.vbs_return("app.Measure.P1.Out.Result.Value").unwrap();
        assert_eq!(value, "3.1e-2");
        assert_eq!(
            loopback.written(),
            vec![
                "VBS  'app.Measure.P1.ParamEngine=\"Mean\" ' ",
                "VBS?  'return=app.Measure.P1.Out.Result.Value ' ",
            ]
        );
    }

    #[test]
    fn wait_with_and_without_timeout() {
        let (mut scope, loopback) = scope_with_loopback();
        scope.wait(None).unwrap();
        scope.wait(Some(5.0)).unwrap();
        assert_eq!(loopback.written(), vec!["WAIT", "WAIT 5"]);
    }

    #[test]
    fn arm_clear_sweeps_buzz() {
        let (mut scope, loopback) = scope_with_loopback();
        scope.arm().unwrap();
        scope.clear_sweeps().unwrap();
        scope.buzz().unwrap();
        assert_eq!(loopback.written(), vec!["ARM", "CLSW", "BUZZ BEEP"]);
    }
}
