//! SCPI command composition.
//!
//! A [`Command`] is a header (either a bare verb like `WFSU`, or a
//! colon-scoped `target:verb` like `C1:TRA`) followed by an ordered list of
//! parameter values. Building a command performs no I/O; the wire string is
//! produced by [`Command::to_wire`] or [`Command::to_query`] and handed to a
//! transport by the client.

use std::fmt;

use crate::error::ScpiError;

/// On/Off switch parameter, normalized from booleans, 0/1 integers, or
/// keyword strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnOff {
    On,
    Off,
}

impl OnOff {
    pub const fn mnemonic(self) -> &'static str {
        match self {
            OnOff::On => "ON",
            OnOff::Off => "OFF",
        }
    }

    /// Normalize heterogeneous input into an `ON`/`OFF` keyword.
    ///
    /// ```
    /// use benchlink::OnOff;
    ///
    /// assert_eq!(OnOff::normalize(true).unwrap(), OnOff::On);
    /// assert_eq!(OnOff::normalize(0).unwrap(), OnOff::Off);
    /// assert_eq!(OnOff::normalize("off").unwrap(), OnOff::Off);
    /// assert!(OnOff::normalize("maybe").is_err());
    /// ```
    pub fn normalize(input: impl Into<SwitchInput>) -> Result<Self, ScpiError> {
        match input.into() {
            SwitchInput::Flag(true) => Ok(OnOff::On),
            SwitchInput::Flag(false) => Ok(OnOff::Off),
            SwitchInput::Level(1) => Ok(OnOff::On),
            SwitchInput::Level(0) => Ok(OnOff::Off),
            SwitchInput::Level(other) => Err(ScpiError::InvalidBoolean(other.to_string())),
            SwitchInput::Word(word) => {
                if word.eq_ignore_ascii_case("ON")
                    || word.eq_ignore_ascii_case("TRUE")
                    || word == "1"
                {
                    Ok(OnOff::On)
                } else if word.eq_ignore_ascii_case("OFF")
                    || word.eq_ignore_ascii_case("FALSE")
                    || word == "0"
                {
                    Ok(OnOff::Off)
                } else {
                    Err(ScpiError::InvalidBoolean(word))
                }
            }
        }
    }
}

impl fmt::Display for OnOff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl From<bool> for OnOff {
    fn from(value: bool) -> Self {
        if value { OnOff::On } else { OnOff::Off }
    }
}

/// Heterogeneous input for On/Off parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchInput {
    Flag(bool),
    Level(i64),
    Word(String),
}

impl From<bool> for SwitchInput {
    fn from(value: bool) -> Self {
        SwitchInput::Flag(value)
    }
}

impl From<i64> for SwitchInput {
    fn from(value: i64) -> Self {
        SwitchInput::Level(value)
    }
}

impl From<i32> for SwitchInput {
    fn from(value: i32) -> Self {
        SwitchInput::Level(value as i64)
    }
}

impl From<&str> for SwitchInput {
    fn from(value: &str) -> Self {
        SwitchInput::Word(value.to_string())
    }
}

impl From<String> for SwitchInput {
    fn from(value: String) -> Self {
        SwitchInput::Word(value)
    }
}

impl From<OnOff> for SwitchInput {
    fn from(value: OnOff) -> Self {
        SwitchInput::Flag(value == OnOff::On)
    }
}

/// A single command parameter, serialized with the grammar's value rules.
///
/// Numerics use default decimal formatting (the instruments accept any
/// reasonable decimal spelling, so no precision is enforced). `Quoted` wraps
/// its text in double quotes for commands such as `MMEMory:LOAD:STATe "x"`.
#[derive(Debug, Clone, PartialEq)]
pub enum ScpiValue {
    Int(i64),
    Float(f64),
    Text(String),
    Quoted(String),
    Switch(OnOff),
}

impl ScpiValue {
    pub fn quoted(text: impl Into<String>) -> Self {
        ScpiValue::Quoted(text.into())
    }
}

impl fmt::Display for ScpiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScpiValue::Int(n) => write!(f, "{n}"),
            ScpiValue::Float(x) => write!(f, "{x}"),
            ScpiValue::Text(s) => f.write_str(s),
            ScpiValue::Quoted(s) => write!(f, "\"{s}\""),
            ScpiValue::Switch(state) => f.write_str(state.mnemonic()),
        }
    }
}

impl From<i64> for ScpiValue {
    fn from(value: i64) -> Self {
        ScpiValue::Int(value)
    }
}

impl From<i32> for ScpiValue {
    fn from(value: i32) -> Self {
        ScpiValue::Int(value as i64)
    }
}

impl From<u32> for ScpiValue {
    fn from(value: u32) -> Self {
        ScpiValue::Int(value as i64)
    }
}

impl From<u16> for ScpiValue {
    fn from(value: u16) -> Self {
        ScpiValue::Int(value as i64)
    }
}

impl From<f64> for ScpiValue {
    fn from(value: f64) -> Self {
        ScpiValue::Float(value)
    }
}

impl From<f32> for ScpiValue {
    fn from(value: f32) -> Self {
        ScpiValue::Float(value as f64)
    }
}

impl From<&str> for ScpiValue {
    fn from(value: &str) -> Self {
        ScpiValue::Text(value.to_string())
    }
}

impl From<String> for ScpiValue {
    fn from(value: String) -> Self {
        ScpiValue::Text(value)
    }
}

impl From<OnOff> for ScpiValue {
    fn from(value: OnOff) -> Self {
        ScpiValue::Switch(value)
    }
}

impl From<bool> for ScpiValue {
    fn from(value: bool) -> Self {
        ScpiValue::Switch(value.into())
    }
}

/// Composable SCPI command.
///
/// Parameters are emitted comma-separated in the order they were added; an
/// absent optional parameter is omitted entirely, separator included. Two
/// separator styles exist on the wire (`WFSU NP,0,SP,1` vs
/// `APPL:SIN 10, 1, 0`); [`Command::spaced_args`] selects the latter.
///
/// ```
/// use benchlink::Command;
///
/// let cmd = Command::new("WFSU")
///     .pair("NP", 0)
///     .pair("SP", 1)
///     .pair("FP", 0)
///     .pair("SN", 0);
/// assert_eq!(cmd.to_wire(), "WFSU NP,0,SP,1,FP,0,SN,0");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    header: String,
    args: Vec<ScpiValue>,
    spaced: bool,
}

impl Command {
    pub fn new(verb: impl Into<String>) -> Self {
        Self {
            header: verb.into(),
            args: Vec::new(),
            spaced: false,
        }
    }

    /// Colon-scoped header, e.g. `Command::scoped("C1", "TRA")` -> `C1:TRA`.
    pub fn scoped(target: &str, verb: &str) -> Self {
        Self::new(format!("{target}:{verb}"))
    }

    /// Append a parameter.
    pub fn arg(mut self, value: impl Into<ScpiValue>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Append a parameter only if it is present. Absent parameters leave no
    /// empty placeholder and no separator.
    pub fn arg_opt<V: Into<ScpiValue>>(mut self, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.args.push(value.into());
        }
        self
    }

    /// Append a `key,value` parameter pair (flat-keyword grammar).
    pub fn pair(self, key: &str, value: impl Into<ScpiValue>) -> Self {
        self.arg(key).arg(value)
    }

    /// Join parameters with `", "` instead of `","`.
    pub fn spaced_args(mut self) -> Self {
        self.spaced = true;
        self
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    /// Wire text of the set form: `HEADER` or `HEADER arg1,arg2,...`.
    pub fn to_wire(&self) -> String {
        self.render(&self.header)
    }

    /// Wire text of the query form: the header gains a `?`. Parameters, if
    /// any, follow as usual (`C1:INSPECT? "SIMPLE", BYTE`).
    pub fn to_query(&self) -> String {
        self.render(&format!("{}?", self.header))
    }

    fn render(&self, header: &str) -> String {
        if self.args.is_empty() {
            return header.to_string();
        }
        let sep = if self.spaced { ", " } else { "," };
        let args: Vec<String> = self.args.iter().map(ToString::to_string).collect();
        format!("{header} {}", args.join(sep))
    }
}
