//! Agilent 33522A function generator driver.

use std::thread;
use std::time::Duration;

use log::{info, warn};

use crate::error::ScpiError;
use crate::scpi::command::{Command, OnOff, ScpiValue, SwitchInput};
use crate::scpi::ident::{self, IdentInput, IdentifierClass};
use crate::scpi::waveform::Waveform;
use crate::settings;

use super::ScpiClient;

/// Function generator facade over [`ScpiClient`].
///
/// Channel and state arguments are normalized before anything reaches the
/// wire: channels come from the `Output` whitelist (`1`, `2`), states pass
/// through the On/Off normalizer.
///
/// ```no_run
/// use benchlink::{fgen_selectors, FunctionGenerator, ScpiClient};
/// # fn transport() -> benchlink::LoopbackTransport { benchlink::LoopbackTransport::new() }
///
/// let client = ScpiClient::builder()
///     .selector(1)
///     .selector_table(fgen_selectors())
///     .transport(transport())
///     .build()?;
/// let mut fgen = FunctionGenerator::new(client);
/// fgen.push_sin(10.0, 1.0, 0.0)?;
/// fgen.set_output(1, true)?;
/// # Ok::<(), benchlink::ScpiError>(())
/// ```
pub struct FunctionGenerator {
    client: ScpiClient,
}

impl FunctionGenerator {
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

    /// `APPLy?`: current output function and settings.
    pub fn status(&mut self) -> Result<String, ScpiError> {
        self.client.ask_raw("APPLy?")
    }

    /// `*TRG`: send a manual bus trigger.
    pub fn send_trigger(&mut self) -> Result<(), ScpiError> {
        self.client.write("*TRG")
    }

    /// Program a sine output: `APPL:SIN <freq>, <amplitude>, <offset>`.
    /// Frequency in Hz, amplitude and DC offset in volts.
    pub fn push_sin(
        &mut self,
        frequency: f64,
        amplitude: f64,
        offset: f64,
    ) -> Result<(), ScpiError> {
        let cmd = Command::new("APPL:SIN")
            .spaced_args()
            .arg(frequency)
            .arg(amplitude)
            .arg(offset);
        self.client.send(&cmd)
    }

    /// `SYSTem:ERRor?`: pop the next error off the instrument's queue.
    pub fn next_error(&mut self) -> Result<String, ScpiError> {
        self.client.ask_raw("SYSTem:ERRor?")
    }

    /// Load a named instrument state (`.sta` file already on the device).
    pub fn load_state(&mut self, state_name: &str) -> Result<(), ScpiError> {
        let cmd = Command::new("MMEMory:LOAD:STATe").arg(ScpiValue::quoted(state_name));
        self.client.send(&cmd)
    }

    /// Upload an arbitrary waveform into volatile memory. The waveform is
    /// validated at construction; nothing is written on a rejected one.
    pub fn load_waveform(&mut self, waveform: &Waveform) -> Result<(), ScpiError> {
        self.client.write(&waveform.to_wire())
    }

    /// Upload an arbitrary waveform, then select and output it:
    /// upload, `FUNC:ARB VOLATILE`, `FUNC:SHAP ARB`, in that order.
    pub fn push_waveform(&mut self, waveform: &Waveform) -> Result<(), ScpiError> {
        self.load_waveform(waveform)?;
        self.client.write("FUNC:ARB VOLATILE")?;
        self.client.write("FUNC:SHAP ARB")
    }

    /// Apply a settings file line by line, checking the error queue after
    /// each command. Device-reported errors (leading `-`) are logged, not
    /// fatal. Returns the number of commands written.
    pub fn load_settings(&mut self, path: &std::path::Path) -> Result<usize, ScpiError> {
        let lines = settings::read_settings(path)?;
        info!("Loading {} command(s) from {}", lines.len(), path.display());
        for line in &lines {
            self.client.write(line)?;
            let errmsg = self.next_error()?;
            if errmsg.trim_start().starts_with('-') {
                warn!("\"{line}\" reported: {errmsg}");
            }
        }
        Ok(lines.len())
    }

    /// `*CLS`: clear any error statuses without a power cycle.
    pub fn clear_errors(&mut self) -> Result<(), ScpiError> {
        self.client.clear_errors()
    }

    /// `*RST`, wait for the instrument to settle, then clear the error
    /// queue.
    pub fn reset(&mut self) -> Result<(), ScpiError> {
        self.client.reset()?;
        thread::sleep(Duration::from_secs(1));
        self.clear_errors()?;
        thread::sleep(Duration::from_millis(100));
        Ok(())
    }

    /// Switch an output channel on or off: `OUTPUT<n> ON|OFF`.
    pub fn set_output(
        &mut self,
        channel: impl Into<IdentInput>,
        state: impl Into<SwitchInput>,
    ) -> Result<(), ScpiError> {
        let channel = ident::normalize(IdentifierClass::Output, channel)?;
        let state = OnOff::normalize(state)?;
        self.client.write(&format!("OUTPUT{channel} {state}"))
    }
}
