//! Ring-Con bring-up sequence
//!
//! A Joy-Con (R) powers up in simple HID mode with its MCU off. Reaching
//! the Ring-Con's strain sensor takes six sub-commands in fixed order:
//!
//! | Step | Sub-command | Ack (1-based offset = value) |
//! |------|-------------|------------------------------|
//! | SetReportMode | `03 30` | 14=03 |
//! | EnableMcu | `22 01` | 13=80, 14=22 |
//! | ConfigureMcu | `21 21 01 01 .. F3` | 14=21 |
//! | ProbeAccessory | `59` | 14=59, 16=20 |
//! | ConfigureInputFormat | `5C 06 03 25 ..` | 14=5C |
//! | StartPolling | `5A 04 01 01 02` | 14=5A |
//!
//! A seventh, `BlinkLed` (`30 90`, ack 14=30), lights the player LEDs once
//! calibration is done to show the user the ring is live.

use std::time::Duration;

use ringcon_transport::ReportChannel;
use tracing::{info, warn};

use crate::error::RingConError;
use crate::sequencer::{execute, CommandSpec, TimeoutKind, DEFAULT_COMMAND_TIMEOUT};

/// Message reported when the accessory probe goes unanswered
pub const ACCESSORY_NOT_FOUND_MESSAGE: &str = "peripheral not found";

/// MCU configuration: 21 21 01 01, 34 zero bytes, then the CRC byte F3
const CONFIGURE_MCU: [u8; 39] = {
    let mut cmd = [0u8; 39];
    cmd[0] = 0x21;
    cmd[1] = 0x21;
    cmd[2] = 0x01;
    cmd[3] = 0x01;
    cmd[38] = 0xF3;
    cmd
};

/// External device input format for the Ring-Con
const CONFIGURE_INPUT_FORMAT: [u8; 38] = [
    0x5C, 0x06, 0x03, 0x25, 0x06, 0x00, 0x00, 0x00, 0x00, 0x1C, 0x16, 0xED, 0x34, 0x36, 0x00,
    0x00, 0x00, 0x0A, 0x64, 0x0B, 0xE6, 0xA9, 0x22, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x90, 0xA8, 0xE1, 0x34, 0x36,
];

/// One named step of the bring-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InitStep {
    /// Switch the input report mode to 0x30 (standard full, streamed)
    SetReportMode,
    /// Power on the MCU data path
    EnableMcu,
    /// Configure the MCU for external device polling
    ConfigureMcu,
    /// Ask for the attached external device; the Ring-Con answers 0x20
    ProbeAccessory,
    /// Set the external device input format
    ConfigureInputFormat,
    /// Start polling the external device
    StartPolling,
    /// Blink the player LEDs as a ready signal
    BlinkLed,
}

impl InitStep {
    /// Every step, in the order they are issued
    pub const ALL: [InitStep; 7] = [
        InitStep::SetReportMode,
        InitStep::EnableMcu,
        InitStep::ConfigureMcu,
        InitStep::ProbeAccessory,
        InitStep::ConfigureInputFormat,
        InitStep::StartPolling,
        InitStep::BlinkLed,
    ];

    /// Steps that must succeed before telemetry carries strain values
    pub const HANDSHAKE: [InitStep; 6] = [
        InitStep::SetReportMode,
        InitStep::EnableMcu,
        InitStep::ConfigureMcu,
        InitStep::ProbeAccessory,
        InitStep::ConfigureInputFormat,
        InitStep::StartPolling,
    ];

    /// Step name for logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            InitStep::SetReportMode => "set report mode",
            InitStep::EnableMcu => "enable MCU",
            InitStep::ConfigureMcu => "configure MCU",
            InitStep::ProbeAccessory => "probe accessory",
            InitStep::ConfigureInputFormat => "configure input format",
            InitStep::StartPolling => "start polling",
            InitStep::BlinkLed => "blink LED",
        }
    }

    /// Sub-command bytes for this step
    pub fn subcommand(&self) -> &'static [u8] {
        match self {
            InitStep::SetReportMode => &[0x03, 0x30],
            InitStep::EnableMcu => &[0x22, 0x01],
            InitStep::ConfigureMcu => &CONFIGURE_MCU,
            InitStep::ProbeAccessory => &[0x59],
            InitStep::ConfigureInputFormat => &CONFIGURE_INPUT_FORMAT,
            InitStep::StartPolling => &[0x5A, 0x04, 0x01, 0x01, 0x02],
            InitStep::BlinkLed => &[0x30, 0x90],
        }
    }

    /// Acknowledgment pattern (1-based payload offsets)
    pub fn expected_ack(&self) -> &'static [(usize, u8)] {
        match self {
            InitStep::SetReportMode => &[(14, 0x03)],
            InitStep::EnableMcu => &[(13, 0x80), (14, 0x22)],
            InitStep::ConfigureMcu => &[(14, 0x21)],
            InitStep::ProbeAccessory => &[(14, 0x59), (16, 0x20)],
            InitStep::ConfigureInputFormat => &[(14, 0x5C)],
            InitStep::StartPolling => &[(14, 0x5A)],
            InitStep::BlinkLed => &[(14, 0x30)],
        }
    }

    /// Build the command for this step
    pub fn spec(&self, timeout: Duration) -> CommandSpec {
        let spec = CommandSpec::new(self.name(), self.subcommand(), self.expected_ack())
            .with_timeout(timeout);
        match self {
            InitStep::ProbeAccessory => spec.with_timeout_kind(TimeoutKind::AccessoryNotFound(
                ACCESSORY_NOT_FOUND_MESSAGE.to_string(),
            )),
            _ => spec,
        }
    }
}

/// The fixed bring-up sequence with a shared per-command timeout
#[derive(Debug, Clone)]
pub struct InitializationSequence {
    command_timeout: Duration,
}

impl Default for InitializationSequence {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND_TIMEOUT)
    }
}

impl InitializationSequence {
    /// Create a sequence waiting `command_timeout` for each acknowledgment
    pub fn new(command_timeout: Duration) -> Self {
        Self { command_timeout }
    }

    /// Commands of the handshake, in order
    pub fn handshake(&self) -> Vec<CommandSpec> {
        InitStep::HANDSHAKE
            .iter()
            .map(|step| step.spec(self.command_timeout))
            .collect()
    }

    /// Run one step
    pub async fn run_step<C>(&self, step: InitStep, channel: &C) -> Result<(), RingConError>
    where
        C: ReportChannel + ?Sized,
    {
        execute(&step.spec(self.command_timeout), channel).await
    }

    /// Run the handshake, stopping at the first failure
    ///
    /// Each command is sent only after the previous one was acknowledged
    /// and settled.
    pub async fn initialize<C>(&self, channel: &C) -> Result<(), RingConError>
    where
        C: ReportChannel + ?Sized,
    {
        let commands = self.handshake();
        let total = commands.len();
        for (i, command) in commands.iter().enumerate() {
            info!("[{}/{}] {}", i + 1, total, command.name);
            if let Err(e) = execute(command, channel).await {
                warn!("Handshake stopped at {}: {}", command.name, e);
                return Err(e);
            }
        }
        info!("Ring-Con handshake complete");
        Ok(())
    }

    /// Blink the player LEDs to signal the ring is ready
    pub async fn signal_ready<C>(&self, channel: &C) -> Result<(), RingConError>
    where
        C: ReportChannel + ?Sized,
    {
        self.run_step(InitStep::BlinkLed, channel).await
    }
}
