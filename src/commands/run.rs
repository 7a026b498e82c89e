//! The `run` command: Ring-Con session from handshake to key taps

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use ringcon_driver::{DriverConfig, KeyBindings, LogSink, VirtualKeyboard};
use ringcon_strain::{KeySink, RingConError, RingConSession, SessionConfig, StreamStats};
use ringcon_transport::{BoxedChannel, HidDiscovery};
use tracing::{error, info};

use super::hint_for;

/// Options for `run` after merging CLI flags over the config
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub dry_run: bool,
    pub command_timeout: Duration,
    pub device_name: String,
    pub bindings: KeyBindings,
}

impl RunOptions {
    /// CLI flags win over config values
    pub fn new(config: &DriverConfig, dry_run: bool, timeout_ms: Option<u64>) -> Self {
        Self {
            dry_run,
            command_timeout: timeout_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| config.command_timeout()),
            device_name: config.device_name.clone(),
            bindings: KeyBindings::from_config(config),
        }
    }
}

/// Create the key sink for this run
fn open_sink(options: &RunOptions) -> Result<Box<dyn KeySink + Send>, RingConError> {
    if options.dry_run {
        info!("Dry run: key taps are logged only");
        return Ok(Box::new(LogSink::new(options.bindings)));
    }

    let mut keyboard = VirtualKeyboard::new(&options.device_name, options.bindings)?;
    info!("Created virtual keyboard: {}", options.device_name);
    if let Some(path) = keyboard.device_path() {
        info!("Device path: {}", path.display());
    }
    Ok(Box::new(keyboard))
}

/// Run until Ctrl+C or until the controller goes away
pub async fn run(options: RunOptions) -> Result<()> {
    let result = drive(&options).await;
    if let Err(e) = &result {
        error!("{}", e);
        hint_for(e);
    }
    Ok(result?)
}

async fn drive(options: &RunOptions) -> Result<(), RingConError> {
    // Fail on uinput before touching the controller
    let mut sink = open_sink(options)?;

    let channel: BoxedChannel = Arc::new(HidDiscovery::new().open_first()?);
    let session = RingConSession::new(
        channel,
        SessionConfig {
            command_timeout: options.command_timeout,
        },
    );

    let mut classifier = tokio::select! {
        result = session.start() => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted during start-up");
            return Ok(());
        }
    };

    info!(
        "Squeeze for {}, pull for {}. Press Ctrl+C to exit.",
        options.bindings.left.display_name(),
        options.bindings.right.display_name()
    );

    let mut stats = StreamStats::default();
    let outcome = tokio::select! {
        result = session.stream(&mut classifier, sink.as_mut(), &mut stats) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
            Ok(())
        }
    };

    info!(
        "{} samples, {} key taps, {} malformed, {} failed taps",
        stats.samples, stats.events, stats.malformed, stats.sink_errors
    );
    outcome
}
