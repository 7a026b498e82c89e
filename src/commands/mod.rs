//! Command handlers for the CLI application.
//!
//! - `run`: connect, calibrate and stream key taps
//! - `utility`: list controllers, write the config file

pub mod run;
pub mod utility;

use ringcon_strain::RingConError;
use ringcon_transport::TransportError;
use tracing::warn;

/// Log a hint for errors the user can usually fix
pub fn hint_for(err: &RingConError) {
    match err {
        RingConError::Transport(TransportError::HidPermissionDenied(_)) => {
            warn!("No access to the hidraw node; add a udev rule for 057e:2007 or run as root");
        }
        RingConError::Transport(TransportError::DeviceNotFound(_)) => {
            warn!("Pair the Joy-Con (R) over Bluetooth and try again");
        }
        RingConError::AccessoryNotFound { .. } => {
            warn!("Attach the Joy-Con (R) to the Ring-Con rail");
        }
        RingConError::Sink(_) => {
            warn!("Creating a virtual keyboard needs write access to /dev/uinput (or use --dry-run)");
        }
        _ => {}
    }
}
