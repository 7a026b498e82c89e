//! Utility commands: list, init-config

use std::path::PathBuf;

use anyhow::Result;
use ringcon_driver::DriverConfig;
use ringcon_transport::device_registry::model_name;
use ringcon_transport::HidDiscovery;

/// List connected Joy-Con (R) controllers
pub fn list() -> Result<()> {
    let devices = HidDiscovery::new().list_devices()?;
    if devices.is_empty() {
        println!("No Joy-Con (R) found. Pair it over Bluetooth first.");
        return Ok(());
    }

    println!("Found {} controller(s):", devices.len());
    for (i, device) in devices.iter().enumerate() {
        let info = &device.info;
        println!(
            "  [{}] {} VID={:04x} PID={:04x} {} serial={} path={}",
            i,
            info.product_name
                .as_deref()
                .unwrap_or_else(|| model_name(info.pid)),
            info.vid,
            info.pid,
            if info.is_bluetooth { "bluetooth" } else { "usb" },
            info.serial.as_deref().unwrap_or("-"),
            info.device_path,
        );
    }
    if devices.len() > 1 {
        println!("Only the first controller is used.");
    }
    Ok(())
}

/// Write `config` to `path`
pub fn init_config(config: &DriverConfig, path: &PathBuf) -> Result<()> {
    config.save(path)?;
    println!("Wrote config to {}", path.display());
    Ok(())
}
