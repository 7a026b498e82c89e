//! Device registry - Joy-Con identification by VID/PID
//!
//! The Ring-Con has no USB identity of its own; it is reached through the
//! rail of a right Joy-Con, so only that controller is accepted.

/// Nintendo vendor ID
pub const VENDOR_ID: u16 = 0x057E;

/// Joy-Con (L) product ID
pub const PID_JOYCON_L: u16 = 0x2006;

/// Joy-Con (R) product ID
pub const PID_JOYCON_R: u16 = 0x2007;

/// VID/PID pairs the driver will open
pub const SUPPORTED_DEVICES: &[(u16, u16)] = &[(VENDOR_ID, PID_JOYCON_R)];

/// Check if a VID/PID pair is a controller the Ring-Con can attach to
#[inline]
pub fn is_supported(vid: u16, pid: u16) -> bool {
    SUPPORTED_DEVICES.contains(&(vid, pid))
}

/// Human-readable model name for a Nintendo PID
pub fn model_name(pid: u16) -> &'static str {
    match pid {
        PID_JOYCON_L => "Joy-Con (L)",
        PID_JOYCON_R => "Joy-Con (R)",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joycon_r_supported() {
        assert!(is_supported(0x057E, 0x2007));
    }

    #[test]
    fn test_left_joycon_rejected() {
        // The Ring-Con rail only exists on the right controller
        assert!(!is_supported(0x057E, 0x2006));
        assert!(!is_supported(0x3151, 0x2007));
    }

    #[test]
    fn test_model_names() {
        assert_eq!(model_name(PID_JOYCON_R), "Joy-Con (R)");
        assert_eq!(model_name(PID_JOYCON_L), "Joy-Con (L)");
        assert_eq!(model_name(0x0000), "Unknown");
    }
}
