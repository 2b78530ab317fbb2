//! Camera permission and device checks for the nokhwa backend.
//!
//! On macOS camera access is gated by TCC; nokhwa reports whether the app
//! has been authorized. Other platforms have no per-app consent step, so a
//! missing device is the only failure mode before opening.

use nokhwa::utils::ApiBackend;

use camera_record_core::models::error::CaptureError;

/// Whether the process may open a camera.
pub fn check_camera_permission() -> bool {
    nokhwa::nokhwa_check()
}

/// Fail with the acquisition error that applies, if any.
pub fn ensure_camera_access() -> Result<(), CaptureError> {
    if !check_camera_permission() {
        return Err(CaptureError::PermissionDenied);
    }
    let cameras = nokhwa::query(ApiBackend::Auto).map_err(|e| {
        log::warn!("Failed to enumerate cameras: {}", e);
        CaptureError::DeviceNotAvailable
    })?;
    if cameras.is_empty() {
        return Err(CaptureError::DeviceNotAvailable);
    }
    Ok(())
}

/// Map an open/stream failure to the acquisition taxonomy.
pub fn classify_open_error(message: &str) -> CaptureError {
    let lower = message.to_ascii_lowercase();
    if lower.contains("permission") || lower.contains("denied") || lower.contains("not authorized") {
        CaptureError::PermissionDenied
    } else {
        CaptureError::DeviceNotAvailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_permission_messages() {
        assert_eq!(classify_open_error("Permission denied (os error 13)"), CaptureError::PermissionDenied);
        assert_eq!(classify_open_error("User has not authorized camera"), CaptureError::PermissionDenied);
        assert_eq!(classify_open_error("No such device"), CaptureError::DeviceNotAvailable);
    }
}
