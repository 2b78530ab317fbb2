use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::CaptureError;

/// Constraints passed to the host when requesting a camera stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConstraints {
    /// Request a video track (default: true).
    pub video: bool,

    /// Request an audio track (default: false).
    pub audio: bool,

    /// Specific camera device ID, or None for the host default.
    pub device_id: Option<String>,

    /// Preferred capture width in pixels.
    pub width: Option<u32>,

    /// Preferred capture height in pixels.
    pub height: Option<u32>,

    /// Preferred frame rate.
    pub frame_rate: Option<u32>,
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self {
            video: true,
            audio: false,
            device_id: None,
            width: None,
            height: None,
            frame_rate: None,
        }
    }
}

/// Fixed display size of the preview/playback surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceDimensions {
    pub width: u32,
    pub height: u32,
}

impl Default for SurfaceDimensions {
    fn default() -> Self {
        Self {
            width: 400,
            height: 300,
        }
    }
}

/// Configuration for a record controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfiguration {
    /// What to request from the host when acquiring the stream.
    pub constraints: StreamConstraints,

    /// MIME type requested from the recorder (default: `video/webm`). Hosts
    /// that only produce one format report their own instead.
    pub mime_type: String,

    /// Emit a fragment every `timeslice_ms` milliseconds. None means the
    /// recorder emits everything as a single fragment when it stops.
    pub timeslice_ms: Option<u64>,

    /// Preview surface size.
    pub surface: SurfaceDimensions,
}

impl RecorderConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if !self.constraints.video && !self.constraints.audio {
            return Err("at least one of video or audio must be requested".into());
        }
        if self.mime_type.trim().is_empty() {
            return Err("mime type must not be empty".into());
        }
        if self.timeslice_ms == Some(0) {
            return Err("timeslice must be positive".into());
        }
        if self.surface.width == 0 || self.surface.height == 0 {
            return Err(format!(
                "invalid surface dimensions: {}x{}",
                self.surface.width, self.surface.height
            ));
        }
        if self.constraints.frame_rate == Some(0) {
            return Err("frame rate must be positive".into());
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, CaptureError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CaptureError::ConfigurationFailed(format!("invalid configuration: {}", e)))?;
        config.validate().map_err(CaptureError::ConfigurationFailed)?;
        Ok(config)
    }

    pub fn timeslice(&self) -> Option<Duration> {
        self.timeslice_ms.map(Duration::from_millis)
    }
}

impl Default for RecorderConfiguration {
    fn default() -> Self {
        Self {
            constraints: StreamConstraints::default(),
            mime_type: "video/webm".into(),
            timeslice_ms: None,
            surface: SurfaceDimensions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_request_video_without_audio() {
        let config = RecorderConfiguration::default();
        assert!(config.constraints.video);
        assert!(!config.constraints.audio);
        assert_eq!(config.surface, SurfaceDimensions { width: 400, height: 300 });
        assert_eq!(config.mime_type, "video/webm");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_timeslice() {
        let config = RecorderConfiguration {
            timeslice_ms: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_no_tracks() {
        let mut config = RecorderConfiguration::default();
        config.constraints.video = false;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config =
            RecorderConfiguration::from_json_str(r#"{ "timeslice_ms": 250, "constraints": { "frame_rate": 15 } }"#)
                .unwrap();
        assert_eq!(config.timeslice(), Some(Duration::from_millis(250)));
        assert_eq!(config.constraints.frame_rate, Some(15));
        assert!(config.constraints.video);
        assert_eq!(config.mime_type, "video/webm");
    }

    #[test]
    fn invalid_json_is_configuration_error() {
        let err = RecorderConfiguration::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, CaptureError::ConfigurationFailed(_)));

        let err = RecorderConfiguration::from_json_str(r#"{ "mime_type": "" }"#).unwrap_err();
        assert!(matches!(err, CaptureError::ConfigurationFailed(_)));
    }
}
