use crate::models::error::CaptureError;

/// Host recording session bound to one stream.
///
/// Data and the terminal stop notification arrive asynchronously on the
/// `RecorderEventSender` the recorder was created with.
pub trait MediaRecorder: Send {
    /// Begin emitting data.
    fn start(&mut self) -> Result<(), CaptureError>;

    /// Request the recorder to stop. Returns immediately; any remaining data
    /// and then `RecorderEvent::Stopped` follow on the event channel.
    fn stop(&mut self) -> Result<(), CaptureError>;

    /// MIME type of the data this recorder produces.
    fn mime_type(&self) -> &str;
}
