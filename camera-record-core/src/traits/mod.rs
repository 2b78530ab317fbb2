pub mod encryptor;
pub mod media_host;
pub mod media_recorder;
pub mod media_track;
pub mod preview_surface;
pub mod recorder_delegate;
