pub mod artifact;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod state;
pub mod stream;
