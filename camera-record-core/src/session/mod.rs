pub mod controller;
pub mod event_log;
pub mod headless_surface;
pub mod recording;
