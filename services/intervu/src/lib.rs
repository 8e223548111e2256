pub mod assistant_loader;
pub mod config;
pub mod shell;
pub mod vapi_adapter;

pub use voice_realtime::types as voice_types;
