//! Process configuration
//!
//! Read once at startup, immutable afterwards. Stages never touch the
//! environment themselves; everything they need is injected from here.

pub mod loader;
pub mod settings;

pub use loader::ConfigLoader;
pub use settings::Settings;
