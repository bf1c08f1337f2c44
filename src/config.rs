//! Application-level configuration constants.

use log::Level;

// Logging
pub const LOG_LEVEL: Level = Level::Info;

// Reveal-on-scroll observer
pub const REVEAL_THRESHOLD: f64 = 0.1;
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -50px 0px";
pub const REVEAL_CLASS: &str = "animate-in";

// Page loader
pub const LOADER_HOLD_MS: u32 = 1_000;
pub const LOADER_FADE_MS: u32 = 500;

// Performance monitoring
pub const SLOW_LOAD_MS: f64 = 3_000.0;
/// Roughly one frame at 60fps.
pub const SCROLL_SAMPLE_MS: f64 = 16.0;

// Product card hover
pub const CARD_HOVER_TRANSFORM: &str = "translateY(-10px) scale(1.02)";
pub const CARD_REST_TRANSFORM: &str = "translateY(0) scale(1)";
