// src/models/mod.rs
pub mod notification;
pub mod payload;
pub mod presets;

pub use notification::*;
pub use payload::*;
