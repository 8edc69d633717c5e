//! Core types for the DTMF player.
//!
//! - [`ToneKey`]: the 16 keypad symbols and their frequency pairs
//! - [`OutputDevice`]: a device reported by host enumeration

mod device;
mod tone;

// Re-export all types at the module level
pub use device::{select_output_device, DeviceKind, OutputDevice};
pub use tone::{InvalidToneKey, ToneKey, HIGH_GROUP_HZ, LOW_GROUP_HZ};
