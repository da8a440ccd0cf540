//! Host-side primitives shared by every emulated smart device.
//!
//! Included in this crate:
//! - Millisecond timestamps and clock sources: [`time`]
//! - Emulator tuning constants: [`config`]
//! - The errno-style error side channel and SDK sentinel values: [`error`]

pub mod config;
pub mod error;
pub mod time;
