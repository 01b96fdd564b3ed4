//! Board-agnostic link logic for the Tessera desk units
//!
//! This crate contains the pieces around the wire protocol that do not
//! depend on specific hardware:
//!
//! - Receive pump and frame dispatch seam
//! - Software timer pool for ack/retry deadlines
//!
//! The serial driver itself and the application command handlers live with
//! the firmware; this crate only defines the seams they plug into.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod link;
pub mod timer;

pub use link::{FrameSink, LinkReceiver};
pub use timer::{TimerError, TimerHandle, TimerPool, TimerStatus};
