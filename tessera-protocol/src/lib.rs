//! Desk-Link Command Protocol
//!
//! This crate defines the point-to-point binary command protocol spoken
//! between the desk peers - the remote display unit, the RF bridge and the
//! card reader - over a byte-oriented serial link. The protocol is designed
//! for simplicity, low latency, and robustness against line noise.
//!
//! # Protocol Overview
//!
//! Every command travels in a fixed-size 12-byte frame:
//! ```text
//! ┌──────────────┬──────┬─────┬─────┬──────┬──────┬──────────┬──────────┐
//! │ SYNC         │ ADDR │ SEQ │ CMD │ DESK │ CARD │ RESERVED │ CHECKSUM │
//! │ 3B (0xA6 ×3) │ 1B   │ 1B  │ 1B  │ 1B   │ 1B   │ 3B       │ 1B       │
//! └──────────────┴──────┴─────┴─────┴──────┴──────┴──────────┴──────────┘
//! ```
//!
//! There is no length field and no escaping; frame boundaries are recovered
//! from the sync pattern alone, confirmed by the XOR checksum. A receiver
//! that loses alignment discards its progress and hunts for the next sync
//! run, so a single corrupted byte costs at most one frame.

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![deny(unsafe_code)]

pub mod commands;
pub mod device;
pub mod frame;

pub use commands::Command;
pub use device::{DeviceAddress, DeviceKind};
pub use frame::{
    DecodeState, DecoderStats, Frame, FrameDecoder, FrameError, FRAME_SIZE, SYNC_BYTE, SYNC_LEN,
};
