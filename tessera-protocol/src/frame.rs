//! Frame encoding and decoding for the desk-link protocol.
//!
//! Frame format (12 bytes, fixed):
//! - SYNC (3 bytes): 0xA6 repeated three times, marks frame start
//! - ADDRESS (1 byte): destination id in the low nibble, source id in the high
//! - SEQ (1 byte): sender-assigned sequence number, opaque to the codec
//! - CMD (1 byte): command code, opaque to the codec
//! - DESK (1 byte): desk identifier
//! - CARD (1 byte): card/menu identifier
//! - RESERVED (3 bytes): not interpreted, round-trips unchanged
//! - CHECKSUM (1 byte): XOR of the preceding 11 bytes

use heapless::Vec;

use crate::device::DeviceAddress;

/// Frame synchronization byte
pub const SYNC_BYTE: u8 = 0xA6;

/// Number of sync bytes at the start of every frame
pub const SYNC_LEN: usize = 3;

/// Complete frame size in bytes (sync + payload + checksum)
pub const FRAME_SIZE: usize = 12;

/// Errors that can occur during frame encoding or whole-buffer parsing
///
/// The byte-stream decoder never returns these: on the wire, corruption is
/// expected and handled by silent resynchronization instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Output buffer too small for a complete frame
    BufferTooSmall,
    /// Input buffer shorter than a complete frame
    Truncated,
    /// Buffer does not start with the sync pattern
    InvalidSync,
    /// Checksum mismatch
    InvalidChecksum,
}

/// XOR checksum over a byte sequence
///
/// Both encoder and decoder compute this over all frame bytes except the
/// checksum byte itself.
pub fn xor_checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, &byte| acc ^ byte)
}

/// A complete desk-link command frame
///
/// Field values are the in-memory view of the wire record; `reserved` is
/// carried verbatim for forward compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// Source/destination device ids
    pub address: DeviceAddress,
    /// Sequence number assigned by the sender
    pub seq: u8,
    /// Command code (see [`crate::commands`])
    pub command: u8,
    /// Desk identifier
    pub desk_id: u8,
    /// Card/menu identifier
    pub card_id: u8,
    /// Reserved bytes, not interpreted by the codec
    pub reserved: [u8; 3],
}

impl Frame {
    /// Create a frame with the given address and command, all other fields zero
    pub fn new(address: DeviceAddress, command: u8) -> Self {
        Self {
            address,
            seq: 0,
            command,
            desk_id: 0,
            card_id: 0,
            reserved: [0; 3],
        }
    }

    /// Serialize into the 12-byte wire format
    ///
    /// Writes each field in wire order and stamps the checksum, so the
    /// result is valid by construction.
    pub fn to_wire(&self) -> [u8; FRAME_SIZE] {
        let mut wire = [0u8; FRAME_SIZE];
        wire[..SYNC_LEN].fill(SYNC_BYTE);
        wire[3] = self.address.to_byte();
        wire[4] = self.seq;
        wire[5] = self.command;
        wire[6] = self.desk_id;
        wire[7] = self.card_id;
        wire[8..11].copy_from_slice(&self.reserved);
        wire[11] = xor_checksum(&wire[..FRAME_SIZE - 1]);
        wire
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written.
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        if buffer.len() < FRAME_SIZE {
            return Err(FrameError::BufferTooSmall);
        }

        buffer[..FRAME_SIZE].copy_from_slice(&self.to_wire());
        Ok(FRAME_SIZE)
    }

    /// Validate and decode a complete frame held in a buffer
    ///
    /// For callers that already have a full candidate frame in hand; the
    /// byte-stream path is [`FrameDecoder`].
    pub fn parse(buffer: &[u8]) -> Result<Self, FrameError> {
        if buffer.len() < FRAME_SIZE {
            return Err(FrameError::Truncated);
        }

        let wire = &buffer[..FRAME_SIZE];
        if wire[..SYNC_LEN] != [SYNC_BYTE; SYNC_LEN] {
            return Err(FrameError::InvalidSync);
        }
        if wire[FRAME_SIZE - 1] != xor_checksum(&wire[..FRAME_SIZE - 1]) {
            return Err(FrameError::InvalidChecksum);
        }

        Ok(Self::from_wire(wire))
    }

    /// Build a frame from validated wire bytes
    fn from_wire(wire: &[u8]) -> Self {
        Self {
            address: DeviceAddress::from_byte(wire[3]),
            seq: wire[4],
            command: wire[5],
            desk_id: wire[6],
            card_id: wire[7],
            reserved: [wire[8], wire[9], wire[10]],
        }
    }
}

/// Decoder phases
///
/// Public so transitions can be observed directly in tests and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeState {
    /// Hunting for the 3-byte sync run
    SeekingSync,
    /// Sync found, accumulating payload bytes
    AccumulatingPayload,
    /// Payload complete, next byte is the checksum
    AwaitingChecksum,
}

/// Running decoder diagnostics
///
/// Observability only; not part of the decoding contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecoderStats {
    /// Sessions discarded before completing a frame
    pub resyncs: u32,
    /// Subset of resyncs caused by a checksum mismatch
    pub checksum_failures: u32,
}

/// State machine for decoding frames from a byte stream
///
/// Feed bytes one at a time as they arrive off the transport; a completed,
/// checksum-valid frame is returned from the call that consumed its last
/// byte. Any unexpected byte or checksum mismatch silently discards the
/// session and resumes hunting for sync, so the decoder recovers alignment
/// from any position in a well-formed future frame.
///
/// One decoder instance serves exactly one byte stream.
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    state: DecodeState,
    buffer: Vec<u8, FRAME_SIZE>,
    checksum: u8,
    stats: DecoderStats,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    /// Create a new decoder, ready to hunt for sync
    pub fn new() -> Self {
        Self {
            state: DecodeState::SeekingSync,
            buffer: Vec::new(),
            checksum: 0,
            stats: DecoderStats::default(),
        }
    }

    /// Feed a single byte to the decoder
    ///
    /// Returns `Some(frame)` when this byte completed a checksum-valid
    /// frame, `None` when more bytes are needed. After a completed frame
    /// the decoder is re-armed, so the next byte begins a fresh sync hunt.
    pub fn feed(&mut self, byte: u8) -> Option<Frame> {
        match self.state {
            DecodeState::SeekingSync => {
                if byte == SYNC_BYTE {
                    self.accumulate(byte);
                    if self.buffer.len() == SYNC_LEN {
                        self.state = DecodeState::AccumulatingPayload;
                    }
                } else if !self.buffer.is_empty() {
                    // No partial-overlap recovery: a stray byte after one or
                    // two sync bytes throws the whole run away.
                    self.resync();
                }
                None
            }
            DecodeState::AccumulatingPayload => {
                self.accumulate(byte);
                if self.buffer.len() == FRAME_SIZE - 1 {
                    self.state = DecodeState::AwaitingChecksum;
                }
                None
            }
            DecodeState::AwaitingChecksum => {
                // The checksum byte is stored but not folded into the
                // accumulator.
                let _ = self.buffer.push(byte);
                if byte == self.checksum {
                    let frame = Frame::from_wire(&self.buffer);
                    self.restart();
                    Some(frame)
                } else {
                    self.stats.checksum_failures += 1;
                    self.resync();
                    None
                }
            }
        }
    }

    /// Feed a chunk of bytes, stopping at the first completed frame
    ///
    /// Bytes after a completed frame are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Option<Frame> {
        for &byte in bytes {
            if let Some(frame) = self.feed(byte) {
                return Some(frame);
            }
        }
        None
    }

    /// Discard any in-progress session and return to sync hunting
    ///
    /// Safe at any point; this is the only cancellation the decoder has.
    pub fn reset(&mut self) {
        self.restart();
    }

    /// Current decoder phase
    pub fn state(&self) -> DecodeState {
        self.state
    }

    /// Diagnostics counters for this stream
    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// Store a byte and fold it into the running checksum
    fn accumulate(&mut self, byte: u8) {
        // Cannot overflow: every state hands off before the buffer fills
        let _ = self.buffer.push(byte);
        self.checksum ^= byte;
    }

    /// Clear session state without touching the counters
    fn restart(&mut self) {
        self.state = DecodeState::SeekingSync;
        self.buffer.clear();
        self.checksum = 0;
    }

    /// Discard progress and count the lost session
    fn resync(&mut self) {
        self.stats.resyncs += 1;
        self.restart();
    }
}
