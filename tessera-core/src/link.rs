//! Receive pump and frame dispatch seam
//!
//! Bridges a serial byte stream to the application layer: the transport
//! task hands whatever chunk the driver returned to [`LinkReceiver::pump`],
//! which drives the per-stream decoder and forwards every completed frame
//! to a [`FrameSink`]. Routing the frame's command byte to a handler is the
//! sink's job; this module carries no command semantics.

use tessera_protocol::{DecoderStats, Frame, FrameDecoder};

/// Consumer of completed frames
///
/// Implementors route `frame.command` to the matching application handler
/// and arrange any ack/retry timers themselves.
pub trait FrameSink {
    /// Called once for every checksum-valid frame recovered from the stream
    fn on_frame(&mut self, frame: &Frame);
}

/// Receive pump owning the decoder for one transport stream
///
/// A transport with several independent byte streams needs one receiver
/// per stream.
#[derive(Debug, Clone, Default)]
pub struct LinkReceiver {
    decoder: FrameDecoder,
}

impl LinkReceiver {
    /// Create a receiver with a fresh decoder
    pub fn new() -> Self {
        Self {
            decoder: FrameDecoder::new(),
        }
    }

    /// Feed received bytes, dispatching every completed frame to the sink
    ///
    /// Returns the number of frames dispatched. Partial frames persist
    /// across calls, so chunk boundaries from the driver are invisible to
    /// the protocol.
    pub fn pump<S: FrameSink>(&mut self, bytes: &[u8], sink: &mut S) -> usize {
        let mut dispatched = 0;
        for &byte in bytes {
            if let Some(frame) = self.decoder.feed(byte) {
                sink.on_frame(&frame);
                dispatched += 1;
            }
        }
        dispatched
    }

    /// Drop any partially assembled frame
    pub fn reset(&mut self) {
        self.decoder.reset();
    }

    /// Decoder diagnostics for this stream
    pub fn stats(&self) -> DecoderStats {
        self.decoder.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;
    use tessera_protocol::commands::{CMD_CARD_CHECK_IN, CMD_HEART_BEAT};
    use tessera_protocol::DeviceAddress;

    #[derive(Default)]
    struct RecordingSink {
        frames: Vec<Frame, 8>,
    }

    impl FrameSink for RecordingSink {
        fn on_frame(&mut self, frame: &Frame) {
            self.frames.push(*frame).unwrap();
        }
    }

    #[test]
    fn test_pump_dispatches_back_to_back_frames() {
        let check_in = Frame::new(DeviceAddress::new(0, 2), CMD_CARD_CHECK_IN);
        let heartbeat = Frame::new(DeviceAddress::new(1, 0), CMD_HEART_BEAT);

        let mut stream = [0u8; 24];
        stream[..12].copy_from_slice(&check_in.to_wire());
        stream[12..].copy_from_slice(&heartbeat.to_wire());

        let mut receiver = LinkReceiver::new();
        let mut sink = RecordingSink::default();

        assert_eq!(receiver.pump(&stream, &mut sink), 2);
        assert_eq!(sink.frames[0], check_in);
        assert_eq!(sink.frames[1], heartbeat);
    }

    #[test]
    fn test_pump_across_chunk_boundaries() {
        let frame = Frame::new(DeviceAddress::new(2, 1), CMD_CARD_CHECK_IN);
        let wire = frame.to_wire();

        let mut receiver = LinkReceiver::new();
        let mut sink = RecordingSink::default();

        // Driver returns the frame split over three reads
        assert_eq!(receiver.pump(&wire[..5], &mut sink), 0);
        assert_eq!(receiver.pump(&wire[5..9], &mut sink), 0);
        assert_eq!(receiver.pump(&wire[9..], &mut sink), 1);
        assert_eq!(sink.frames[0], frame);
    }

    #[test]
    fn test_pump_tolerates_line_noise() {
        let frame = Frame::new(DeviceAddress::new(0, 1), CMD_HEART_BEAT);

        let mut receiver = LinkReceiver::new();
        let mut sink = RecordingSink::default();

        assert_eq!(receiver.pump(&[0x00, 0x5A, 0xA6, 0x17], &mut sink), 0);
        assert_eq!(receiver.pump(&frame.to_wire(), &mut sink), 1);
        assert_eq!(sink.frames[0], frame);
        assert_eq!(receiver.stats().resyncs, 1);
    }

    #[test]
    fn test_reset_discards_partial_frame() {
        let frame = Frame::new(DeviceAddress::new(0, 1), CMD_HEART_BEAT);
        let wire = frame.to_wire();

        let mut receiver = LinkReceiver::new();
        let mut sink = RecordingSink::default();

        receiver.pump(&wire[..8], &mut sink);
        receiver.reset();
        assert_eq!(receiver.pump(&wire[8..], &mut sink), 0);
        assert_eq!(receiver.pump(&wire, &mut sink), 1);
    }
}
