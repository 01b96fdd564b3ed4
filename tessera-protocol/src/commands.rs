//! Command codes for the desk-link protocol
//!
//! A flat 8-bit code space shared by all peers. The frame codec never
//! interprets these values; this module is the vocabulary the application
//! layer uses to route completed frames.

// Command codes: acknowledgements
pub const CMD_ACK_SUCCESS: u8 = 0x00;
pub const CMD_ACK_FAILURE: u8 = 0x01;
pub const CMD_ACK_RECEIVED: u8 = 0x02;

// Command codes: card operations
pub const CMD_CARD_CHECK_IN: u8 = 0x10;
pub const CMD_CARD_CHECK_OUT: u8 = 0x11;
pub const CMD_CARD_QUERY: u8 = 0x12;

// Command codes: diagnostics
pub const CMD_HEART_BEAT: u8 = 0x20;

/// Commands carried in the frame command byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Command received and executed successfully
    AckSuccess,
    /// Command received but execution failed
    AckFailure,
    /// Command received and passed validation
    AckReceived,
    /// Add one card record to the remote display database
    CardCheckIn,
    /// Remove one card record from the remote display database
    CardCheckOut,
    /// Query one card record from the remote display database
    CardQuery,
    /// Link liveness probe
    HeartBeat,
}

impl Command {
    /// Parse a command from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            CMD_ACK_SUCCESS => Some(Command::AckSuccess),
            CMD_ACK_FAILURE => Some(Command::AckFailure),
            CMD_ACK_RECEIVED => Some(Command::AckReceived),
            CMD_CARD_CHECK_IN => Some(Command::CardCheckIn),
            CMD_CARD_CHECK_OUT => Some(Command::CardCheckOut),
            CMD_CARD_QUERY => Some(Command::CardQuery),
            CMD_HEART_BEAT => Some(Command::HeartBeat),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            Command::AckSuccess => CMD_ACK_SUCCESS,
            Command::AckFailure => CMD_ACK_FAILURE,
            Command::AckReceived => CMD_ACK_RECEIVED,
            Command::CardCheckIn => CMD_CARD_CHECK_IN,
            Command::CardCheckOut => CMD_CARD_CHECK_OUT,
            Command::CardQuery => CMD_CARD_QUERY,
            Command::HeartBeat => CMD_HEART_BEAT,
        }
    }

    /// Returns true if this is an acknowledgement
    pub fn is_ack(&self) -> bool {
        matches!(
            self,
            Command::AckSuccess | Command::AckFailure | Command::AckReceived
        )
    }

    /// Returns true if this is a card database operation
    pub fn is_card_op(&self) -> bool {
        matches!(
            self,
            Command::CardCheckIn | Command::CardCheckOut | Command::CardQuery
        )
    }

    /// Returns true if this is a diagnostic command
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Command::HeartBeat)
    }
}

impl From<Command> for u8 {
    fn from(command: Command) -> u8 {
        command.to_byte()
    }
}
