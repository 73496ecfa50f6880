//! Roland DT1 addressed SysEx messages for the Integra-7.
//!
//! Messages are stored in SMF form: the 0xF0 status byte is added by the
//! container writer, so the data here starts at the manufacturer id and ends
//! with the 0xF7 terminator.

use crate::dtype::SnError;

pub const MANUFACTURER_ID: u8 = 0x41; // Roland
pub const DEVICE_ID: u8 = 0x10; // Default device ID
pub const MODEL_ID: u8 = 0x6C; // Integra-7
pub const COMMAND_DT1: u8 = 0x12; // Data Set 1

// Studio set part parameter addresses
pub const STUDIO_SET_PART_BASE: u32 = 0x1800_0000;
pub const PART_OFFSET: u32 = 0x200;
pub const TONE_BANK_TYPE: u32 = 0x0007; // 0: PCM Synth, 1: SN-A, 2: SN-S, 3: SN-D

/// Address of the tone bank type parameter for a channel's part.
pub const fn part_bank_type_address(channel: u8) -> u32 {
    STUDIO_SET_PART_BASE + (channel as u32) * PART_OFFSET + TONE_BANK_TYPE
}

/// Tone bank type selected by a bank select MSB. Only the four bank MSBs the
/// mapping tables can produce are meaningful; anything else is rejected.
pub fn bank_type_for_msb(msb: u8) -> Result<u8, SnError> {
    match msb {
        121 => Ok(0), // GM2 / PCM Synth
        89 => Ok(1),  // SN-A
        95 => Ok(2),  // SN-S
        88 => Ok(3),  // SN-D
        other => Err(SnError::UnsupportedBankMsb(other)),
    }
}

/// Build a DT1 message writing `payload` at `address`.
///
/// The checksum covers the three address bytes and the payload:
/// `(128 - (sum % 128)) % 128`, so a receiver summing address, payload and
/// checksum gets a multiple of 128.
pub fn create_dt1(address: u32, payload: &[u8]) -> Vec<u8> {
    let addr_msb = ((address >> 16) & 0xFF) as u8;
    let addr_mid = ((address >> 8) & 0xFF) as u8;
    let addr_lsb = (address & 0xFF) as u8;

    let mut data = Vec::with_capacity(9 + payload.len());
    data.push(MANUFACTURER_ID);
    data.push(DEVICE_ID);
    data.push(MODEL_ID);
    data.push(COMMAND_DT1);
    data.push(addr_msb);
    data.push(addr_mid);
    data.push(addr_lsb);
    data.extend_from_slice(payload);

    let sum: u32 = data[4..].iter().map(|&b| b as u32).sum();
    let checksum = ((128 - (sum % 128)) % 128) as u8;
    data.push(checksum);
    data.push(0xF7);
    data
}

/// Pre-built bank type messages for every (channel, bank type) pair.
///
/// Rewritten tracks borrow their SysEx payloads from this arena, which keeps
/// the output events in the same borrowed representation midly uses for the
/// input.
pub struct SysexBank {
    // Indexed by channel, then bank type 0-3.
    bank_type_msgs: [[Vec<u8>; 4]; 16],
}

impl SysexBank {
    pub fn new() -> SysexBank {
        SysexBank {
            bank_type_msgs: std::array::from_fn(|channel| {
                std::array::from_fn(|bank_type| {
                    create_dt1(part_bank_type_address(channel as u8), &[bank_type as u8])
                })
            }),
        }
    }

    /// The bank type message for `channel` matching a bank select MSB.
    pub fn bank_type_message(&self, channel: u8, msb: u8) -> Result<&[u8], SnError> {
        let bank_type = bank_type_for_msb(msb)?;
        Ok(&self.bank_type_msgs[channel as usize][bank_type as usize])
    }
}

impl Default for SysexBank {
    fn default() -> Self {
        Self::new()
    }
}
