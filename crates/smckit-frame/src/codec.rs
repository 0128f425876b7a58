//! Encode/decode for the controller's 80-byte transaction record.
//!
//! The kernel driver reads this record as an in-memory C struct, so the
//! layout below is a contract, not an implementation detail. Offsets were
//! verified against the driver:
//!
//! ```text
//! ┌────────────────────────┬────────┬──────┐
//! │ field                  │ offset │ size │
//! ├────────────────────────┼────────┼──────┤
//! │ key (big-endian code)  │ 0      │ 4    │
//! │ vers (reserved)        │ 4      │ 4    │
//! │ pLimitData (reserved)  │ 8      │ 16   │
//! │ padding                │ 24     │ 4    │
//! │ keyInfo.dataSize       │ 28     │ 4    │
//! │ keyInfo.dataType       │ 32     │ 4    │
//! │ keyInfo.dataAttributes │ 36     │ 1    │
//! │ (implicit padding)     │ 37     │ 3    │
//! │ result                 │ 40     │ 1    │
//! │ status                 │ 41     │ 1    │
//! │ command                │ 42     │ 1    │
//! │ padding                │ 43     │ 1    │
//! │ data32                 │ 44     │ 4    │
//! │ payload                │ 48     │ 32   │
//! └────────────────────────┴────────┴──────┘
//! ```
//!
//! Multi-byte integer fields are stored in native byte order — host and
//! controller share byte order, exactly as when the record is a C struct
//! in memory. The key field's *value* is the big-endian packing of its
//! four characters (see [`KeyName`]).

use smckit_transport::{RawKeyData, KEY_DATA_LEN};

use crate::key::KeyName;

/// Total record size in bytes. Must match the transport's raw record.
pub const FRAME_SIZE: usize = KEY_DATA_LEN;

/// Size of the value payload area at the end of the record.
pub const PAYLOAD_LEN: usize = 32;

/// Byte offset of each field within the record.
pub mod offsets {
    /// Packed key name code.
    pub const KEY: usize = 0;
    /// Reserved version bytes.
    pub const VERS: usize = 4;
    /// Reserved power-limit payload.
    pub const P_LIMIT: usize = 8;
    /// Size in bytes of the key's value.
    pub const KEY_INFO_DATA_SIZE: usize = 28;
    /// Controller-defined type tag (a four-character code).
    pub const KEY_INFO_DATA_TYPE: usize = 32;
    /// Attribute flags.
    pub const KEY_INFO_ATTRIBUTES: usize = 36;
    /// Controller result code; 0 is success.
    pub const RESULT: usize = 40;
    /// Controller status byte.
    pub const STATUS: usize = 41;
    /// Operation selector byte.
    pub const COMMAND: usize = 42;
    /// Unused 32-bit scratch field.
    pub const DATA32: usize = 44;
    /// Up to 32 bytes of key value.
    pub const PAYLOAD: usize = 48;
}

/// Operation selector written into the record's command byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    /// Transfer the key's value bytes from the controller.
    ReadBytes = 5,
    /// Transfer value bytes to the controller.
    WriteBytes = 6,
    /// Query the key's size, type and attributes.
    ReadKeyInfo = 9,
}

impl Command {
    /// The raw command byte.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Metadata the controller reports for a key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyInfo {
    /// Size in bytes of the key's value. Authoritative: byte-transfer
    /// requests must carry this exact size or the controller rejects them.
    pub data_size: u32,
    /// Controller-defined type tag, a packed four-character code
    /// (e.g. `flt ` or `fpe2`).
    pub data_type: u32,
    /// Attribute flags.
    pub data_attributes: u8,
}

impl KeyInfo {
    /// The type tag as a key-name-style four-character code.
    pub fn type_name(&self) -> KeyName {
        KeyName::from_code(self.data_type)
    }
}

/// The mutable fields of one transaction record.
///
/// Reserved regions (vers, pLimitData, padding) always encode as zero.
/// Records are built fresh and zeroed for every call — stale `command` or
/// `result` bytes from a previous exchange would corrupt the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionFrame {
    /// Packed key name code.
    pub key: u32,
    /// Key metadata block.
    pub key_info: KeyInfo,
    /// Controller result code; 0 is success.
    pub result: u8,
    /// Controller status byte.
    pub status: u8,
    /// Raw command byte. Requests set it from [`Command`]; responses echo
    /// whatever the controller put there.
    pub command: u8,
    /// Unused scratch field.
    pub data32: u32,
    /// Value payload area.
    pub payload: [u8; PAYLOAD_LEN],
}

impl Default for TransactionFrame {
    fn default() -> Self {
        Self {
            key: 0,
            key_info: KeyInfo::default(),
            result: 0,
            status: 0,
            command: 0,
            data32: 0,
            payload: [0; PAYLOAD_LEN],
        }
    }
}

impl TransactionFrame {
    /// A fresh zeroed request record for `key` with the given command.
    pub fn request(key: KeyName, command: Command) -> Self {
        Self {
            key: key.code(),
            command: command.code(),
            ..Self::default()
        }
    }

    /// The record's key as a name.
    pub fn key_name(&self) -> KeyName {
        KeyName::from_code(self.key)
    }

    /// Encode the record into its raw 80-byte form.
    pub fn encode(&self) -> RawKeyData {
        let mut raw: RawKeyData = [0; FRAME_SIZE];
        raw[offsets::KEY..offsets::KEY + 4].copy_from_slice(&self.key.to_ne_bytes());
        raw[offsets::KEY_INFO_DATA_SIZE..offsets::KEY_INFO_DATA_SIZE + 4]
            .copy_from_slice(&self.key_info.data_size.to_ne_bytes());
        raw[offsets::KEY_INFO_DATA_TYPE..offsets::KEY_INFO_DATA_TYPE + 4]
            .copy_from_slice(&self.key_info.data_type.to_ne_bytes());
        raw[offsets::KEY_INFO_ATTRIBUTES] = self.key_info.data_attributes;
        raw[offsets::RESULT] = self.result;
        raw[offsets::STATUS] = self.status;
        raw[offsets::COMMAND] = self.command;
        raw[offsets::DATA32..offsets::DATA32 + 4].copy_from_slice(&self.data32.to_ne_bytes());
        raw[offsets::PAYLOAD..offsets::PAYLOAD + PAYLOAD_LEN].copy_from_slice(&self.payload);
        raw
    }

    /// Decode a raw 80-byte record. Reserved regions are ignored.
    pub fn decode(raw: &RawKeyData) -> Self {
        let mut payload = [0u8; PAYLOAD_LEN];
        payload.copy_from_slice(&raw[offsets::PAYLOAD..offsets::PAYLOAD + PAYLOAD_LEN]);
        Self {
            key: u32::from_ne_bytes(field4(raw, offsets::KEY)),
            key_info: KeyInfo {
                data_size: u32::from_ne_bytes(field4(raw, offsets::KEY_INFO_DATA_SIZE)),
                data_type: u32::from_ne_bytes(field4(raw, offsets::KEY_INFO_DATA_TYPE)),
                data_attributes: raw[offsets::KEY_INFO_ATTRIBUTES],
            },
            result: raw[offsets::RESULT],
            status: raw[offsets::STATUS],
            command: raw[offsets::COMMAND],
            data32: u32::from_ne_bytes(field4(raw, offsets::DATA32)),
            payload,
        }
    }
}

fn field4(raw: &RawKeyData, offset: usize) -> [u8; 4] {
    let mut out = [0u8; 4];
    out.copy_from_slice(&raw[offset..offset + 4]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_is_exactly_80_bytes() {
        assert_eq!(FRAME_SIZE, 80);
        assert_eq!(offsets::PAYLOAD + PAYLOAD_LEN, FRAME_SIZE);
    }

    #[test]
    fn layout_conformance() {
        // Every offset below is load-bearing: the kernel driver reads the
        // record at exactly these positions.
        assert_eq!(offsets::KEY, 0);
        assert_eq!(offsets::VERS, 4);
        assert_eq!(offsets::P_LIMIT, 8);
        assert_eq!(offsets::KEY_INFO_DATA_SIZE, 28);
        assert_eq!(offsets::KEY_INFO_DATA_TYPE, 32);
        assert_eq!(offsets::KEY_INFO_ATTRIBUTES, 36);
        assert_eq!(offsets::RESULT, 40);
        assert_eq!(offsets::STATUS, 41);
        assert_eq!(offsets::COMMAND, 42);
        assert_eq!(offsets::DATA32, 44);
        assert_eq!(offsets::PAYLOAD, 48);

        let mut frame = TransactionFrame::default();
        frame.key = 0x464e756d; // "FNum"
        frame.key_info.data_size = 0x11223344;
        frame.key_info.data_type = 0x55667788;
        frame.key_info.data_attributes = 0xaa;
        frame.result = 0xbb;
        frame.status = 0xcc;
        frame.command = Command::ReadKeyInfo.code();
        frame.data32 = 0x99887766;
        frame.payload = [0xee; PAYLOAD_LEN];

        let raw = frame.encode();
        assert_eq!(raw[0..4], 0x464e756du32.to_ne_bytes());
        assert_eq!(raw[28..32], 0x11223344u32.to_ne_bytes());
        assert_eq!(raw[32..36], 0x55667788u32.to_ne_bytes());
        assert_eq!(raw[36], 0xaa);
        assert_eq!(raw[40], 0xbb);
        assert_eq!(raw[41], 0xcc);
        assert_eq!(raw[42], 9);
        assert_eq!(raw[44..48], 0x99887766u32.to_ne_bytes());
        assert_eq!(raw[48..80], [0xee; 32]);
    }

    #[test]
    fn reserved_regions_and_padding_encode_as_zero() {
        let mut frame = TransactionFrame::default();
        frame.key = u32::MAX;
        frame.key_info.data_attributes = 0xff;
        frame.command = 0xff;
        frame.payload = [0xff; PAYLOAD_LEN];

        let raw = frame.encode();
        assert_eq!(raw[4..28], [0u8; 24], "vers + pLimitData + padding");
        assert_eq!(raw[37..40], [0u8; 3], "implicit key-info padding");
        assert_eq!(raw[43], 0, "padding after command byte");
    }

    #[test]
    fn encode_decode_roundtrip() {
        let mut frame = TransactionFrame::request(
            KeyName::new("F0Md").unwrap(),
            Command::WriteBytes,
        );
        frame.key_info.data_size = 1;
        frame.payload[0] = 1;

        let decoded = TransactionFrame::decode(&frame.encode());
        assert_eq!(decoded, frame);
        assert_eq!(decoded.key_name().to_string(), "F0Md");
    }

    #[test]
    fn request_record_starts_zeroed() {
        let frame = TransactionFrame::request(KeyName::new("Ftst").unwrap(), Command::ReadKeyInfo);
        assert_eq!(frame.key_info, KeyInfo::default());
        assert_eq!(frame.result, 0);
        assert_eq!(frame.status, 0);
        assert_eq!(frame.data32, 0);
        assert_eq!(frame.payload, [0; PAYLOAD_LEN]);
        assert_eq!(frame.command, 9);
    }

    #[test]
    fn key_info_type_name() {
        let info = KeyInfo {
            data_size: 2,
            data_type: KeyName::new("fpe2").unwrap().code(),
            data_attributes: 0,
        };
        assert_eq!(info.type_name().to_string(), "fpe2");
    }
}
