// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Wire format of the slave → master link.
//!
//! ```text
//! byte 0      0xAA            header 1
//! byte 1      0x55            header 2
//! byte 2      arcade_mask     bit i = arcade button i pressed
//! byte 3      normal_mask     bit i = normal button i pressed
//! bytes 4-11  pot[0..4]       12-bit values, u16 big-endian
//! byte 12     checksum        sum(bytes 2..=11) mod 256
//! ```
//!
//! The checksum is a plain 8-bit sum. It catches any single corrupted byte but not compensating
//! errors (e.g. two bytes swapped), which is acceptable for a short point-to-point cable.

use crate::config::NUM_POTS;

/// Sync bytes for the protocol.
pub const HEADER_1: u8 = 0xAA;
pub const HEADER_2: u8 = 0x55;

pub const HEADER_LEN: usize = 2;
pub const PAYLOAD_LEN: usize = 2 + NUM_POTS * 2;
pub const FRAME_LEN: usize = HEADER_LEN + PAYLOAD_LEN + 1;

// Payload field offsets
pub mod field {
    pub const ARCADE_MASK: usize = 0;
    pub const NORMAL_MASK: usize = 1;
    /// First pot MSB; each pot takes two bytes.
    pub const POTS: usize = 2;
}

/// Decoded slave inputs carried by one frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Payload {
    pub arcade_mask: u8,
    pub normal_mask: u8,
    pub pots: [u16; NUM_POTS],
}

impl Payload {
    /// Serialize the payload fields (no header, no checksum).
    pub fn encode(&self) -> [u8; PAYLOAD_LEN] {
        let mut buf = [0u8; PAYLOAD_LEN];
        buf[field::ARCADE_MASK] = self.arcade_mask;
        buf[field::NORMAL_MASK] = self.normal_mask;
        for (i, pot) in self.pots.iter().enumerate() {
            let at = field::POTS + 2 * i;
            buf[at..at + 2].copy_from_slice(&pot.to_be_bytes());
        }
        buf
    }

    /// Inverse of [`Payload::encode`].
    pub fn decode(buf: &[u8; PAYLOAD_LEN]) -> Self {
        let pots = core::array::from_fn(|i| {
            let at = field::POTS + 2 * i;
            u16::from_be_bytes([buf[at], buf[at + 1]])
        });
        Self {
            arcade_mask: buf[field::ARCADE_MASK],
            normal_mask: buf[field::NORMAL_MASK],
            pots,
        }
    }
}

/// Error type for whole-frame decoding.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameError {
    /// Input is not exactly [`FRAME_LEN`] bytes.
    Length(usize),
    /// Header bytes do not match.
    Header,
    /// Payload sum does not match the trailing byte.
    Checksum { expected: u8, received: u8 },
}

/// 8-bit additive checksum over the payload bytes.
pub fn checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}

/// Build a complete frame: header, payload, checksum.
pub fn encode_frame(payload: &Payload) -> [u8; FRAME_LEN] {
    let body = payload.encode();
    let mut frame = [0u8; FRAME_LEN];
    frame[0] = HEADER_1;
    frame[1] = HEADER_2;
    frame[HEADER_LEN..HEADER_LEN + PAYLOAD_LEN].copy_from_slice(&body);
    frame[FRAME_LEN - 1] = checksum(&body);
    frame
}

/// Validate and decode one complete frame.
pub fn decode_frame(frame: &[u8]) -> Result<Payload, FrameError> {
    if frame.len() != FRAME_LEN {
        return Err(FrameError::Length(frame.len()));
    }
    if frame[0] != HEADER_1 || frame[1] != HEADER_2 {
        return Err(FrameError::Header);
    }

    let mut body = [0u8; PAYLOAD_LEN];
    body.copy_from_slice(&frame[HEADER_LEN..HEADER_LEN + PAYLOAD_LEN]);

    let expected = checksum(&body);
    let received = frame[FRAME_LEN - 1];
    if expected != received {
        return Err(FrameError::Checksum { expected, received });
    }

    Ok(Payload::decode(&body))
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: Payload = Payload {
        arcade_mask: 0x01,
        normal_mask: 0x00,
        pots: [100, 200, 300, 400],
    };

    const REFERENCE_BYTES: [u8; FRAME_LEN] = [
        0xAA, 0x55, 0x01, 0x00, 0x00, 0x64, 0x00, 0xC8, 0x01, 0x2C, 0x01, 0x90, 0xEB,
    ];

    #[test]
    fn sizes() {
        assert_eq!(PAYLOAD_LEN, 10);
        assert_eq!(FRAME_LEN, 13);
    }

    #[test]
    fn encodes_reference_frame() {
        assert_eq!(encode_frame(&REFERENCE), REFERENCE_BYTES);
    }

    #[test]
    fn decodes_reference_frame() {
        assert_eq!(decode_frame(&REFERENCE_BYTES), Ok(REFERENCE));
    }

    #[test]
    fn round_trip_extremes() {
        for p in [
            Payload::default(),
            Payload {
                arcade_mask: 0x0F,
                normal_mask: 0x0F,
                pots: [4095; NUM_POTS],
            },
            Payload {
                arcade_mask: 0x0A,
                normal_mask: 0x05,
                pots: [0, 4095, 0x0100, 0x00FF],
            },
        ] {
            assert_eq!(Payload::decode(&p.encode()), p);
            assert_eq!(decode_frame(&encode_frame(&p)), Ok(p));
        }
    }

    #[test]
    fn checksum_wraps() {
        assert_eq!(checksum(&[0xFF, 0x02]), 0x01);
        assert_eq!(checksum(&[]), 0);
    }

    #[test]
    fn any_single_payload_byte_corruption_is_detected() {
        for idx in HEADER_LEN..FRAME_LEN - 1 {
            for delta in 1..=255u8 {
                let mut bytes = REFERENCE_BYTES;
                bytes[idx] = bytes[idx].wrapping_add(delta);
                assert!(matches!(
                    decode_frame(&bytes),
                    Err(FrameError::Checksum { .. })
                ));
            }
        }
    }

    #[test]
    fn compensating_corruption_slips_through() {
        // Known weakness of an additive checksum
        let mut bytes = REFERENCE_BYTES;
        bytes[5] = bytes[5].wrapping_add(1);
        bytes[7] = bytes[7].wrapping_sub(1);
        let decoded = decode_frame(&bytes).unwrap();
        assert_ne!(decoded, REFERENCE);
    }

    #[test]
    fn rejects_bad_shape() {
        assert_eq!(decode_frame(&REFERENCE_BYTES[..12]), Err(FrameError::Length(12)));
        let mut bytes = REFERENCE_BYTES;
        bytes[1] = 0x54;
        assert_eq!(decode_frame(&bytes), Err(FrameError::Header));
        bytes = REFERENCE_BYTES;
        bytes[12] = 0x00;
        assert_eq!(
            decode_frame(&bytes),
            Err(FrameError::Checksum {
                expected: 0xEB,
                received: 0x00
            })
        );
    }
}
