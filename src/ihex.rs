// SPDX-License-Identifier: MIT

//! Intel HEX record codec.
//!
//! A record line is `:BBAAAATTDD…DDCC`: start code, byte count, 16-bit
//! address, record type, data, and a two's-complement checksum over every
//! preceding byte. The extended/start address types (2 through 5) only tag
//! how a consumer should interpret the record; no base address is tracked or
//! merged here.

use serde::{Deserialize, Serialize};

use crate::checksum::intel_checksum;
use crate::field;
use crate::Error;

/// Record type tags defined by the format.
pub mod types {
    pub const DATA: u8 = 0;
    pub const END_OF_FILE: u8 = 1;
    pub const EXTENDED_SEGMENT_ADDRESS: u8 = 2;
    pub const START_SEGMENT_ADDRESS: u8 = 3;
    pub const EXTENDED_LINEAR_ADDRESS: u8 = 4;
    pub const START_LINEAR_ADDRESS: u8 = 5;
}

/// Start code, byte count, address, type, and checksum: the shortest
/// well-formed line carries no data at all.
const MIN_RECORD_LEN: usize = 11;
/// The byte count field is a single byte.
const MAX_DATA_LEN: usize = 0xFF;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IhexRecord {
    /// One of the tags in [`types`].
    pub r#type: u8,
    /// 16-bit load offset. Types 2 and 4 reinterpret it downstream.
    pub address: u16,
    pub data: Vec<u8>,
    /// Two's complement of the byte sum of the other fields.
    pub checksum: u8,
}

impl IhexRecord {
    /// Builds a record, computing its checksum. Rejects unknown record
    /// types and data longer than the byte count field can describe. The
    /// zero-data convention for end-of-file and start-address records is
    /// the caller's responsibility.
    pub fn new(r#type: u8, address: u16, data: Vec<u8>) -> Result<IhexRecord, Error> {
        if r#type > types::START_LINEAR_ADDRESS || data.len() > MAX_DATA_LEN {
            return Err(Error::InvalidArguments);
        }
        let checksum = record_checksum(data.len() as u8, address, r#type, &data);
        Ok(IhexRecord {
            r#type,
            address,
            data,
            checksum,
        })
    }

    pub fn decode(line: &str) -> Result<IhexRecord, Error> {
        if line.is_empty() {
            return Err(Error::EmptyLine);
        }
        if !line.is_ascii() || !line.starts_with(':') || line.len() < MIN_RECORD_LEN {
            return Err(Error::InvalidRecord);
        }

        let (rest, length) = field::parse_u8(&line[1..])?;
        let (rest, address) = field::parse_u16(rest)?;
        let (rest, r#type) = field::parse_u8(rest)?;
        if r#type > types::START_LINEAR_ADDRESS {
            return Err(Error::InvalidRecord);
        }

        // The declared byte count must account for the rest of the line
        // exactly, leaving two digits of checksum.
        let data_digits = usize::from(length) * 2;
        if rest.len() != data_digits + 2 {
            return Err(Error::InvalidRecord);
        }
        let data = field::decode_bytes(&rest[..data_digits])?;
        let (_, checksum) = field::parse_u8(&rest[data_digits..])?;

        let computed = record_checksum(length, address, r#type, &data);
        if computed != checksum {
            return Err(Error::ChecksumMismatch(computed, checksum));
        }

        Ok(IhexRecord {
            r#type,
            address,
            data,
            checksum,
        })
    }

    pub fn encode(&self) -> Result<String, Error> {
        let length = field::encode_hex(self.data.len() as u32, 2)?;
        let checksum = record_checksum(self.data.len() as u8, self.address, self.r#type, &self.data);
        Ok(format!(
            ":{}{}{}{}{:02X}",
            length,
            field::encode_hex(u32::from(self.address), 4)?,
            field::encode_hex(u32::from(self.r#type), 2)?,
            field::encode_bytes(&self.data),
            checksum
        ))
    }

    pub fn print(&self, verbose: bool) -> String {
        if verbose {
            let data = self
                .data
                .iter()
                .map(|byte| format!("{:02X}", byte))
                .collect::<Vec<_>>()
                .join(" ");
            format!(
                "Intel HEX Record Type: \t0x{:02X}\n\
                 Intel HEX Record Address: \t0x{:04X}\n\
                 Intel HEX Record Data: \t{}\n\
                 Intel HEX Record Checksum: \t0x{:02X}",
                self.r#type, self.address, data, self.checksum
            )
        } else {
            format!(
                ":{:02X}{:04X}{:02X}{}{:02X}",
                self.data.len(),
                self.address,
                self.r#type,
                field::encode_bytes(&self.data),
                self.checksum
            )
        }
    }
}

fn record_checksum(length: u8, address: u16, r#type: u8, data: &[u8]) -> u8 {
    let address = address.to_be_bytes();
    intel_checksum(
        [length, address[0], address[1], r#type]
            .iter()
            .copied()
            .chain(data.iter().copied()),
    )
}
