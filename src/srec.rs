// SPDX-License-Identifier: MIT

//! Motorola S-Record codec.
//!
//! A record line is `Stbbaa…aadd…ddcc`: an `S`, a decimal type digit, a byte
//! count, an address whose width depends on the type, data, and a
//! one's-complement checksum. The byte count covers the address, data, and
//! checksum bytes. Type semantics (S0 header, S1/S2/S3 data, S5/S6 counts,
//! S7/S8/S9 start addresses) determine the address width only; records are
//! never aggregated here.

use serde::{Deserialize, Serialize};

use crate::checksum::srec_checksum;
use crate::field;
use crate::Error;

/// Highest type digit the format defines.
const MAX_TYPE: u8 = 9;
/// The byte count field is a single byte and includes the checksum.
const MAX_COUNT: usize = 0xFF;

/// Number of address bytes used by each record type.
pub fn address_width(r#type: u8) -> Result<usize, Error> {
    match r#type {
        0 | 1 | 5 | 9 => Ok(2),
        2 | 6 | 8 => Ok(3),
        3 | 4 | 7 => Ok(4),
        _ => Err(Error::InvalidArguments),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SRecord {
    /// Type digit, 0 through 9.
    pub r#type: u8,
    /// Address field; 16, 24, or 32 bits wide depending on the type. Count
    /// records (S5/S6) carry the record count here.
    pub address: u32,
    pub data: Vec<u8>,
    /// One's complement of the byte sum of the count, address, and data.
    pub checksum: u8,
}

impl SRecord {
    /// Builds a record, computing its byte count and checksum. Rejects type
    /// digits above 9 and data that would push the byte count past 255.
    pub fn new(r#type: u8, address: u32, data: Vec<u8>) -> Result<SRecord, Error> {
        if r#type > MAX_TYPE {
            return Err(Error::InvalidArguments);
        }
        let width = address_width(r#type)?;
        if width + data.len() + 1 > MAX_COUNT {
            return Err(Error::InvalidArguments);
        }
        let count = (width + data.len() + 1) as u8;
        let checksum = record_checksum(count, address, width, &data);
        Ok(SRecord {
            r#type,
            address,
            data,
            checksum,
        })
    }

    pub fn decode(line: &str) -> Result<SRecord, Error> {
        if line.is_empty() {
            return Err(Error::EmptyLine);
        }
        let bytes = line.as_bytes();
        if !line.is_ascii() || bytes[0] != b'S' {
            return Err(Error::InvalidRecord);
        }
        if bytes.len() < 2 || !bytes[1].is_ascii_digit() {
            return Err(Error::InvalidRecord);
        }
        let r#type = bytes[1] - b'0';
        let width = address_width(r#type)?;

        let (rest, count) = field::parse_u8(&line[2..])?;
        let (rest, address) = field::parse_field(rest, width * 2)?;

        // The count covers the address, data, and checksum bytes; whatever
        // it leaves for data must match the rest of the line exactly.
        let data_len = usize::from(count)
            .checked_sub(width + 1)
            .ok_or(Error::InvalidRecord)?;
        if rest.len() != data_len * 2 + 2 {
            return Err(Error::InvalidRecord);
        }
        let data = field::decode_bytes(&rest[..data_len * 2])?;
        let (_, checksum) = field::parse_u8(&rest[data_len * 2..])?;

        let computed = record_checksum(count, address, width, &data);
        if computed != checksum {
            return Err(Error::ChecksumMismatch(computed, checksum));
        }

        Ok(SRecord {
            r#type,
            address,
            data,
            checksum,
        })
    }

    pub fn encode(&self) -> Result<String, Error> {
        let width = address_width(self.r#type)?;
        let count = field::encode_hex((width + self.data.len() + 1) as u32, 2)?;
        let address = field::encode_hex(self.address, width * 2)?;
        let checksum = record_checksum(
            (width + self.data.len() + 1) as u8,
            self.address,
            width,
            &self.data,
        );
        Ok(format!(
            "S{}{}{}{}{:02X}",
            self.r#type,
            count,
            address,
            field::encode_bytes(&self.data),
            checksum
        ))
    }

    pub fn print(&self, verbose: bool) -> String {
        let width = address_width(self.r#type).unwrap_or(2);
        if verbose {
            let data = self
                .data
                .iter()
                .map(|byte| format!("{:02X}", byte))
                .collect::<Vec<_>>()
                .join(" ");
            format!(
                "S-Record Type: \tS{}\n\
                 S-Record Address: \t0x{:0w$X}\n\
                 S-Record Data: \t{}\n\
                 S-Record Checksum: \t0x{:02X}",
                self.r#type,
                self.address,
                data,
                self.checksum,
                w = width * 2
            )
        } else {
            format!(
                "S{}{:02X}{:0w$X}{}{:02X}",
                self.r#type,
                width + self.data.len() + 1,
                self.address,
                field::encode_bytes(&self.data),
                self.checksum,
                w = width * 2
            )
        }
    }
}

fn record_checksum(count: u8, address: u32, width: usize, data: &[u8]) -> u8 {
    let address = address.to_be_bytes();
    srec_checksum(
        std::iter::once(count)
            .chain(address[4 - width..].iter().copied())
            .chain(data.iter().copied()),
    )
}
