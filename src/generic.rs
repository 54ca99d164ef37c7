// SPDX-License-Identifier: MIT

//! Atmel Generic record codec.
//!
//! The simplest of the three formats: a 24-bit address and a 16-bit data
//! word separated by a colon (`AAAAAA:DDDD`), with no checksum. Integrity
//! rests entirely on the separator position and the fixed field widths.

use serde::{Deserialize, Serialize};

use crate::field;
use crate::Error;

/// Hex digits in the address field, which is also the separator offset.
const ADDRESS_LEN: usize = 6;
/// Hex digits in the data field.
const DATA_LEN: usize = 4;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenericRecord {
    /// 24-bit address field.
    pub address: u32,
    /// 16-bit data word.
    pub data: u16,
}

impl GenericRecord {
    /// Builds a record from an address and a data word. Always succeeds;
    /// the address is checked against its 24-bit width when encoding.
    pub fn new(address: u32, data: u16) -> GenericRecord {
        GenericRecord { address, data }
    }

    pub fn decode(line: &str) -> Result<GenericRecord, Error> {
        if line.is_empty() {
            return Err(Error::EmptyLine);
        }
        if !line.is_ascii() || line.len() < ADDRESS_LEN + 1 + DATA_LEN {
            return Err(Error::InvalidRecord);
        }
        if line.as_bytes()[ADDRESS_LEN] != b':' {
            return Err(Error::InvalidRecord);
        }

        let address = field::decode_hex(&line[..ADDRESS_LEN])?;
        let data = field::decode_hex(&line[ADDRESS_LEN + 1..])?;
        if data > u32::from(u16::MAX) {
            return Err(Error::InvalidRecord);
        }

        Ok(GenericRecord {
            address,
            data: data as u16,
        })
    }

    pub fn encode(&self) -> Result<String, Error> {
        Ok(format!(
            "{}:{}",
            field::encode_hex(self.address, ADDRESS_LEN)?,
            field::encode_hex(u32::from(self.data), DATA_LEN)?
        ))
    }

    pub fn print(&self, verbose: bool) -> String {
        if verbose {
            format!(
                "Atmel Generic Address: \t0x{:06X}\nAtmel Generic Data: \t0x{:04X}",
                self.address, self.data
            )
        } else {
            format!("{:06X}:{:04X}", self.address, self.data)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_valid_record() {
        let record = GenericRecord::decode("000000:0101").unwrap();
        assert_eq!(record.address, 0x000000);
        assert_eq!(record.data, 0x0101);

        let record = GenericRecord::decode("ABCDEF:BEEF").unwrap();
        assert_eq!(record.address, 0xABCDEF);
        assert_eq!(record.data, 0xBEEF);
    }

    #[test]
    fn decode_empty_line() {
        assert_eq!(GenericRecord::decode(""), Err(Error::EmptyLine));
    }

    #[test]
    fn decode_short_line() {
        assert_eq!(GenericRecord::decode("000000:010"), Err(Error::InvalidRecord));
    }

    #[test]
    fn decode_missing_separator() {
        assert_eq!(GenericRecord::decode("00000000101"), Err(Error::InvalidRecord));
        assert_eq!(GenericRecord::decode("0000:000101"), Err(Error::InvalidRecord));
    }

    #[test]
    fn decode_malformed_fields() {
        assert_eq!(GenericRecord::decode("00000X:0101"), Err(Error::InvalidRecord));
        assert_eq!(GenericRecord::decode("000000:01xy"), Err(Error::InvalidRecord));
        // Trailing digits push the data word past 16 bits.
        assert_eq!(GenericRecord::decode("000000:10101"), Err(Error::InvalidRecord));
    }

    #[test]
    fn encode_canonical_form() {
        assert_eq!(
            GenericRecord::new(0, 0x0101).encode(),
            Ok(String::from("000000:0101"))
        );
        assert_eq!(
            GenericRecord::new(0xABCDEF, 0xBEEF).encode(),
            Ok(String::from("ABCDEF:BEEF"))
        );
    }

    #[test]
    fn encode_rejects_wide_address() {
        assert_eq!(
            GenericRecord::new(0x0100_0000, 0).encode(),
            Err(Error::FieldOverflow(0x0100_0000, 6))
        );
    }

    #[test]
    fn round_trip() {
        let record = GenericRecord::new(0x00FF10, 0xCAFE);
        let line = record.encode().unwrap();
        assert_eq!(GenericRecord::decode(&line), Ok(record));
    }

    #[test]
    fn print_modes() {
        let record = GenericRecord::new(0, 0x0101);
        assert_eq!(record.print(false), "000000:0101");
        assert_eq!(
            record.print(true),
            "Atmel Generic Address: \t0x000000\nAtmel Generic Data: \t0x0101"
        );
    }
}
