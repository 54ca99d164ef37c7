// SPDX-License-Identifier: MIT

//! Codecs for the Atmel Generic, Intel HEX, and Motorola S-Record object
//! file formats.
//!
//! All three formats encode a binary memory image as ASCII text lines, one
//! record per line. This crate works at single-record granularity: a line of
//! text decodes into an owned record value, and a record value encodes back
//! into its canonical text form (fixed-width, zero-padded, uppercase hex).
//! Nothing is merged across records; extended-address Intel HEX records and
//! S-Record headers are carried as plain field values for the caller to
//! interpret.

use std::fs::File;
use std::io;
use std::io::prelude::*; // used to get the BufRead trait
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use err_derive::Error;
use serde::{Deserialize, Serialize};

pub mod checksum;
pub mod field;
pub mod generic;
pub mod ihex;
pub mod srec;

pub use crate::generic::GenericRecord;
pub use crate::ihex::IhexRecord;
pub use crate::srec::SRecord;

/// Failures surfaced by every codec and stream operation.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum Error {
    /// A constructor was given an out-of-range value.
    #[error(display = "invalid arguments")]
    InvalidArguments,
    /// A value needs more hex digits than its field provides.
    #[error(display = "value 0x{:X} does not fit in {} hex digits", _0, _1)]
    FieldOverflow(u32, usize),
    /// The underlying stream failed to read or write a line.
    #[error(display = "file error: {}", _0)]
    FileError(String),
    /// No more records are available. A normal terminal signal, not a fault.
    #[error(display = "end of stream")]
    EndOfStream,
    /// A line was read where a record was expected, but it was empty.
    #[error(display = "empty line")]
    EmptyLine,
    /// Structural malformation: wrong length, missing separator or marker,
    /// unrecognized type tag, or a byte count that disagrees with the data.
    #[error(display = "invalid record")]
    InvalidRecord,
    /// The record is well formed but its checksum byte is wrong.
    #[error(display = "checksum mismatch: computed 0x{:02X}, record has 0x{:02X}", _0, _1)]
    ChecksumMismatch(u8, u8),
    /// An operation was invoked with no record constructed or decoded.
    #[error(display = "no record constructed or decoded")]
    InvalidStructure,
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::FileError(err.to_string())
    }
}

/// One of the three supported object file formats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Format {
    Generic,
    IntelHex,
    SRecord,
}

impl Format {
    /// Decodes one line of text in this format.
    pub fn decode(self, line: &str) -> Result<Record, Error> {
        match self {
            Format::Generic => GenericRecord::decode(line).map(Record::Generic),
            Format::IntelHex => IhexRecord::decode(line).map(Record::IntelHex),
            Format::SRecord => SRecord::decode(line).map(Record::SRecord),
        }
    }

    /// Reads every record from the named file. Blank lines are skipped; the
    /// first malformed record aborts the read with its error.
    pub fn read_file<P: AsRef<Path>>(self, path: P) -> Result<Vec<Record>, Error> {
        let file = File::open(path)?;
        let mut records = vec![];
        for result in RecordReader::new(BufReader::new(file), self) {
            match result {
                Ok(record) => records.push(record),
                Err(Error::EmptyLine) => continue,
                Err(err) => return Err(err),
            }
        }
        Ok(records)
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(name: &str) -> Result<Format, Error> {
        match name {
            "generic" => Ok(Format::Generic),
            "ihex" => Ok(Format::IntelHex),
            "srecord" => Ok(Format::SRecord),
            _ => Err(Error::InvalidArguments),
        }
    }
}

/// A decoded record from any of the three formats.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Record {
    Generic(GenericRecord),
    IntelHex(IhexRecord),
    SRecord(SRecord),
}

impl Record {
    /// Re-serializes the record to its canonical text line.
    pub fn encode(&self) -> Result<String, Error> {
        match self {
            Record::Generic(record) => record.encode(),
            Record::IntelHex(record) => record.encode(),
            Record::SRecord(record) => record.encode(),
        }
    }

    /// Renders the record for display: the encoded line in compact mode, or
    /// one labeled line per field in verbose mode.
    pub fn print(&self, verbose: bool) -> String {
        match self {
            Record::Generic(record) => record.print(verbose),
            Record::IntelHex(record) => record.print(verbose),
            Record::SRecord(record) => record.print(verbose),
        }
    }
}

/// Reads records of a fixed format from a line-oriented stream.
pub struct RecordReader<R> {
    stream: R,
    format: Format,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(stream: R, format: Format) -> RecordReader<R> {
        RecordReader { stream, format }
    }

    /// Reads and decodes the next line. Returns `EndOfStream` once the
    /// stream is exhausted; every call is independent of the previous one.
    pub fn read_record(&mut self) -> Result<Record, Error> {
        let mut line = String::new();
        if self.stream.read_line(&mut line)? == 0 {
            return Err(Error::EndOfStream);
        }
        self.format.decode(line.trim_end_matches(|c| c == '\r' || c == '\n'))
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<Record, Error>;

    fn next(&mut self) -> Option<Result<Record, Error>> {
        match self.read_record() {
            Err(Error::EndOfStream) => None,
            result => Some(result),
        }
    }
}

/// Writes records to a line-oriented stream, one encoded line each.
pub struct RecordWriter<W> {
    stream: W,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(stream: W) -> RecordWriter<W> {
        RecordWriter { stream }
    }

    pub fn write_record(&mut self, record: &Record) -> Result<(), Error> {
        let line = record.encode()?;
        writeln!(self.stream, "{}", line)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_names() {
        assert_eq!("generic".parse(), Ok(Format::Generic));
        assert_eq!("ihex".parse(), Ok(Format::IntelHex));
        assert_eq!("srecord".parse(), Ok(Format::SRecord));
        assert_eq!("elf".parse::<Format>(), Err(Error::InvalidArguments));
    }

    #[test]
    fn reader_stops_at_end_of_stream() {
        let input = b"000000:0101\n000001:0202\n" as &[u8];
        let mut reader = RecordReader::new(input, Format::Generic);

        assert_eq!(
            reader.read_record(),
            Ok(Record::Generic(GenericRecord::new(0, 0x0101)))
        );
        assert_eq!(
            reader.read_record(),
            Ok(Record::Generic(GenericRecord::new(1, 0x0202)))
        );
        assert_eq!(reader.read_record(), Err(Error::EndOfStream));
        assert_eq!(reader.read_record(), Err(Error::EndOfStream));
    }

    #[test]
    fn reader_surfaces_blank_lines() {
        let input = b"000000:0101\n\n000001:0202\n" as &[u8];
        let mut reader = RecordReader::new(input, Format::Generic);

        assert!(reader.read_record().is_ok());
        assert_eq!(reader.read_record(), Err(Error::EmptyLine));
        assert!(reader.read_record().is_ok());
    }

    #[test]
    fn reader_iterator_ends_without_error() {
        let input = b":00000001FF\r\n" as &[u8];
        let records: Result<Vec<Record>, Error> =
            RecordReader::new(input, Format::IntelHex).collect();

        assert_eq!(
            records,
            Ok(vec![Record::IntelHex(
                IhexRecord::new(ihex::types::END_OF_FILE, 0, vec![]).unwrap()
            )])
        );
    }

    #[test]
    fn writer_appends_newline() {
        let mut buffer = vec![];
        let mut writer = RecordWriter::new(&mut buffer);
        writer
            .write_record(&Record::Generic(GenericRecord::new(0, 0x0101)))
            .unwrap();

        assert_eq!(buffer, b"000000:0101\n");
    }
}
