// SPDX-License-Identifier: MIT

//! gisdump prints all of the records stored in an Atmel Generic, Intel HEX,
//! or Motorola S-Record formatted object file.

use std::fs::File;
use std::io::BufReader;
use std::process;

use clap::{App, Arg};

use gisrec::{Error, Format, RecordReader};

fn main() {
    let matches = App::new("gisdump")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Prints the records stored in an Atmel Generic, Intel HEX, or Motorola S-Record formatted object file")
        .arg(
            Arg::with_name("format")
                .help("Object file format")
                .possible_values(&["generic", "ihex", "srecord"])
                .required(true),
        )
        .arg(
            Arg::with_name("file")
                .help("Path to the formatted object file")
                .required(true),
        )
        .arg(
            Arg::with_name("json")
                .long("json")
                .help("Dump the records as a JSON array instead of field-by-field text"),
        )
        .get_matches();

    let format: Format = match matches.value_of("format").unwrap_or_default().parse() {
        Ok(format) => format,
        Err(_) => {
            eprintln!("Unknown file format specified!");
            process::exit(1);
        }
    };

    let filename = matches.value_of("file").unwrap_or_default();
    let file = match File::open(filename) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Error opening '{}': {}", filename, err);
            process::exit(1);
        }
    };

    let json = matches.is_present("json");
    let mut reader = RecordReader::new(BufReader::new(file), format);
    let mut records = vec![];
    let mut line_number = 0;
    loop {
        line_number += 1;
        match reader.read_record() {
            Ok(record) => {
                if json {
                    records.push(record);
                } else {
                    println!("{}\n", record.print(true));
                }
            }
            Err(Error::EndOfStream) => break,
            Err(Error::EmptyLine) => continue,
            Err(err) => {
                eprintln!("Error at line {}: {}", line_number, err);
                process::exit(1);
            }
        }
    }

    if json {
        match serde_json::to_string(&records) {
            Ok(dump) => println!("{}", dump),
            Err(err) => {
                eprintln!("Error serializing records: {}", err);
                process::exit(1);
            }
        }
    }
}
