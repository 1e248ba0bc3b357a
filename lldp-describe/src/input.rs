//! Device address list loading.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::InputError;

/// Read device addresses from a header-less, comma-delimited file.
///
/// The first field of every row is returned as-is, in file order.
/// Duplicates and malformed addresses are passed through.
pub fn load_addresses(path: impl AsRef<Path>) -> Result<Vec<String>, InputError> {
    let path = path.as_ref();

    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => InputError::NotFound {
            path: path.to_path_buf(),
        },
        _ => InputError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    read_addresses(file).map_err(|source| InputError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

/// Read device addresses from any reader. See [`load_addresses`].
pub fn read_addresses(reader: impl Read) -> Result<Vec<String>, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut addresses = Vec::new();
    for row in reader.records() {
        let row = row?;
        if let Some(first) = row.get(0) {
            addresses.push(first.to_string());
        }
    }

    // Files saved by spreadsheet tools often start with a BOM
    if let Some(first) = addresses.first_mut() {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.to_string();
        }
    }

    Ok(addresses)
}
