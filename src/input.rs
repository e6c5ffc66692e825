use csv::{ByteRecord, ReaderBuilder};
use encoding::{DecoderTrap, EncodingRef};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

use crate::{
    error::{Error, Result},
    Headers, Row, Table,
};

fn decode(data: &ByteRecord, encoding: EncodingRef) -> Row {
    let mut row = Row::with_capacity(data.as_slice().len(), data.len());

    for item in data.iter() {
        // the Replace trap substitutes bad bytes instead of failing
        let field = encoding
            .decode(item, DecoderTrap::Replace)
            .unwrap_or_else(|_| String::from_utf8_lossy(item).into_owned());

        row.push_field(&field);
    }

    row
}

/// Reads a comma delimited table with a header line from `reader`. Every
/// value is kept as a string.
pub fn read_table<R: Read>(reader: R, encoding: EncodingRef) -> Result<Table> {
    let mut reader = ReaderBuilder::new().from_reader(reader);
    let headers = Headers::from_row(decode(reader.byte_headers()?, encoding));

    let mut rows = Vec::new();
    let mut record = ByteRecord::new();

    while reader.read_byte_record(&mut record)? {
        rows.push(decode(&record, encoding));
    }

    Ok(Table::new(headers, rows))
}

/// Loads the file at `path` into memory. Fails with [`Error::NotFound`] if
/// there is no such file.
pub fn load_table<P: AsRef<Path>>(path: P, encoding: EncodingRef) -> Result<Table> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    let table = read_table(File::open(path)?, encoding)?;

    info!("loaded {} rows from {}", table.len(), path.display());

    Ok(table)
}

/// Like [`load_table`] but a file that does not exist yet reads as an empty
/// table. Used for the destination, which is absent on the first run.
pub fn load_table_or_empty<P: AsRef<Path>>(path: P, encoding: EncodingRef) -> Result<Table> {
    let path = path.as_ref();

    if !path.exists() {
        info!("{} does not exist yet, starting from an empty table", path.display());

        return Ok(Table::empty());
    }

    load_table(path, encoding)
}
