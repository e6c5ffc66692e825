use csv::{ByteRecord, Writer, WriterBuilder};
use encoding::{EncoderTrap, EncodingRef};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::{error::Result, Row, RowStream, Select};

/// A header line is needed when the file is not there or holds nothing.
fn needs_header(path: &Path) -> io::Result<bool> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.len() == 0),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(true),
        Err(e) => Err(e),
    }
}

/// Whether a non empty file lacks a final line break, in which case the first
/// appended record would glue onto its last line.
fn lacks_final_newline(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }

    let mut last = [0u8; 1];

    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;

    Ok(last[0] != b'\n')
}

fn encode(row: &Row, encoding: EncodingRef) -> ByteRecord {
    let mut record = ByteRecord::with_capacity(row.as_slice().len(), row.len());

    for field in row.iter() {
        // the Replace trap substitutes unmappable characters instead of failing
        let bytes = encoding
            .encode(field, EncoderTrap::Replace)
            .unwrap_or_else(|_| field.as_bytes().to_vec());

        record.push_field(&bytes);
    }

    record
}

fn open_target(path: &Path, header_row: &ByteRecord) -> Result<Writer<File>> {
    if let Some(dirname) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(dirname)?;
    }

    let header_needed = needs_header(path)?;

    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)?;

    if lacks_final_newline(&mut file)? {
        file.write_all(b"\n")?;
    }

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

    if header_needed {
        debug!("{} is new or empty, writing header", path.display());

        writer.write_byte_record(header_row)?;
    }

    Ok(writer)
}

/// Appends the rows of a stream to a CSV file.
///
/// Rows are written in the column order given at construction. The file is
/// only touched once the first row arrives, so an empty stream does no I/O at
/// all. Existing content is never rewritten, but the write is not atomic: a
/// failure half way leaves whatever made it to disk.
///
/// Fields are written as UTF-8 unless another encoding is set with
/// [`Append::encoding`]; it should match the one the file was read with.
pub struct Append<I> {
    iter: Select<I>,
    path: PathBuf,
    encoding: EncodingRef,
}

impl<I> Append<I>
where
    I: RowStream,
{
    pub fn new<P: Into<PathBuf>>(iter: I, path: P, fields: &[&str]) -> Result<Append<I>> {
        Ok(Append {
            iter: Select::for_stage(iter, fields, "append")?,
            path: path.into(),
            encoding: encoding::all::UTF_8,
        })
    }

    pub fn encoding(mut self, encoding: EncodingRef) -> Append<I> {
        self.encoding = encoding;
        self
    }

    /// Drains the stream into the file and returns how many rows were
    /// written.
    pub fn run(self) -> Result<usize> {
        let Append {
            iter,
            path,
            encoding,
        } = self;
        let header_row = encode(iter.headers().as_row(), encoding);

        let mut rows = iter.into_iter();

        let first = match rows.next() {
            Some(row) => row?,
            None => {
                info!("no new rows to append");

                return Ok(0);
            }
        };

        let mut writer = open_target(&path, &header_row)?;

        writer.write_byte_record(&encode(&first, encoding))?;
        let mut written = 1;

        for row in rows {
            writer.write_byte_record(&encode(&row?, encoding))?;
            written += 1;
        }

        writer.flush()?;

        info!("wrote {} rows to {}", written, path.display());

        Ok(written)
    }
}
