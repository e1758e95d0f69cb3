//! Delimited text serialization.
//!
//! Two explicit paths with a documented precedence. UTF-8 output with a
//! terminator the csv crate supports streams straight to the file (`Native`).
//! Any other encoding, or a verbatim custom terminator, serializes each
//! record to a UTF-8 line first and encodes it on the way out (`Encoded`).
//! Both paths apply minimal quoting and produce identical text for the
//! configurations they share.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use encoding_rs::Encoding;

use crate::config::FormatOptions;

/// Writes the header and data records of one output file.
pub enum DelimitedWriter {
    Native(csv::Writer<File>),
    Encoded {
        out: BufWriter<File>,
        delimiter: u8,
        terminator: String,
        encoding: &'static Encoding,
    },
}

impl DelimitedWriter {
    /// Create the output file and pick the serialization path for `format`.
    pub fn create(path: &Path, format: &FormatOptions) -> io::Result<Self> {
        let file = File::create(path)?;
        match format.line_ending.as_csv_terminator() {
            Some(terminator) if format.encoding == encoding_rs::UTF_8 => {
                Ok(DelimitedWriter::Native(
                    csv::WriterBuilder::new()
                        .delimiter(format.delimiter)
                        .terminator(terminator)
                        .from_writer(file),
                ))
            }
            _ => Ok(DelimitedWriter::Encoded {
                out: BufWriter::new(file),
                delimiter: format.delimiter,
                terminator: format.line_ending.as_str().to_string(),
                encoding: format.encoding,
            }),
        }
    }

    /// Write one record (header or data row).
    pub fn write_record<I, S>(&mut self, fields: I) -> io::Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields: Vec<S> = fields.into_iter().collect();
        match self {
            DelimitedWriter::Native(writer) => writer
                .write_record(fields.iter().map(|f| f.as_ref().as_bytes()))
                .map_err(io::Error::other),
            DelimitedWriter::Encoded {
                out,
                delimiter,
                terminator,
                encoding,
            } => {
                let mut line = serialize_record(*delimiter, &fields)?;
                line.push_str(terminator);
                let (bytes, _, _) = encoding.encode(&line);
                out.write_all(&bytes)
            }
        }
    }

    /// Flush everything to disk.
    pub fn finish(&mut self) -> io::Result<()> {
        match self {
            DelimitedWriter::Native(writer) => writer.flush(),
            DelimitedWriter::Encoded { out, .. } => out.flush(),
        }
    }
}

/// Serialize one record to a UTF-8 line, without a terminator.
///
/// The csv crate always appends the configured terminator, so the record is
/// written with a single placeholder byte which is stripped again; quoted
/// newlines inside fields are untouched.
fn serialize_record<S: AsRef<str>>(delimiter: u8, fields: &[S]) -> io::Result<String> {
    let mut buf = Vec::with_capacity(64);
    {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(&mut buf);
        writer
            .write_record(fields.iter().map(|f| f.as_ref().as_bytes()))
            .map_err(io::Error::other)?;
        writer.flush()?;
    }
    buf.pop();
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
