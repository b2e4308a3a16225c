use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use crate::address::AddressRecord;
use crate::error::{Result, TraceError};
use crate::{log_debug, log_info};

/// The one column every trace file carries.
pub const ADDRESS_HEADER: &str = "Address(Hex)";

/// Streams address rows into a single-column CSV.
///
/// The header row is written on construction. Call [`TraceWriter::finish`]
/// to flush; dropping the writer flushes on a best-effort basis and
/// swallows errors.
pub struct TraceWriter<W: Write> {
    inner: csv::Writer<W>,
    rows: usize,
}

impl TraceWriter<File> {
    /// Creates (or truncates) `path`, creating missing parent directories.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| TraceError::filesystem(parent, e))?;
        }
        let file = File::create(path).map_err(|e| TraceError::filesystem(path, e))?;
        Self::new(file)
    }
}

impl<W: Write> TraceWriter<W> {
    pub fn new(writer: W) -> Result<Self> {
        let mut inner = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);
        inner.write_record([ADDRESS_HEADER])?;
        Ok(TraceWriter { inner, rows: 0 })
    }

    pub fn write_address(&mut self, address: &AddressRecord) -> Result<()> {
        self.inner.write_record([address.to_string()])?;
        self.rows += 1;
        Ok(())
    }

    /// Data rows written so far, header excluded.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flushes buffered rows and hands back the underlying writer.
    pub fn finish(self) -> Result<W> {
        self.inner
            .into_inner()
            .map_err(|e| TraceError::Csv(csv::Error::from(e.into_error())))
    }
}

/// Writes `addresses` to `path` as a trace file, overwriting any existing
/// file. A failure part-way through leaves a partially written file.
pub fn write_trace(path: &Path, addresses: &[AddressRecord]) -> Result<()> {
    let rows = write_rows(path, addresses).map_err(|e| attach_path(path, e))?;
    log_info!("Wrote {} addresses to {}", rows, path.display());
    Ok(())
}

fn write_rows(path: &Path, addresses: &[AddressRecord]) -> Result<usize> {
    let mut writer = TraceWriter::create(path)?;
    for address in addresses {
        writer.write_address(address)?;
    }
    let rows = writer.rows();
    writer.finish()?;
    Ok(rows)
}

// I/O failures surfacing through the csv writer belong to the output file.
fn attach_path(path: &Path, err: TraceError) -> TraceError {
    match err {
        TraceError::Csv(e) if e.is_io_error() => match e.into_kind() {
            csv::ErrorKind::Io(source) => TraceError::filesystem(path, source),
            kind => TraceError::Format(format!("{:?}", kind)),
        },
        other => other,
    }
}

/// Reads a trace file back into its addresses, in file order.
pub fn read_trace(path: &Path) -> Result<Vec<AddressRecord>> {
    let file = File::open(path).map_err(|e| TraceError::filesystem(path, e))?;
    let addresses = read_trace_from(file)?;
    log_debug!("Read {} addresses from {}", addresses.len(), path.display());
    Ok(addresses)
}

/// Parses trace rows from any reader. The first row must be the
/// `Address(Hex)` header; blank lines are skipped.
pub fn read_trace_from<R: Read>(reader: R) -> Result<Vec<AddressRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?;
    if headers.len() != 1 || headers[0].trim() != ADDRESS_HEADER {
        return Err(TraceError::Format(format!(
            "expected header {:?}, found {:?}",
            ADDRESS_HEADER,
            headers.iter().collect::<Vec<_>>()
        )));
    }

    let mut addresses = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        if record.len() > 1 {
            return Err(TraceError::Format(format!(
                "data row {}: expected 1 field, found {}",
                i + 1,
                record.len()
            )));
        }
        if let Some(field) = record.get(0).filter(|f| !f.trim().is_empty()) {
            let address = AddressRecord::from_hex(field)
                .map_err(|e| TraceError::Format(format!("data row {}: {}", i + 1, e)))?;
            addresses.push(address);
        }
    }
    Ok(addresses)
}
