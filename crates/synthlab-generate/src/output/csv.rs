use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use synthlab_core::Table;

/// Write a table as CSV in column order; nulls become empty cells.
pub fn write_table_csv(path: &Path, table: &Table) -> Result<u64, csv::Error> {
    let writer = BufWriter::new(File::create(path).map_err(csv::Error::from)?);
    let counting = write_records(CountingWriter::new(writer), table)?;
    Ok(counting.bytes_written())
}

/// Render a table to CSV bytes in memory.
pub fn table_to_csv_bytes(table: &Table) -> Result<Vec<u8>, csv::Error> {
    let counting = write_records(CountingWriter::new(Vec::new()), table)?;
    Ok(counting.inner)
}

fn write_records<W: Write>(
    sink: CountingWriter<W>,
    table: &Table,
) -> Result<CountingWriter<W>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(sink);

    writer.write_record(table.names())?;
    for record in table.to_string_records() {
        writer.write_record(&record)?;
    }

    writer.flush()?;
    writer.into_inner().map_err(|err| err.into_error().into())
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
