//! Append-only record sinks
//!
//! Records are written one at a time as units complete: one JSON document
//! per line, and one CSV row per record under a single header line.

use crate::extract::{Record, CSV_HEADERS};
use crate::output::traits::{OutputError, OutputResult, RecordSink};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

fn open_append(path: &Path) -> OutputResult<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| OutputError::Open {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| OutputError::Open {
            path: path.to_path_buf(),
            source,
        })
}

/// Newline-delimited JSON sink
pub struct JsonlSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl JsonlSink {
    pub fn open(path: impl Into<PathBuf>) -> OutputResult<Self> {
        let path = path.into();
        let file = open_append(&path)?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }
}

impl RecordSink for JsonlSink {
    fn write_record(&mut self, record: &Record) -> OutputResult<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

/// CSV sink; the header is written once, when the file is new or empty
pub struct CsvSink {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl CsvSink {
    pub fn open(path: impl Into<PathBuf>) -> OutputResult<Self> {
        let path = path.into();
        let is_empty = std::fs::metadata(&path)
            .map(|m| m.len() == 0)
            .unwrap_or(true);

        let file = open_append(&path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if is_empty {
            writer.write_record(CSV_HEADERS)?;
            writer.flush()?;
        }

        Ok(Self { path, writer })
    }
}

impl RecordSink for CsvSink {
    fn write_record(&mut self, record: &Record) -> OutputResult<()> {
        self.writer.write_record(record.csv_row())?;
        self.writer.flush()?;
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

/// Fans a record out to every configured sink
pub struct OutputSinks {
    sinks: Vec<Box<dyn RecordSink>>,
}

impl OutputSinks {
    pub fn new(sinks: Vec<Box<dyn RecordSink>>) -> Self {
        Self { sinks }
    }

    /// Opens the JSONL and CSV sinks
    pub fn open(jsonl: &Path, csv: &Path) -> OutputResult<Self> {
        Ok(Self::new(vec![
            Box::new(JsonlSink::open(jsonl)?),
            Box::new(CsvSink::open(csv)?),
        ]))
    }

    pub fn write_record(&mut self, record: &Record) -> OutputResult<()> {
        for sink in &mut self.sinks {
            sink.write_record(record)?;
        }
        Ok(())
    }
}
