use std::{
    fmt,
    fs::File,
    io::{self, BufReader, BufWriter, StdoutLock, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Serialize, de::DeserializeOwned};

/// Destination of JSON results: stdout unless `--output` names a file.
#[derive(Debug)]
pub enum Output {
    Stdout(StdoutLock<'static>),
    File {
        path: PathBuf,
        writer: BufWriter<File>,
    },
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Stdout(_) => f.write_str("stdout"),
            Output::File { path, .. } => write!(f, "{}", path.display()),
        }
    }
}

impl Output {
    pub fn from_output_path(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Output::Stdout(io::stdout().lock()));
        };
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            path: path.to_owned(),
            writer: BufWriter::new(file),
        })
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Output::Stdout(writer) => writer,
            Output::File { writer, .. } => writer,
        }
    }

    /// Writes one indented JSON document and flushes.
    pub fn write_json<T: Serialize>(&mut self, value: &T) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(self.writer(), value)
            .with_context(|| format!("Failed to write JSON to {self}"))?;
        self.end_line()?;
        self.flush()
    }

    /// Writes `value` as a single JSON line.
    pub fn write_json_line<T: Serialize>(&mut self, value: &T) -> anyhow::Result<()> {
        serde_json::to_writer(self.writer(), value)
            .with_context(|| format!("Failed to write JSON to {self}"))?;
        self.end_line()
    }

    pub fn flush(&mut self) -> anyhow::Result<()> {
        self.writer()
            .flush()
            .with_context(|| format!("Failed to flush {self}"))
    }

    fn end_line(&mut self) -> anyhow::Result<()> {
        self.writer()
            .write_all(b"\n")
            .with_context(|| format!("Failed to write to {self}"))
    }
}

/// Reads and parses a JSON file; `file_kind` names it in error messages.
pub fn read_json_file<T: DeserializeOwned>(file_kind: &str, path: &Path) -> anyhow::Result<T> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {file_kind} file: {}", path.display()))
}
