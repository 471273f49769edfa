//! JSON file output

use super::traits::{OutputResult, OutputSink};
use crate::record::Character;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes the roster as a JSON array indented with four spaces
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Renders records the way [`JsonFileSink`] writes them
pub fn to_json_string(characters: &[Character]) -> OutputResult<String> {
    let mut buf = Vec::new();
    write_json(&mut buf, characters)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn write_json<W: Write>(writer: W, characters: &[Character]) -> OutputResult<()> {
    let mut serializer =
        serde_json::Serializer::with_formatter(writer, PrettyFormatter::with_indent(b"    "));
    characters.serialize(&mut serializer)?;
    Ok(())
}

impl OutputSink for JsonFileSink {
    fn save(&self, characters: &[Character]) -> OutputResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = BufWriter::new(File::create(&self.path)?);
        write_json(&mut writer, characters)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        tracing::info!(
            "Wrote {} characters to {}",
            characters.len(),
            self.path.display()
        );
        Ok(())
    }
}
