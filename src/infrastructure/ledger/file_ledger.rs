use crate::domain::error::DomainError;
use crate::domain::ports::ledger::Ledger;
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

/// Ledger stored as a text file with one URL per line. Writes only ever
/// append.
pub struct FileLedger {
    path: PathBuf,
}

impl FileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Ledger for FileLedger {
    fn load(&self) -> Result<HashSet<String>, DomainError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HashSet::new()),
            Err(e) => {
                return Err(DomainError::Ledger(format!(
                    "cannot read {}: {e}",
                    self.path.display()
                )))
            }
        };
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    fn append(&self, urls: &[String]) -> Result<(), DomainError> {
        let io_err = |e: io::Error| DomainError::Ledger(format!("cannot write {}: {e}", self.path.display()));

        let mut seen = HashSet::new();
        let batch: Vec<&str> = urls
            .iter()
            .map(|u| u.trim())
            .filter(|u| !u.is_empty() && !u.contains('\n') && seen.insert(*u))
            .collect();
        if batch.is_empty() {
            return Ok(());
        }

        let mut file = OpenOptions::new()
            .read(true)
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;
        let needs_newline = ends_without_newline(&mut file).map_err(io_err)?;

        let mut writer = BufWriter::new(file);
        if needs_newline {
            writer.write_all(b"\n").map_err(io_err)?;
        }
        for url in batch {
            writeln!(writer, "{url}").map_err(io_err)?;
        }
        writer.flush().map_err(io_err)?;
        writer.get_ref().sync_all().map_err(io_err)
    }
}

/// True when the file has content whose last byte is not a newline, so the
/// next write would extend the last recorded URL.
fn ends_without_newline(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}
