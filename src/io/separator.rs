use crate::utils::{extension_of, Result, TabularIoError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Delimiters considered by [`identify_separator`], in tie-break order.
pub const SEPARATOR_CANDIDATES: [u8; 5] = [b'|', b';', b',', b'\t', b':'];

/// Extensions [`identify_separator`] accepts.
pub const TEXT_EXTENSIONS: [&str; 3] = [".csv", ".txt", ".tsv"];

/// Guesses the field delimiter of a text file from its first line.
pub fn identify_separator(path: &Path) -> Result<u8> {
    let ext = extension_of(path);
    if !TEXT_EXTENSIONS.contains(&ext.as_str()) {
        return Err(TabularIoError::UnsupportedExtension {
            extension: ext,
            allowed: TEXT_EXTENSIONS.to_vec(),
        });
    }

    let header = read_first_line(path)?;

    match identify_in_line(&header) {
        Some(sep) => {
            let shown = (sep as char).escape_default().to_string();
            debug!(path = %path.display(), separator = %shown, "Identified separator");
            Ok(sep)
        }
        None => Err(TabularIoError::SeparatorNotIdentified {
            header: String::from_utf8_lossy(&header).into_owned(),
            searched: SEPARATOR_CANDIDATES.iter().map(|&b| b as char).collect(),
        }),
    }
}

/// The candidate occurring most often in `line`. Ties go to the candidate
/// listed first in [`SEPARATOR_CANDIDATES`]; `None` if no candidate occurs.
pub fn identify_in_line(line: &[u8]) -> Option<u8> {
    let mut best: Option<(u8, usize)> = None;

    for &sep in &SEPARATOR_CANDIDATES {
        let count = line.iter().filter(|&&b| b == sep).count();
        if count == 0 {
            continue;
        }
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((sep, count)),
        }
    }

    best.map(|(sep, _)| sep)
}

fn read_first_line(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut line = Vec::new();
    reader.read_until(b'\n', &mut line)?;
    Ok(line)
}
