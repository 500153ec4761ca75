use crate::utils::{extension_of, Result, TabularIoError};
use bzip2::read::BzDecoder;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use xz2::read::XzDecoder;
use zip::ZipArchive;

pub const READABLE_EXTENSIONS: [&str; 10] = [
    ".xlsx", ".xls", ".txt", ".tsv", ".csv", ".gz", ".bz2", ".zip", ".xz", ".h5",
];

pub const EXPORTABLE_EXTENSIONS: [&str; 3] = [".xlsx", ".txt", ".csv"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Gzip,
    Bzip2,
    Zip,
    Xz,
}

impl Compression {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            ".gz" => Some(Compression::Gzip),
            ".bz2" => Some(Compression::Bzip2),
            ".zip" => Some(Compression::Zip),
            ".xz" => Some(Compression::Xz),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        Self::from_extension(&extension_of(path))
    }
}

/// How a file is read, decided by its extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Spreadsheet,
    DelimitedText,
    Compressed(Compression),
    Hierarchical,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = extension_of(path);
        if let Some(compression) = Compression::from_extension(&ext) {
            return Ok(FileKind::Compressed(compression));
        }
        match ext.as_str() {
            ".xlsx" | ".xls" => Ok(FileKind::Spreadsheet),
            ".txt" | ".tsv" | ".csv" => Ok(FileKind::DelimitedText),
            ".h5" => Ok(FileKind::Hierarchical),
            _ => Err(TabularIoError::UnsupportedExtension {
                extension: ext,
                allowed: READABLE_EXTENSIONS.to_vec(),
            }),
        }
    }
}

/// How a table is written, decided by the target extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Spreadsheet,
    DelimitedText,
}

impl ExportKind {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = extension_of(path);
        match ext.as_str() {
            ".xlsx" => Ok(ExportKind::Spreadsheet),
            ".txt" | ".csv" => Ok(ExportKind::DelimitedText),
            _ => Err(TabularIoError::ExportUnsupported { extension: ext }),
        }
    }
}

/// Raw file contents, decompressed when the extension names a compression
/// format.
pub fn load_bytes(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut bytes = Vec::new();

    match Compression::from_path(path) {
        None => {
            BufReader::new(file).read_to_end(&mut bytes)?;
        }
        Some(Compression::Gzip) => {
            MultiGzDecoder::new(BufReader::new(file)).read_to_end(&mut bytes)?;
        }
        Some(Compression::Bzip2) => {
            BzDecoder::new(BufReader::new(file)).read_to_end(&mut bytes)?;
        }
        Some(Compression::Xz) => {
            XzDecoder::new(BufReader::new(file)).read_to_end(&mut bytes)?;
        }
        Some(Compression::Zip) => {
            let mut archive = ZipArchive::new(BufReader::new(file))?;
            let mut found = false;
            for i in 0..archive.len() {
                let mut entry = archive.by_index(i)?;
                if entry.is_file() {
                    entry.read_to_end(&mut bytes)?;
                    found = true;
                    break;
                }
            }
            if !found {
                return Err(TabularIoError::CompressionError(format!(
                    "no file entry in archive {}",
                    path.display()
                )));
            }
        }
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn read_kinds_by_extension() {
        let kind = |p: &str| FileKind::from_path(Path::new(p)).unwrap();
        assert_eq!(kind("a.XLSX"), FileKind::Spreadsheet);
        assert_eq!(kind("a.xls"), FileKind::Spreadsheet);
        assert_eq!(kind("a.tsv"), FileKind::DelimitedText);
        assert_eq!(kind("a.csv.gz"), FileKind::Compressed(Compression::Gzip));
        assert_eq!(kind("a.csv.xz"), FileKind::Compressed(Compression::Xz));
        assert_eq!(kind("a.zip"), FileKind::Compressed(Compression::Zip));
        assert_eq!(kind("store.h5"), FileKind::Hierarchical);
    }

    #[test]
    fn unknown_extensions_are_rejected() {
        assert!(matches!(
            FileKind::from_path(Path::new("notes.json")),
            Err(TabularIoError::UnsupportedExtension { .. })
        ));
        assert!(matches!(
            FileKind::from_path(Path::new("noextension")),
            Err(TabularIoError::UnsupportedExtension { .. })
        ));
    }

    #[test]
    fn export_kinds_by_extension() {
        assert_eq!(
            ExportKind::from_path(Path::new("out.Xlsx")).unwrap(),
            ExportKind::Spreadsheet
        );
        assert_eq!(
            ExportKind::from_path(Path::new("out.txt")).unwrap(),
            ExportKind::DelimitedText
        );
        assert!(matches!(
            ExportKind::from_path(Path::new("out.tsv")),
            Err(TabularIoError::ExportUnsupported { .. })
        ));
    }

    #[test]
    fn gzip_is_decompressed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), flate2::Compression::default());
        encoder.write_all(b"a,b\n1,2\n").unwrap();
        encoder.finish().unwrap();

        assert_eq!(load_bytes(&path).unwrap(), b"a,b\n1,2\n");
    }

    #[test]
    fn empty_zip_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.zip");
        let writer = zip::ZipWriter::new(File::create(&path).unwrap());
        writer.finish().unwrap();

        assert!(matches!(
            load_bytes(&path),
            Err(TabularIoError::CompressionError(_))
        ));
    }
}
