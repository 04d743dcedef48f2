//! OPC package (the zip container shared by .docx and .xlsx)

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use zip::write::{FileOptions, ZipWriter};
use zip::{CompressionMethod, ZipArchive};

#[derive(Debug, Clone)]
pub struct PackageEntry {
    pub name: String,
    pub data: Vec<u8>,
}

/// All entries of a package, kept in archive order
#[derive(Debug, Clone, Default)]
pub struct OpcPackage {
    entries: Vec<PackageEntry>,
}

impl OpcPackage {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        Self::from_reader(file)
            .with_context(|| format!("Failed to read package {}", path.display()))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader).context("Failed to read ZIP archive")?;
        let mut entries = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .context("Failed to read file from archive")?;
            if !file.is_file() {
                continue;
            }
            let name = file.name().to_string();
            let mut data = Vec::new();
            file.read_to_end(&mut data)
                .with_context(|| format!("Failed to read {}", name))?;
            entries.push(PackageEntry { name, data });
        }

        Ok(Self { entries })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn read(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.data.as_slice())
    }

    pub fn require(&self, name: &str) -> Result<&[u8]> {
        self.read(name)
            .ok_or_else(|| anyhow::anyhow!("{} not found in package", name))
    }

    /// Replace an entry's content, appending it when new
    pub fn write(&mut self, name: &str, data: Vec<u8>) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.data = data,
            None => self.entries.push(PackageEntry {
                name: name.to_string(),
                data,
            }),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        for entry in &self.entries {
            zip.start_file(entry.name.as_str(), options)
                .with_context(|| format!("Failed to add {} to archive", entry.name))?;
            zip.write_all(&entry.data)?;
        }

        Ok(zip.finish()?.into_inner())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_reload() {
        let mut package = OpcPackage::default();
        package.write("[Content_Types].xml", b"<Types/>".to_vec());
        package.write("word/document.xml", b"<w:document/>".to_vec());
        package.write("word/document.xml", b"<w:document></w:document>".to_vec());

        let reloaded = OpcPackage::from_bytes(package.to_bytes().unwrap()).unwrap();
        let names: Vec<_> = reloaded.names().collect();
        assert_eq!(names, vec!["[Content_Types].xml", "word/document.xml"]);
        assert_eq!(
            reloaded.read("word/document.xml").unwrap(),
            b"<w:document></w:document>"
        );
        assert!(reloaded.require("word/missing.xml").is_err());
    }
}
