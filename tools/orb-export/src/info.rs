//! ORB file inspection

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

use crate::formats::OrbHeader;

/// Read and check the header of an ORB file
pub fn read_header(path: &Path) -> Result<OrbHeader> {
    let mut file =
        std::fs::File::open(path).with_context(|| format!("Failed to open ORB file: {:?}", path))?;
    let mut bytes = [0u8; OrbHeader::SIZE];
    file.read_exact(&mut bytes)
        .with_context(|| format!("File too short for an ORB header: {:?}", path))?;
    match OrbHeader::from_bytes(&bytes) {
        Some(header) => Ok(header),
        None => anyhow::bail!("Not an ORB file (bad magic): {:?}", path),
    }
}

/// Log the section table of an ORB file
pub fn list_sections(path: &Path) -> Result<()> {
    let header = read_header(path)?;
    let file_len = std::fs::metadata(path)
        .with_context(|| format!("Failed to stat {:?}", path))?
        .len();

    tracing::info!("Sections in {:?}:", path);
    for section in header.sections() {
        tracing::info!(
            "  {:<20} offset {:>8}  count {:>6}  {:>8} bytes",
            section.kind.name(),
            section.offset,
            section.count,
            section.byte_size
        );
    }
    if header.file_size() != file_len {
        tracing::warn!(
            "Header describes {} bytes, file has {}",
            header.file_size(),
            file_len
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.orb");
        let mut header = OrbHeader::new();
        header.string_pool_data_offset = OrbHeader::SIZE as u32;
        std::fs::write(&path, header.to_bytes()).unwrap();

        assert_eq!(read_header(&path).unwrap(), header);
        assert!(list_sections(&path).is_ok());
    }

    #[test]
    fn test_rejects_non_orb_files() {
        let dir = tempfile::tempdir().unwrap();

        let short = dir.path().join("short.orb");
        std::fs::write(&short, b"ORB1").unwrap();
        assert!(read_header(&short).is_err());

        let bad_magic = dir.path().join("bad.orb");
        std::fs::write(&bad_magic, [0u8; OrbHeader::SIZE]).unwrap();
        assert!(read_header(&bad_magic).is_err());

        assert!(read_header(&dir.path().join("missing.orb")).is_err());
    }
}
