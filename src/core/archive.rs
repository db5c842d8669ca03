use crate::error::{Result, SetupError};
use crate::utils::fs;
use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tar::Archive;
use zip::ZipArchive;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Bzip2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar(Compression),
}

const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const BZIP2_MAGIC: &[u8] = b"BZh";
const XZ_MAGIC: &[u8] = &[0xfd, b'7', b'z', b'X', b'Z', 0x00];

impl ArchiveFormat {
    /// Picks the container from the file name and, for tarballs, sniffs the
    /// compression from the leading bytes of the file.
    pub fn detect(archive_path: &Path) -> Result<Self> {
        let file_name = archive_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| SetupError::UnsupportedArchive {
                name: archive_path.display().to_string(),
            })?;

        if file_name.ends_with(".zip") {
            return Ok(ArchiveFormat::Zip);
        }

        let mut magic = [0u8; 6];
        let read = read_prefix(open_file(archive_path)?, &mut magic)
            .map_err(|e| SetupError::file(archive_path, e))?;
        let magic = &magic[..read];

        if magic.starts_with(GZIP_MAGIC) {
            Ok(ArchiveFormat::Tar(Compression::Gzip))
        } else if magic.starts_with(BZIP2_MAGIC) {
            Ok(ArchiveFormat::Tar(Compression::Bzip2))
        } else if magic.starts_with(XZ_MAGIC) {
            Err(SetupError::UnsupportedCompression {
                path: archive_path.to_path_buf(),
                kind: "xz",
            })
        } else {
            Ok(ArchiveFormat::Tar(Compression::None))
        }
    }
}

fn read_prefix(mut reader: impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| SetupError::file(path, e))
}

/// An archive whose format is known and whose container could be opened,
/// ready to be unpacked. Zip central directories are parsed on open; tar
/// streams are only read while unpacking.
pub enum OpenArchive {
    Zip {
        path: PathBuf,
        archive: ZipArchive<BufReader<File>>,
    },
    Tar {
        path: PathBuf,
        archive: Archive<Box<dyn Read>>,
    },
}

impl OpenArchive {
    pub fn open(archive_path: &Path) -> Result<Self> {
        let format = ArchiveFormat::detect(archive_path)?;
        log::debug!("Opening {} as {format:?}", archive_path.display());

        let file = BufReader::new(open_file(archive_path)?);
        let path = archive_path.to_path_buf();

        match format {
            ArchiveFormat::Zip => Ok(OpenArchive::Zip {
                path,
                archive: ZipArchive::new(file)?,
            }),
            ArchiveFormat::Tar(compression) => {
                let reader: Box<dyn Read> = match compression {
                    Compression::Gzip => Box::new(GzDecoder::new(file)),
                    Compression::Bzip2 => Box::new(BzDecoder::new(file)),
                    Compression::None => Box::new(file),
                };
                Ok(OpenArchive::Tar {
                    path,
                    archive: Archive::new(reader),
                })
            }
        }
    }

    /// Unpacks every entry into `destination`, creating it if needed.
    pub fn unpack(self, destination: &Path) -> Result<()> {
        fs::ensure_dir_exists(destination).map_err(|e| SetupError::file(destination, e))?;

        match self {
            OpenArchive::Zip { path, mut archive } => unpack_zip(&path, &mut archive, destination),
            OpenArchive::Tar { path, mut archive } => archive
                .unpack(destination)
                .map_err(|e| SetupError::extraction(&path, e)),
        }
    }
}

/// Unpacks the whole archive into `destination`.
pub fn extract_archive(archive_path: &Path, destination: &Path) -> Result<()> {
    OpenArchive::open(archive_path)?.unpack(destination)
}

fn unpack_zip(
    archive_path: &Path,
    archive: &mut ZipArchive<BufReader<File>>,
    destination: &Path,
) -> Result<()> {
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let outpath = match entry.enclosed_name() {
            Some(path) => destination.join(path),
            None => {
                log::warn!("Skipping unsafe entry {:?} in {}", entry.name(), archive_path.display());
                continue;
            }
        };

        if entry.is_dir() {
            fs::ensure_dir_exists(&outpath).map_err(|e| SetupError::file(&outpath, e))?;
        } else {
            if let Some(parent) = outpath.parent() {
                fs::ensure_dir_exists(parent).map_err(|e| SetupError::file(parent, e))?;
            }
            let mut outfile = File::create(&outpath).map_err(|e| SetupError::file(&outpath, e))?;
            std::io::copy(&mut entry, &mut outfile)
                .map_err(|e| SetupError::extraction(archive_path, e))?;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))
                    .map_err(|e| SetupError::file(&outpath, e))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use bzip2::write::BzEncoder;
    use flate2::write::GzEncoder;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn tar_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (path, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            builder.append_data(&mut header, path, *data).unwrap();
        }
        builder.into_inner().unwrap()
    }

    pub(crate) fn tar_gz_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(&tar_bytes(entries)).unwrap();
        encoder.finish().unwrap()
    }

    fn tar_bz2_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut encoder = BzEncoder::new(Vec::new(), bzip2::Compression::default());
        encoder.write_all(&tar_bytes(entries)).unwrap();
        encoder.finish().unwrap()
    }

    pub(crate) fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        for (path, data) in entries {
            writer.start_file(*path, SimpleFileOptions::default()).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_detect_formats() {
        let temp = tempfile::tempdir().unwrap();
        let gz = temp.path().join("icu4c-4_2_1-src.tgz");
        let plain = temp.path().join("plain.tar");
        let zip = temp.path().join("icu.zip");
        std::fs::write(&gz, tar_gz_bytes(&[("icu/readme.html", b"icu")])).unwrap();
        std::fs::write(&plain, tar_bytes(&[("plain/a.txt", b"a")])).unwrap();
        std::fs::write(&zip, zip_bytes(&[("icu/bin/icuuc.dll", b"dll")])).unwrap();

        assert_eq!(
            ArchiveFormat::detect(&gz).unwrap(),
            ArchiveFormat::Tar(Compression::Gzip)
        );
        assert_eq!(
            ArchiveFormat::detect(&plain).unwrap(),
            ArchiveFormat::Tar(Compression::None)
        );
        assert_eq!(ArchiveFormat::detect(&zip).unwrap(), ArchiveFormat::Zip);
    }

    #[test]
    fn test_xz_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let xz = temp.path().join("src.tar.xz");
        std::fs::write(&xz, [0xfd, b'7', b'z', b'X', b'Z', 0x00, 0x00]).unwrap();

        assert!(matches!(
            ArchiveFormat::detect(&xz),
            Err(SetupError::UnsupportedCompression { kind: "xz", .. })
        ));
    }

    #[test]
    fn test_extract_tar_bz2() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("icu4c-src.tar.bz2");
        std::fs::write(&archive, tar_bz2_bytes(&[("icu/source/configure", b"#!/bin/sh\n")]))
            .unwrap();

        assert_eq!(
            ArchiveFormat::detect(&archive).unwrap(),
            ArchiveFormat::Tar(Compression::Bzip2)
        );
        extract_archive(&archive, temp.path()).unwrap();

        assert_eq!(
            std::fs::read(temp.path().join("icu/source/configure")).unwrap(),
            b"#!/bin/sh\n"
        );
    }

    #[test]
    fn test_missing_archive_names_the_path() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("absent.tgz");

        let err = OpenArchive::open(&archive).err().unwrap();

        assert!(matches!(err, SetupError::File { ref path, .. } if *path == archive));
        assert!(err.to_string().contains("absent.tgz"));
    }

    #[test]
    fn test_unpack_creates_destination() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("qt.tar.gz");
        std::fs::write(&archive, tar_gz_bytes(&[("qt/configure", b"")])).unwrap();
        let destination = temp.path().join("nested/out");

        OpenArchive::open(&archive).unwrap().unpack(&destination).unwrap();

        assert!(destination.join("qt/configure").is_file());
    }

    #[test]
    fn test_extract_tar_gz() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("qt.tar.gz");
        std::fs::write(
            &archive,
            tar_gz_bytes(&[("qt/configure", b"#!/bin/sh\n"), ("qt/qtbase/README", b"qtbase")]),
        )
        .unwrap();

        extract_archive(&archive, temp.path()).unwrap();

        assert_eq!(
            std::fs::read(temp.path().join("qt/qtbase/README")).unwrap(),
            b"qtbase"
        );
        assert!(temp.path().join("qt/configure").is_file());
    }

    #[test]
    fn test_extract_zip() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("icu.zip");
        std::fs::write(
            &archive,
            zip_bytes(&[("icu/include/unicode/utypes.h", b"#pragma once"), ("icu/lib/icuuc.lib", b"lib")]),
        )
        .unwrap();

        extract_archive(&archive, temp.path()).unwrap();

        assert_eq!(
            std::fs::read(temp.path().join("icu/include/unicode/utypes.h")).unwrap(),
            b"#pragma once"
        );
        assert!(temp.path().join("icu/lib/icuuc.lib").is_file());
    }

    #[test]
    fn test_corrupt_gzip_fails() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("broken.tar.gz");
        // Valid gzip header followed by a reserved deflate block type.
        let mut bytes = tar_gz_bytes(&[("broken/a", b"a")]);
        bytes.truncate(10);
        bytes.extend_from_slice(&[0xff; 32]);
        std::fs::write(&archive, bytes).unwrap();

        assert!(extract_archive(&archive, temp.path()).is_err());
    }

    #[test]
    fn test_corrupt_zip_fails() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("broken.zip");
        std::fs::write(&archive, b"not a zip file at all").unwrap();

        assert!(matches!(
            extract_archive(&archive, temp.path()),
            Err(SetupError::Zip(_))
        ));
    }
}
