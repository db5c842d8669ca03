use super::archive::OpenArchive;
use super::descriptor::Descriptor;
use super::transport::Transport;
use crate::error::{Result, SetupError};
use crate::utils::fs;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Downloads and unpacks descriptors into a single working directory.
pub struct Fetcher<T: Transport> {
    transport: T,
    work_dir: PathBuf,
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            transport,
            work_dir: work_dir.into(),
        }
    }

    /// Processes every descriptor in order, stopping at the first failure.
    /// Artifacts of descriptors that already succeeded are left in place.
    pub fn fetch_all(&self, descriptors: &[Descriptor], out: &mut dyn Write) -> Result<()> {
        fs::ensure_dir_exists(&self.work_dir).map_err(|e| SetupError::file(&self.work_dir, e))?;

        for descriptor in descriptors {
            self.fetch(descriptor, out)?;
        }
        Ok(())
    }

    pub fn fetch(&self, descriptor: &Descriptor, out: &mut dyn Write) -> Result<()> {
        let archive_path = self.work_dir.join(descriptor.archive);
        let extract_dir = self.work_dir.join(descriptor.directory);

        fs::remove_file_if_exists(&archive_path);

        writeln!(out, "Downloading {}", descriptor.url)?;
        self.download(descriptor.url, &archive_path)?;

        fs::remove_dir_if_exists(&extract_dir);

        let opened = OpenArchive::open(&archive_path)?;
        writeln!(out, "Extracting {}", descriptor.archive)?;
        opened.unpack(&self.work_dir)
    }

    fn download(&self, url: &str, archive_path: &Path) -> Result<()> {
        let file = File::create(archive_path).map_err(|e| SetupError::file(archive_path, e))?;
        let mut file = BufWriter::new(file);
        let written = self.transport.fetch(url, &mut file)?;
        file.flush().map_err(|e| SetupError::file(archive_path, e))?;
        log::debug!("Saved {written} bytes to {}", archive_path.display());
        Ok(())
    }
}
