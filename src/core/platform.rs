use crate::error::{Result, SetupError};
use std::fmt;

/// Host operating systems the bootstrap knows how to provision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    Windows,
    MacOs,
}

impl Platform {
    /// Maps an OS identifier to a platform. Accepts both the Rust target
    /// spellings (`linux`, `windows`, `macos`) and uname-style names
    /// (`Linux`, `Windows`, `Darwin`), case-insensitively.
    pub fn from_os_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "linux" => Ok(Platform::Linux),
            "windows" => Ok(Platform::Windows),
            "macos" | "darwin" => Ok(Platform::MacOs),
            _ => Err(SetupError::unsupported_platform(name)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Platform::Linux => "Linux",
            Platform::Windows => "Windows",
            Platform::MacOs => "macOS",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
