use crate::core::descriptor;
use crate::core::fetcher::Fetcher;
use crate::core::platform::Platform;
use crate::core::transport::{HttpTransport, Transport};
use crate::error::Result;
use std::io::Write;
use std::path::Path;

pub const MANUAL_STEPS: &str = r#"You need to install platform build dependencies by hand. On
Debian-derivatives this means running the following commands:

sudo apt-get install build-essential pkg-config chrpath
sudo apt-get install "^libxcb.*" libx11-xcb-dev libglu1-mesa-dev libxrender-dev libxi-dev
sudo apt-get install flex bison gperf libicu-dev libxslt-dev ruby"#;

/// Fetches every archive for the host (or `platform_override`) into
/// `work_dir` over HTTP and prints the manual follow-up steps.
pub fn run_setup(platform_override: Option<&str>, work_dir: &Path) -> Result<()> {
    let platform_name = platform_override.unwrap_or(std::env::consts::OS);

    // Building the client does no I/O, so an unknown platform still fails
    // before any request is made.
    let transport = HttpTransport::new()?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    setup_with(platform_name, work_dir, transport, &mut out)
}

pub(crate) fn setup_with<T: Transport>(
    platform_name: &str,
    work_dir: &Path,
    transport: T,
    out: &mut dyn Write,
) -> Result<()> {
    let platform = Platform::from_os_name(platform_name)?;
    let descriptors = descriptor::descriptors_for(platform);
    log::info!(
        "Fetching {} archives for {platform} into {}",
        descriptors.len(),
        work_dir.display()
    );

    let fetcher = Fetcher::new(transport, work_dir);
    fetcher.fetch_all(&descriptors, out)?;

    writeln!(out, "{MANUAL_STEPS}")?;
    Ok(())
}
