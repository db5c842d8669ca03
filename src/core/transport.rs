use crate::error::{Result, SetupError};
use reqwest::blocking::{Client, ClientBuilder};
use std::io::Write;
use std::time::Duration;

/// Source of archive bytes. The fetcher only ever talks to the network
/// through this trait.
pub trait Transport {
    /// Streams the resource at `url` into `dest`, returning the byte count.
    fn fetch(&self, url: &str, dest: &mut dyn Write) -> Result<u64>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn fetch(&self, url: &str, dest: &mut dyn Write) -> Result<u64> {
        (**self).fetch(url, dest)
    }
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        Self::from_builder(Client::builder())
    }

    fn from_builder(builder: ClientBuilder) -> Result<Self> {
        // Source tarballs run to hundreds of megabytes; never time out.
        let client = builder
            .user_agent(concat!("setup-buildenv/", env!("CARGO_PKG_VERSION")))
            .timeout(None::<Duration>)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &str, dest: &mut dyn Write) -> Result<u64> {
        let mut response = self.client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(SetupError::Download {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let written = response.copy_to(dest)?;
        log::debug!("Fetched {written} bytes from {url}");
        Ok(written)
    }
}
