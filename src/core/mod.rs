pub mod archive;
pub mod descriptor;
pub mod fetcher;
pub mod platform;
pub mod transport;
