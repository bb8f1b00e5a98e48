//! DfuSe Firmware Packaging Library
//!
//! This library wraps a raw firmware image into a DfuSe (`.dfu`)
//! container as consumed by STM32-family USB bootloaders: a `DfuSe`
//! file prefix, a single target with a single image element, and the
//! mandatory 16-byte suffix carrying the device identifiers and a
//! CRC32 checksum.
//!
//! # Features
//! - Byte-exact DfuSe v1.1a container encoding
//! - Named, unnamed and address-map target descriptors
//! - Built-in memory layout presets for common chip families
//! - Raw binary and Intel HEX image loading
//! - Selectable suffix CRC convention
//!
//! # Examples
//!
//! ## Packaging an image
//! ```no_run
//! use dfuse_pack::DfuseConfig;
//!
//! fn main() -> dfuse_pack::Result<()> {
//!     let image = std::fs::read("firmware.bin")?;
//!     let config = DfuseConfig::new()
//!         .with_base_address(0x0800_0000)
//!         .with_target_name("Firmware");
//!
//!     let container = dfuse_pack::build_container(&image, &config)?;
//!     std::fs::write("firmware.dfu", container)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Address-map descriptors
//! ```
//! use dfuse_pack::{format_descriptor, MemorySegment};
//!
//! fn main() -> dfuse_pack::Result<()> {
//!     let descriptor =
//!         format_descriptor("Flash", 0x0800_0000, &[MemorySegment::new(64, 2048)])?;
//!     assert_eq!(descriptor, "@Flash  /0x08000000/64*002Kg");
//!     Ok(())
//! }
//! ```

mod descriptor;
mod dfuse;
mod error;
mod image;

pub use descriptor::{
    find_preset, format_descriptor, segments_from_geometry, MemorySegment, Preset, PRESETS,
};
pub use dfuse::{
    encode, DfuseConfig, SuffixCrc, ELEMENT_HEADER_LEN, PREFIX_LEN, SUFFIX_LEN, TARGET_HEADER_LEN,
    TARGET_NAME_LEN,
};
pub use error::{Error, Result};
pub use image::{load_image, parse_hex_image, LoadedImage, DEFAULT_GAP_FILL};

/// Wraps `image` into a DfuSe container and returns the binary payload
pub fn build_container(image: &[u8], config: &DfuseConfig) -> Result<Vec<u8>> {
    dfuse::encode(image, config)
}

/// Creates a new packaging configuration with default settings
pub fn new_config() -> DfuseConfig {
    DfuseConfig::new()
}
