//! Firmware image loading for the command line front end. The encoder
//! itself never touches the filesystem.

use std::fs;
use std::path::Path;

use ihex::{Reader, Record};
use log::debug;

use crate::error::{Error, Result};

/// Byte used to fill gaps between Intel HEX data records.
pub const DEFAULT_GAP_FILL: u8 = 0xFF;

// A stray record far away from the rest would otherwise ask for a
// multi-gigabyte allocation.
const MAX_HEX_SPAN: u64 = 256 * 1024 * 1024;

/// A firmware image read from disk.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub data: Vec<u8>,
    /// Lowest address seen in an Intel HEX file; `None` for raw images.
    pub start_address: Option<u32>,
}

/// Reads `path` as Intel HEX when its extension is `hex` or `ihex`,
/// otherwise as a raw binary image.
pub fn load_image(path: &Path, gap_fill: u8) -> Result<LoadedImage> {
    let is_hex = path.extension().is_some_and(|ext| {
        ext.eq_ignore_ascii_case("hex") || ext.eq_ignore_ascii_case("ihex")
    });

    if is_hex {
        let text = fs::read_to_string(path)?;
        parse_hex_image(&text, gap_fill)
    } else {
        Ok(LoadedImage {
            data: fs::read(path)?,
            start_address: None,
        })
    }
}

/// Flattens Intel HEX records into one contiguous image. Gaps between
/// records are filled with `gap_fill`; where records overlap, the later
/// one wins.
pub fn parse_hex_image(text: &str, gap_fill: u8) -> Result<LoadedImage> {
    let mut upper: u32 = 0;
    let mut chunks: Vec<(u32, Vec<u8>)> = Vec::new();

    for record in Reader::new(text) {
        match record? {
            Record::Data { offset, value } => {
                chunks.push((upper.wrapping_add(offset as u32), value));
            }
            Record::ExtendedLinearAddress(high) => upper = (high as u32) << 16,
            Record::ExtendedSegmentAddress(segment) => upper = (segment as u32) << 4,
            Record::EndOfFile => break,
            _ => {}
        }
    }

    if chunks.is_empty() {
        return Ok(LoadedImage {
            data: Vec::new(),
            start_address: None,
        });
    }

    let start = chunks
        .iter()
        .map(|(address, _)| *address)
        .min()
        .unwrap_or(0);
    let end = chunks
        .iter()
        .map(|(address, value)| *address as u64 + value.len() as u64)
        .max()
        .unwrap_or(start as u64);

    let span = end - start as u64;
    if span > MAX_HEX_SPAN {
        return Err(Error::HexSpanTooLarge(span));
    }

    let mut data = vec![gap_fill; span as usize];
    for (address, value) in &chunks {
        let offset = (address - start) as usize;
        data[offset..offset + value.len()].copy_from_slice(value);
    }

    debug!(
        "flattened {} hex records into {} bytes starting at {:#010x}",
        chunks.len(),
        data.len(),
        start
    );
    Ok(LoadedImage {
        data,
        start_address: Some(start),
    })
}
