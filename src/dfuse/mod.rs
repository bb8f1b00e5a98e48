//! DfuSe container encoding.
//!
//! A container is the concatenation of a file prefix, one target header,
//! one image element and a 16-byte suffix. All integer fields are
//! little-endian. The suffix CRC32 covers every byte that precedes it,
//! including the other suffix fields.

use bytes::{BufMut, BytesMut};
use log::debug;

use crate::error::{Error, Result};

mod config;
mod types;

pub use self::types::{
    DfuseConfig, SuffixCrc, ELEMENT_HEADER_LEN, PREFIX_LEN, SUFFIX_LEN, TARGET_HEADER_LEN,
    TARGET_NAME_LEN,
};

use self::types::{Element, FilePrefix, Suffix, TargetHeader};

/// Encodes `image` into a complete DfuSe container, suffix included.
pub fn encode(image: &[u8], config: &DfuseConfig) -> Result<Vec<u8>> {
    let body = encode_body(image, config)?;
    let suffix = encode_suffix(config, &body);

    let mut out = Vec::with_capacity(body.len() + suffix.len());
    out.extend_from_slice(&body);
    out.extend_from_slice(&suffix);

    debug!(
        "encoded {} image bytes into a {} byte container at {:#010x}",
        image.len(),
        out.len(),
        config.base_address
    );
    Ok(out)
}

/// Prefix, target header and element; everything except the suffix.
fn encode_body(image: &[u8], config: &DfuseConfig) -> Result<BytesMut> {
    let element_size = ELEMENT_HEADER_LEN as u64 + image.len() as u64;
    let total_size = PREFIX_LEN as u64 + TARGET_HEADER_LEN as u64 + element_size + SUFFIX_LEN as u64;
    let total_size = u32::try_from(total_size).map_err(|_| Error::ImageTooLarge(image.len()))?;

    let prefix = FilePrefix {
        total_size,
        targets: 1,
    };
    let header = TargetHeader {
        alt_setting: 0,
        name: config.target_name.as_deref(),
        element_size: element_size as u32,
        elements: 1,
    };
    let element = Element {
        address: config.base_address,
        data: image,
    };

    let mut body = BytesMut::with_capacity(total_size as usize - SUFFIX_LEN);
    body.extend_from_slice(&prefix.to_bytes());
    body.extend_from_slice(&header.to_bytes());
    body.extend_from_slice(&element.to_bytes());
    Ok(body)
}

/// Builds the 16-byte suffix over the already serialized `body`.
fn encode_suffix(config: &DfuseConfig, body: &[u8]) -> BytesMut {
    let suffix = Suffix {
        device_id: config.device_id,
        product_id: config.product_id,
        vendor_id: config.vendor_id,
        dfu_version: config.dfu_version,
    };
    let mut buf = suffix.to_bytes();

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(body);
    hasher.update(&buf);
    let crc = match config.suffix_crc {
        SuffixCrc::Complemented => hasher.finalize(),
        SuffixCrc::Raw => !hasher.finalize(),
    };
    buf.put_u32_le(crc);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DfuseConfig {
        DfuseConfig::new().with_target_name("Firmware")
    }

    fn stored_u32(file: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(file[offset..offset + 4].try_into().unwrap())
    }

    fn stored_u16(file: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes(file[offset..offset + 2].try_into().unwrap())
    }

    #[test]
    fn total_size_tracks_image_length() {
        let image = [0xA5u8; 100];
        let file = encode(&image, &config()).unwrap();
        assert_eq!(file.len(), 306 + 100);
        assert_eq!(stored_u32(&file, 6) as usize, file.len());
    }

    #[test]
    fn empty_image_is_legal_and_minimal() {
        let file = encode(&[], &config()).unwrap();
        assert_eq!(file.len(), 306);
        assert_eq!(stored_u32(&file, 6), 306);
        assert_eq!(stored_u32(&file, 274), 8); // element size
        assert_eq!(stored_u32(&file, 286), 0); // image length
    }

    #[test]
    fn fixed_fields_are_in_place() {
        let image = [1u8, 2, 3, 4];
        let file = encode(&image, &config().with_base_address(0x0800_4000)).unwrap();
        assert_eq!(&file[0..5], b"DfuSe");
        assert_eq!(file[5], 0x01);
        assert_eq!(file[10], 1); // target count
        assert_eq!(&file[11..17], b"Target");
        assert_eq!(file[17], 0); // alt setting
        assert_eq!(file[18], 1); // named flag
        assert_eq!(stored_u32(&file, 274), 8 + 4);
        assert_eq!(stored_u32(&file, 278), 1); // element count
        assert_eq!(stored_u32(&file, 282), 0x0800_4000);
        assert_eq!(stored_u32(&file, 286), 4);
        assert_eq!(&file[290..294], &[1, 2, 3, 4]);
        assert_eq!(&file[298 + 4..301 + 4], b"UFD");
        assert_eq!(file[301 + 4], 16);
    }

    #[test]
    fn suffix_identifiers_are_stored_little_endian() {
        let cfg = config()
            .with_vendor_id(0x1209)
            .with_product_id(0x2444)
            .with_device_id(0x0100)
            .with_dfu_version(0x011A);
        let file = encode(&[9u8; 2], &cfg).unwrap();
        let n = 2;
        assert_eq!(stored_u16(&file, 290 + n), 0x0100); // device release
        assert_eq!(stored_u16(&file, 292 + n), 0x2444); // product
        assert_eq!(stored_u16(&file, 294 + n), 0x1209); // vendor
        assert_eq!(stored_u16(&file, 296 + n), 0x011A); // bcdDFU
    }

    #[test]
    fn long_names_are_truncated_silently() {
        let name = "A".repeat(300);
        let file = encode(&[], &config().with_target_name(name)).unwrap();
        assert_eq!(file[18], 1);
        assert!(file[19..274].iter().all(|&b| b == b'A'));
        assert_eq!(file.len(), 306);
    }

    #[test]
    fn unnamed_target_has_zeroed_name_field() {
        let file = encode(&[0xEE], &DfuseConfig::new()).unwrap();
        assert_eq!(file[18], 0);
        assert!(file[19..274].iter().all(|&b| b == 0));
    }

    #[test]
    fn encoding_is_deterministic() {
        let image = [0x5Au8; 33];
        let first = encode(&image, &config()).unwrap();
        let second = encode(&image, &config()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn crc_covers_everything_before_it() {
        let file = encode(&[7u8; 16], &config()).unwrap();
        let crc_offset = file.len() - 4;

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&file[..crc_offset]);
        assert_eq!(stored_u32(&file, crc_offset), hasher.finalize());
    }

    #[test]
    fn crc_reacts_to_covered_bytes_only() {
        let image = [7u8; 16];
        let baseline = encode(&image, &config()).unwrap();
        let crc_offset = baseline.len() - 4;
        let baseline_crc = stored_u32(&baseline, crc_offset);

        // The device id lives in the covered 12 suffix bytes.
        let other = encode(&image, &config().with_device_id(0x0001)).unwrap();
        assert_ne!(baseline_crc, stored_u32(&other, crc_offset));

        // So does every image byte.
        let mut patched = image;
        patched[3] ^= 0xFF;
        let third = encode(&patched, &config()).unwrap();
        assert_ne!(baseline_crc, stored_u32(&third, crc_offset));
    }

    #[test]
    fn raw_crc_is_the_complement_of_the_default() {
        let image = [3u8; 8];
        let complemented = encode(&image, &config()).unwrap();
        let raw = encode(&image, &config().with_suffix_crc(SuffixCrc::Raw)).unwrap();
        let crc_offset = complemented.len() - 4;
        assert_eq!(complemented[..crc_offset], raw[..crc_offset]);
        assert_eq!(
            stored_u32(&complemented, crc_offset),
            !stored_u32(&raw, crc_offset)
        );
    }
}
