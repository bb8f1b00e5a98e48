//! Target descriptor strings in the `@name  /0xADDR/NN*SSSKg` form that
//! DfuSe bootloaders parse out of the target name to learn the flash
//! geometry. The trailing `g` marks the blocks readable, erasable and
//! writable.

use crate::error::{Error, Result};

mod presets;

pub use self::presets::{find_preset, Preset, PRESETS};

/// One run of equally sized flash blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemorySegment {
    /// Number of blocks in the run.
    pub count: u32,
    /// Block size in bytes; must be a multiple of 1024.
    pub size: u32,
}

impl MemorySegment {
    pub const fn new(count: u32, size: u32) -> Self {
        Self { count, size }
    }

    fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(Error::ZeroBlockCount);
        }
        if self.size == 0 {
            return Err(Error::ZeroBlockSize);
        }
        if self.size % 1024 != 0 {
            return Err(Error::MisalignedBlockSize(self.size));
        }
        Ok(())
    }
}

/// Formats the canonical descriptor string, e.g.
/// `@Flash  /0x08000000/64*002Kg`. The two spaces before the slash are
/// part of the convention.
///
/// All segments are validated before anything is formatted, so a
/// failure never yields partial output.
pub fn format_descriptor(
    label: &str,
    base_address: u32,
    segments: &[MemorySegment],
) -> Result<String> {
    if segments.is_empty() {
        return Err(Error::NoSegments);
    }
    for segment in segments {
        segment.validate()?;
    }

    let mut out = format!("@{}  /0x{:08X}/", label, base_address);
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&format!("{:02}*{:03}Kg", segment.count, segment.size / 1024));
    }
    Ok(out)
}

/// Derives the segment list for a uniform flash of `flash_size` bytes
/// split into `page_size` pages.
pub fn segments_from_geometry(flash_size: u32, page_size: u32) -> Result<Vec<MemorySegment>> {
    if flash_size == 0 {
        return Err(Error::ZeroFlashSize);
    }
    if page_size == 0 {
        return Err(Error::ZeroPageSize);
    }
    if flash_size % page_size != 0 {
        return Err(Error::MisalignedFlashSize {
            flash: flash_size,
            page: page_size,
        });
    }
    Ok(vec![MemorySegment::new(flash_size / page_size, page_size)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_single_segment() {
        let descriptor =
            format_descriptor("Flash", 0x0800_0000, &[MemorySegment::new(64, 0x800)]).unwrap();
        assert_eq!(descriptor, "@Flash  /0x08000000/64*002Kg");
    }

    #[test]
    fn formats_multiple_segments() {
        let segments = [
            MemorySegment::new(4, 16 * 1024),
            MemorySegment::new(1, 64 * 1024),
        ];
        let descriptor = format_descriptor("Internal Flash", 0x0800_0000, &segments).unwrap();
        assert_eq!(descriptor, "@Internal Flash  /0x08000000/04*016Kg,01*064Kg");
    }

    #[test]
    fn rejects_zero_block_count() {
        let result = format_descriptor("Flash", 0, &[MemorySegment::new(0, 1024)]);
        assert!(matches!(result, Err(Error::ZeroBlockCount)));
    }

    #[test]
    fn rejects_zero_block_size() {
        let result = format_descriptor("Flash", 0, &[MemorySegment::new(1, 0)]);
        assert!(matches!(result, Err(Error::ZeroBlockSize)));
    }

    #[test]
    fn rejects_unaligned_block_size() {
        let result = format_descriptor("Flash", 0, &[MemorySegment::new(1, 1000)]);
        assert!(matches!(result, Err(Error::MisalignedBlockSize(1000))));
    }

    #[test]
    fn rejects_empty_segment_list() {
        let result = format_descriptor("Flash", 0, &[]);
        assert!(matches!(result, Err(Error::NoSegments)));
    }

    #[test]
    fn geometry_produces_one_uniform_segment() {
        let segments = segments_from_geometry(128 * 1024, 2048).unwrap();
        assert_eq!(segments, vec![MemorySegment::new(64, 2048)]);
    }

    #[test]
    fn geometry_rejects_bad_parameters() {
        assert!(matches!(
            segments_from_geometry(0, 2048),
            Err(Error::ZeroFlashSize)
        ));
        assert!(matches!(
            segments_from_geometry(4096, 0),
            Err(Error::ZeroPageSize)
        ));
        assert!(matches!(
            segments_from_geometry(5000, 2048),
            Err(Error::MisalignedFlashSize {
                flash: 5000,
                page: 2048
            })
        ));
    }
}
