use super::{format_descriptor, MemorySegment};
use crate::error::Result;

/// Fixed flash layout for a known chip family.
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub key: &'static str,
    pub label: &'static str,
    pub base_address: u32,
    pub segments: &'static [MemorySegment],
}

impl Preset {
    /// Renders the preset as a target descriptor string.
    pub fn descriptor(&self) -> Result<String> {
        format_descriptor(self.label, self.base_address, self.segments)
    }
}

pub const PRESETS: &[Preset] = &[
    Preset {
        key: "stm32f072",
        label: "Internal Flash",
        base_address: 0x0800_0000,
        segments: &[MemorySegment::new(64, 2048)],
    },
    Preset {
        key: "stm32f103",
        label: "Internal Flash",
        base_address: 0x0800_0000,
        segments: &[MemorySegment::new(128, 1024)],
    },
    Preset {
        key: "stm32f303",
        label: "Internal Flash",
        base_address: 0x0800_0000,
        segments: &[MemorySegment::new(128, 2048)],
    },
    Preset {
        key: "gd32f303",
        label: "Internal Flash",
        base_address: 0x0800_0000,
        segments: &[MemorySegment::new(128, 2048)],
    },
];

/// Looks up a preset by key, case-insensitively.
pub fn find_preset(key: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|preset| preset.key.eq_ignore_ascii_case(key))
}
