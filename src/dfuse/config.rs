use super::types::{DfuseConfig, SuffixCrc};

impl Default for DfuseConfig {
    fn default() -> Self {
        Self {
            base_address: 0x0800_0000,
            target_name: None,
            vendor_id: 0x0483,
            product_id: 0xDF11,
            device_id: 0xFFFF,
            dfu_version: 0x011A,
            suffix_crc: SuffixCrc::Complemented,
        }
    }
}

impl DfuseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_address(mut self, address: u32) -> Self {
        self.base_address = address;
        self
    }

    pub fn with_target_name(mut self, name: impl Into<String>) -> Self {
        self.target_name = Some(name.into());
        self
    }

    /// Emits an unnamed target: named flag 0, all-zero name field.
    pub fn unnamed(mut self) -> Self {
        self.target_name = None;
        self
    }

    pub fn with_vendor_id(mut self, id: u16) -> Self {
        self.vendor_id = id;
        self
    }

    pub fn with_product_id(mut self, id: u16) -> Self {
        self.product_id = id;
        self
    }

    pub fn with_device_id(mut self, id: u16) -> Self {
        self.device_id = id;
        self
    }

    pub fn with_dfu_version(mut self, version: u16) -> Self {
        self.dfu_version = version;
        self
    }

    pub fn with_suffix_crc(mut self, style: SuffixCrc) -> Self {
        self.suffix_crc = style;
        self
    }
}
