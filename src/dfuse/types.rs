use bytes::{BufMut, BytesMut};

/// Length of the file prefix in bytes.
pub const PREFIX_LEN: usize = 11;
/// Length of the target header in bytes.
pub const TARGET_HEADER_LEN: usize = 271;
/// Length of the element header (address and size) in bytes.
pub const ELEMENT_HEADER_LEN: usize = 8;
/// Length of the file suffix in bytes.
pub const SUFFIX_LEN: usize = 16;
/// Stored length of the target name field.
pub const TARGET_NAME_LEN: usize = 255;

/// Which CRC32 convention the suffix stores.
///
/// Both appear in the wild and bootloaders accept one or the other,
/// so the choice is an explicit option rather than a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuffixCrc {
    /// Final bitwise complement applied to the running register; the
    /// value common checksum utilities report for the same bytes.
    Complemented,
    /// Uncomplemented register value, as written by ST's reference
    /// packaging tools.
    Raw,
}

/// Parameters for one packaging run.
#[derive(Debug, Clone)]
pub struct DfuseConfig {
    pub base_address: u32,
    /// `None` leaves the 255-byte name field zeroed and clears the
    /// named flag.
    pub target_name: Option<String>,
    pub vendor_id: u16,
    pub product_id: u16,
    pub device_id: u16,
    pub dfu_version: u16,
    pub suffix_crc: SuffixCrc,
}

pub struct FilePrefix {
    pub total_size: u32,
    pub targets: u8,
}

impl FilePrefix {
    pub fn to_bytes(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(PREFIX_LEN);
        buf.extend_from_slice(b"DfuSe");
        buf.put_u8(0x01);
        buf.put_u32_le(self.total_size);
        buf.put_u8(self.targets);
        buf
    }
}

pub struct TargetHeader<'a> {
    pub alt_setting: u8,
    pub name: Option<&'a str>,
    pub element_size: u32,
    pub elements: u32,
}

impl TargetHeader<'_> {
    pub fn to_bytes(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(TARGET_HEADER_LEN);
        buf.extend_from_slice(b"Target");
        buf.put_u8(self.alt_setting);
        buf.put_u8(self.name.is_some() as u8);
        buf.extend_from_slice(&padded_name(self.name.unwrap_or("")));
        buf.put_u32_le(self.element_size);
        buf.put_u32_le(self.elements);
        buf
    }
}

/// Truncates `name` to its first 255 encoded bytes and right-pads with
/// zeroes. Truncation is silent; the name is advisory only.
fn padded_name(name: &str) -> [u8; TARGET_NAME_LEN] {
    let mut field = [0u8; TARGET_NAME_LEN];
    let raw = name.as_bytes();
    let used = raw.len().min(TARGET_NAME_LEN);
    field[..used].copy_from_slice(&raw[..used]);
    field
}

pub struct Element<'a> {
    pub address: u32,
    pub data: &'a [u8],
}

impl Element<'_> {
    /// The data length must fit a `u32`; `encode` checks this before
    /// constructing the element.
    pub fn to_bytes(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(ELEMENT_HEADER_LEN + self.data.len());
        buf.put_u32_le(self.address);
        buf.put_u32_le(self.data.len() as u32);
        buf.extend_from_slice(self.data);
        buf
    }
}

/// The suffix fields preceding the CRC. `to_bytes` emits 12 bytes; the
/// CRC is appended by the suffix generator once it is known, since it
/// covers these very bytes.
pub struct Suffix {
    pub device_id: u16,
    pub product_id: u16,
    pub vendor_id: u16,
    pub dfu_version: u16,
}

impl Suffix {
    pub fn to_bytes(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(SUFFIX_LEN);
        buf.put_u16_le(self.device_id);
        buf.put_u16_le(self.product_id);
        buf.put_u16_le(self.vendor_id);
        buf.put_u16_le(self.dfu_version);
        buf.extend_from_slice(b"UFD");
        buf.put_u8(SUFFIX_LEN as u8);
        buf
    }
}
