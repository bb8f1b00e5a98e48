use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Segment block count must be positive")]
    ZeroBlockCount,

    #[error("Segment block size must be positive")]
    ZeroBlockSize,

    #[error("Segment block size {0} is not a multiple of 1024")]
    MisalignedBlockSize(u32),

    #[error("Descriptor needs at least one memory segment")]
    NoSegments,

    #[error("Flash size must be positive")]
    ZeroFlashSize,

    #[error("Page size must be positive")]
    ZeroPageSize,

    #[error("Flash size {flash:#x} is not a multiple of page size {page:#x}")]
    MisalignedFlashSize { flash: u32, page: u32 },

    #[error("Image size {0} does not fit the 32-bit element length field")]
    ImageTooLarge(usize),

    #[error("Unknown memory layout preset: {0}")]
    UnknownPreset(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Hex file error: {0}")]
    HexFileError(#[from] ihex::ReaderError),

    #[error("Hex records span {0:#x} bytes, refusing to flatten")]
    HexSpanTooLarge(u64),
}

pub type Result<T> = std::result::Result<T, Error>;
