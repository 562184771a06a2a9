use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    #[error("Failed to parse image: {0}")]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
    #[error(transparent)]
    Reconciliation(#[from] ReconciliationError),
    #[error("cannot serialize {0} segments (max 16)")]
    TooManySegments(usize),
    #[error("chip not supported: {0}")]
    UnsupportedChip(String),
    #[error("invalid memory map: {0}")]
    Config(String),
    #[error("Parse toml error")]
    TomlError(#[from] toml::de::Error),
    #[error("Encode error: {0}")]
    Codec(#[from] deku::error::DekuError),
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("image is empty")]
    Empty,
    #[error("end of file reading {what} at offset {offset:#x}")]
    Truncated { what: &'static str, offset: usize },
    #[error("invalid firmware image magic={0:#04x}")]
    InvalidMagic(u8),
    #[error("invalid segment count {0} (max 16), usually a linker script problem")]
    TooManySegments(u8),
    #[error("unexpected chip id {found} in image, expected {expected} for {chip}")]
    ChipMismatch {
        chip: &'static str,
        expected: u16,
        found: u16,
    },
    #[error("invalid value for hash appended field ({0:#04x}), should be 0 or 1")]
    InvalidHashFlag(u8),
    #[error("malformed {what}: {source}")]
    Malformed {
        what: &'static str,
        source: deku::error::DekuError,
    },
}

#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("segment at {addr:#010x} is {len} bytes, too short for an app descriptor")]
    TooShort { addr: u32, len: usize },
    #[error("malformed app descriptor: {0}")]
    Malformed(#[from] deku::error::DekuError),
}

#[derive(Error, Debug)]
#[error("re-serialized image is {serialized} bytes, larger than the original {original} bytes")]
pub struct ReconciliationError {
    pub serialized: usize,
    pub original: usize,
}
