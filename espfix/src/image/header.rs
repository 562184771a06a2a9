use deku::prelude::*;

pub const ESP_IMAGE_MAGIC: u8 = 0xE9;
pub const MAX_SEGMENTS: u8 = 16;

#[derive(Debug, DekuRead, DekuWrite, Clone, PartialEq, Eq)]
#[deku(endian = "little")]
pub struct ImageHeader {
    // 0
    pub magic: u8,
    pub segment_count: u8,
    pub flash_mode: u8,
    /// Flash size in the high nibble, flash frequency in the low one.
    pub flash_size_freq: u8,
    // 4
    pub entry: u32,
}

impl ImageHeader {
    pub fn flash_size(&self) -> u8 {
        self.flash_size_freq >> 4
    }

    pub fn flash_freq(&self) -> u8 {
        self.flash_size_freq & 0x0f
    }
}

#[derive(Debug, DekuRead, DekuWrite, Clone, PartialEq, Eq)]
#[deku(endian = "little")]
pub struct ExtendedHeader {
    // 8
    pub wp_pin: u8,
    pub spi_pin_drv: [u8; 3],
    // 12
    pub chip_id: u16,
    pub min_chip_rev: u8,
    // 15
    pub min_chip_rev_full: u16,
    pub max_chip_rev_full: u16,
    // 19
    pub reserved: [u8; 4],
    // 23
    pub hash_appended: u8,
}

impl ExtendedHeader {
    pub const SIZE: usize = 16;
}
