mod esp32;
mod esp32s2;
mod memory_map;

pub use esp32::Esp32;
pub use esp32s2::Esp32s2;
pub use memory_map::{Access, MemoryMap, Region};

use crate::Error;
use std::{fmt, str::FromStr};

/// Region holding the read-only application data, where the app descriptor lives.
pub const APP_DESC_REGION: &str = "DROM";

pub trait Chip {
    fn name(&self) -> &'static str;
    /// Chip id stored in the extended header of images built for this chip.
    fn image_chip_id(&self) -> u16;
    fn default_memory_map(&self) -> &'static [u8];
}

/// The closed set of chips accepted on the command line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChipKind {
    Esp32,
    Esp32s2,
}

impl ChipKind {
    pub const VARIANTS: &'static [&'static str] = &["esp32", "esp32s2"];

    pub fn chip(self) -> &'static dyn Chip {
        match self {
            ChipKind::Esp32 => &Esp32,
            ChipKind::Esp32s2 => &Esp32s2,
        }
    }

    /// Builds the profile with the chip's built-in memory map.
    pub fn profile(self) -> Result<ChipProfile, Error> {
        let chip = self.chip();
        let memory_map = MemoryMap::from_slice(chip.default_memory_map())?;
        Ok(ChipProfile::new(chip, memory_map))
    }
}

impl Default for ChipKind {
    fn default() -> Self {
        ChipKind::Esp32
    }
}

impl FromStr for ChipKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "esp32" => Ok(ChipKind::Esp32),
            "esp32s2" => Ok(ChipKind::Esp32s2),
            _ => Err(Error::UnsupportedChip(s.to_string())),
        }
    }
}

impl fmt::Display for ChipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChipKind::Esp32 => "esp32",
            ChipKind::Esp32s2 => "esp32s2",
        })
    }
}

/// Everything the image pipeline needs to know about the target chip.
#[derive(Clone, Debug)]
pub struct ChipProfile {
    pub name: &'static str,
    pub image_chip_id: u16,
    pub memory_map: MemoryMap,
}

impl ChipProfile {
    pub fn new(chip: &dyn Chip, memory_map: MemoryMap) -> Self {
        ChipProfile {
            name: chip.name(),
            image_chip_id: chip.image_chip_id(),
            memory_map,
        }
    }

    pub fn is_in_region(&self, addr: u32, region: &str) -> bool {
        self.memory_map.contains(addr, region)
    }
}
