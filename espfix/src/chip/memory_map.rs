use crate::Error;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Read,
    Write,
    Execute,
}

/// One named address range, `start` inclusive and `end` exclusive.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Region {
    pub name: String,
    pub start: u32,
    pub end: u32,
    #[serde(default)]
    pub access: Vec<Access>,
}

impl Region {
    pub fn contains(&self, addr: u32) -> bool {
        self.start <= addr && addr < self.end
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct MemoryMap {
    #[serde(rename = "region", default)]
    pub regions: Vec<Region>,
}

impl MemoryMap {
    pub fn from_slice(cfg: &[u8]) -> Result<Self, Error> {
        let map: MemoryMap = toml::from_slice(cfg)?;
        if let Some(region) = map.regions.iter().find(|r| r.start >= r.end) {
            return Err(Error::Config(format!(
                "region {} has start {:#010x} not below end {:#010x}",
                region.name, region.start, region.end
            )));
        }
        Ok(map)
    }

    /// Several entries may share a name, any of them containing `addr` is a match.
    pub fn contains(&self, addr: u32, name: &str) -> bool {
        self.regions
            .iter()
            .any(|region| region.name == name && region.contains(addr))
    }

    pub fn region_of(&self, addr: u32) -> Option<&Region> {
        self.regions.iter().find(|region| region.contains(addr))
    }
}
