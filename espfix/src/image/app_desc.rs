use crate::DescriptorError;
use deku::prelude::*;
use std::fmt;

pub const APP_DESC_MAGIC_WORD: u32 = 0xABCD_5432;

/// Application description record (`esp_app_desc_t`) placed by the build at
/// the start of the first `DROM` segment.
#[derive(Debug, DekuRead, Clone, PartialEq, Eq)]
#[deku(endian = "little")]
pub struct AppDesc {
    // 0
    pub magic_word: u32,
    pub secure_version: u32,
    // 8
    _reserv1: [u32; 2],
    // 16
    version: [u8; 32],
    // 48
    project_name: [u8; 32],
    // 80
    time: [u8; 16],
    // 96
    date: [u8; 16],
    // 112
    idf_ver: [u8; 32],
    // 144
    pub app_elf_sha256: [u8; 32],
    // 176
    _reserv2: [u32; 20],
}

fn c_str(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

impl AppDesc {
    pub const SIZE: usize = 256;

    /// Decodes the descriptor from the leading bytes of the segment loaded at `addr`.
    pub fn decode(addr: u32, data: &[u8]) -> Result<Self, DescriptorError> {
        if data.len() < Self::SIZE {
            return Err(DescriptorError::TooShort {
                addr,
                len: data.len(),
            });
        }
        let (_, desc) = AppDesc::from_bytes((&data[..Self::SIZE], 0))?;
        Ok(desc)
    }

    pub fn is_valid(&self) -> bool {
        self.magic_word == APP_DESC_MAGIC_WORD
    }

    pub fn version(&self) -> String {
        c_str(&self.version)
    }

    pub fn project_name(&self) -> String {
        c_str(&self.project_name)
    }

    pub fn time(&self) -> String {
        c_str(&self.time)
    }

    pub fn date(&self) -> String {
        c_str(&self.date)
    }

    pub fn idf_ver(&self) -> String {
        c_str(&self.idf_ver)
    }
}

impl fmt::Display for AppDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "project: {}, version: {}, secure version: {}, compiled: {} {}, IDF: {}, ELF sha256: ",
            self.project_name(),
            self.version(),
            self.secure_version,
            self.date(),
            self.time(),
            self.idf_ver(),
        )?;
        for b in &self.app_elf_sha256 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}
