use super::Chip;

pub const DEFAULT_MEMORY_MAP: &[u8] = include_bytes!("cfg/memory_map.toml");

#[derive(Copy, Clone, Debug)]
pub struct Esp32s2;

impl Chip for Esp32s2 {
    fn name(&self) -> &'static str {
        "ESP32-S2"
    }

    fn image_chip_id(&self) -> u16 {
        2
    }

    fn default_memory_map(&self) -> &'static [u8] {
        DEFAULT_MEMORY_MAP
    }
}
