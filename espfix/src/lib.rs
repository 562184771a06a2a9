pub mod chip;
mod error;
pub mod fix;
pub mod image;

pub use error::{DescriptorError, Error, ParseError, ReconciliationError};
pub use fix::{fix_file, fix_image, inspect, reconcile};
pub use image::FirmwareImage;
