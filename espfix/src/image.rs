mod app_desc;
mod firmware;
mod header;
mod segment;

pub use app_desc::{AppDesc, APP_DESC_MAGIC_WORD};
pub use firmware::{FirmwareImage, DIGEST_LEN, ESP_CHECKSUM_MAGIC, IMAGE_VERSION};
pub use header::{ExtendedHeader, ImageHeader, ESP_IMAGE_MAGIC, MAX_SEGMENTS};
pub use segment::{Segment, SegmentHeader};

#[cfg(test)]
pub(crate) use app_desc::tests::app_desc_bytes;
#[cfg(test)]
pub(crate) use firmware::tests::build_image;
