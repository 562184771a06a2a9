use crate::{
    chip::{ChipProfile, APP_DESC_REGION},
    image::{AppDesc, FirmwareImage},
    DescriptorError, Error, ReconciliationError,
};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const FIXED_SUFFIX: &str = ".fixed";

/// Descriptor decoded from one segment of the app descriptor region.
#[derive(Debug)]
pub struct Inspection {
    pub addr: u32,
    pub desc: Result<AppDesc, DescriptorError>,
}

/// Decodes and logs the app descriptor of every segment in `DROM`.
///
/// Failures stay local to their segment.
pub fn inspect(profile: &ChipProfile, image: &FirmwareImage) -> Vec<Inspection> {
    image
        .segments()
        .filter(|segment| profile.is_in_region(segment.addr, APP_DESC_REGION))
        .map(|segment| {
            let desc = AppDesc::decode(segment.addr, &segment.data);
            match &desc {
                Ok(desc) => {
                    if !desc.is_valid() {
                        log::warn!(
                            "App descriptor at {:#010x} has magic word {:#010x}",
                            segment.addr,
                            desc.magic_word
                        );
                    }
                    log::info!("App data: {}", desc);
                }
                Err(e) => log::warn!("Skip app descriptor: {}", e),
            }
            Inspection {
                addr: segment.addr,
                desc,
            }
        })
        .collect()
}

/// Appends the bytes of `original` beyond the serialized length.
pub fn reconcile(mut serialized: Vec<u8>, original: &[u8]) -> Result<Vec<u8>, ReconciliationError> {
    let n = serialized.len();
    if n > original.len() {
        return Err(ReconciliationError {
            serialized: n,
            original: original.len(),
        });
    }
    serialized.extend_from_slice(&original[n..]);
    Ok(serialized)
}

fn log_image(profile: &ChipProfile, image: &FirmwareImage) {
    log::info!("Image version: {}", image.version());
    log::info!("real partition size: {}", image.image_size());
    log::info!("Entry point: {:#010x}", image.entry());
    for (i, segment) in image.segments().enumerate() {
        let region = profile
            .memory_map
            .region_of(segment.addr)
            .map(|r| r.name.as_str())
            .unwrap_or("?");
        log::debug!(
            "Segment {}: {:#010x}..{:#010x} size {:#07x} [{}]",
            i,
            segment.addr,
            segment.end(),
            segment.size(),
            region
        );
    }

    let calculated = image.calculate_checksum();
    if image.checksum_valid() {
        log::info!("Checksum: {:02x} (valid)", calculated);
    } else {
        log::warn!(
            "Checksum: {:02x} (invalid, calculated {:02x})",
            image.stored_checksum(),
            calculated
        );
    }
    match image.digest_valid() {
        Some(true) => log::info!("Validation hash: valid"),
        Some(false) => log::warn!("Validation hash: invalid"),
        None => log::debug!("No validation hash appended"),
    }
}

/// Parses `data`, reports it and returns the repaired image.
pub fn fix_image(profile: &ChipProfile, data: &[u8]) -> Result<Vec<u8>, Error> {
    let image = FirmwareImage::parse(profile, data)?;
    log_image(profile, &image);
    inspect(profile, &image);

    let serialized = image.to_bytes()?;
    let output = reconcile(serialized, data)?;
    Ok(output)
}

pub fn fixed_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(FIXED_SUFFIX);
    PathBuf::from(name)
}

/// Repairs the image at `path` into `<path>.fixed`. Nothing is written on error.
pub fn fix_file(profile: &ChipProfile, path: &Path) -> Result<PathBuf, Error> {
    log::info!("Reading partition image file from: {}", path.display());
    let data = fs::read(path)?;

    let output = fix_image(profile, &data)?;
    let fixed = fixed_path(path);
    fs::write(&fixed, &output)?;
    log::info!("Fixed image written to: {}", fixed.display());

    Ok(fixed)
}
