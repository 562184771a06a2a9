use super::header::{ExtendedHeader, ImageHeader, ESP_IMAGE_MAGIC, MAX_SEGMENTS};
use super::segment::{Segment, SegmentHeader};
use crate::{chip::ChipProfile, Error, ParseError};
use deku::prelude::*;
use sha2::{Digest, Sha256};

/// Seed of the one-byte XOR checksum over all segment payloads.
pub const ESP_CHECKSUM_MAGIC: u8 = 0xEF;
pub const DIGEST_LEN: usize = 32;

/// Revision of the image layout; ESP32-family chips use the v1 layout with an
/// extended header.
pub const IMAGE_VERSION: u32 = 1;

/// A parsed application image.
#[derive(Debug, Clone)]
pub struct FirmwareImage {
    header: ImageHeader,
    ext_header: ExtendedHeader,
    segments: Vec<Segment>,
    stored_checksum: u8,
    /// Whether the appended digest matches the bytes it covers in the parsed file.
    digest_valid: Option<bool>,
    size: usize,
}

fn read_struct<'a, T>(data: &'a [u8], offset: usize, what: &'static str) -> Result<(usize, T), ParseError>
where
    T: DekuContainerRead<'a>,
{
    let input = data
        .get(offset..)
        .ok_or(ParseError::Truncated { what, offset })?;
    let ((rest, _), value) = T::from_bytes((input, 0)).map_err(|e| match e {
        DekuError::Incomplete(_) => ParseError::Truncated { what, offset },
        source => ParseError::Malformed { what, source },
    })?;
    Ok((data.len() - rest.len(), value))
}

/// Zero bytes needed after `pos` so the checksum byte ends a 16 byte block.
fn checksum_padding(pos: usize) -> usize {
    15 - (pos % 16)
}

fn calc_checksum<'a>(segments: impl Iterator<Item = &'a Segment>) -> u8 {
    segments
        .flat_map(|segment| segment.data.iter())
        .fold(ESP_CHECKSUM_MAGIC, |acc, b| acc ^ b)
}

impl FirmwareImage {
    pub fn parse(profile: &ChipProfile, data: &[u8]) -> Result<Self, ParseError> {
        if data.is_empty() {
            return Err(ParseError::Empty);
        }

        let (pos, header) = read_struct::<ImageHeader>(data, 0, "image header")?;
        if header.magic != ESP_IMAGE_MAGIC {
            return Err(ParseError::InvalidMagic(header.magic));
        }
        if header.segment_count > MAX_SEGMENTS {
            return Err(ParseError::TooManySegments(header.segment_count));
        }

        let (mut pos, ext_header) = read_struct::<ExtendedHeader>(data, pos, "extended header")?;
        if ext_header.chip_id != profile.image_chip_id {
            return Err(ParseError::ChipMismatch {
                chip: profile.name,
                expected: profile.image_chip_id,
                found: ext_header.chip_id,
            });
        }
        if ext_header.hash_appended > 1 {
            return Err(ParseError::InvalidHashFlag(ext_header.hash_appended));
        }

        let mut segments = Vec::with_capacity(header.segment_count as usize);
        for _ in 0..header.segment_count {
            let (start, seg) = read_struct::<SegmentHeader>(data, pos, "segment")?;
            let end = start
                .checked_add(seg.len as usize)
                .filter(|&end| end <= data.len())
                .ok_or(ParseError::Truncated {
                    what: "segment",
                    offset: pos,
                })?;
            log::trace!(
                "segment at {:#x}: addr {:#010x} size {:#x}",
                pos,
                seg.addr,
                seg.len
            );
            segments.push(Segment::new(seg.addr, data[start..end].to_vec()));
            pos = end;
        }

        pos += checksum_padding(pos);
        let stored_checksum = *data.get(pos).ok_or(ParseError::Truncated {
            what: "checksum",
            offset: pos,
        })?;
        pos += 1;

        let digest_valid = if ext_header.hash_appended == 1 {
            let stored = data.get(pos..pos + DIGEST_LEN).ok_or(ParseError::Truncated {
                what: "digest",
                offset: pos,
            })?;
            let calculated = Sha256::digest(&data[..pos]);
            pos += DIGEST_LEN;
            Some(stored == &calculated[..])
        } else {
            None
        };

        Ok(FirmwareImage {
            header,
            ext_header,
            segments,
            stored_checksum,
            digest_valid,
            size: pos,
        })
    }

    pub fn version(&self) -> u32 {
        IMAGE_VERSION
    }

    /// Bytes the image format accounts for, which may be less than the file it came from.
    pub fn image_size(&self) -> usize {
        self.size
    }

    pub fn header(&self) -> &ImageHeader {
        &self.header
    }

    pub fn extended_header(&self) -> &ExtendedHeader {
        &self.ext_header
    }

    pub fn entry(&self) -> u32 {
        self.header.entry
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    pub fn segments_mut(&mut self) -> &mut Vec<Segment> {
        &mut self.segments
    }

    pub fn stored_checksum(&self) -> u8 {
        self.stored_checksum
    }

    pub fn calculate_checksum(&self) -> u8 {
        calc_checksum(self.segments.iter())
    }

    pub fn checksum_valid(&self) -> bool {
        self.stored_checksum == self.calculate_checksum()
    }

    /// `None` when the image carries no digest.
    pub fn digest_valid(&self) -> Option<bool> {
        self.digest_valid
    }

    /// Serializes the image with a fresh segment count, checksum and digest.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        if self.segments.len() > MAX_SEGMENTS as usize {
            return Err(Error::TooManySegments(self.segments.len()));
        }
        let mut header = self.header.clone();
        header.segment_count = self.segments.len() as u8;

        let mut data = header.to_bytes()?;
        data.extend(self.ext_header.to_bytes()?);
        for segment in &self.segments {
            let mut segment = segment.clone();
            segment.update()?;
            data.extend(segment.to_bytes()?);
        }

        let padding = checksum_padding(data.len());
        data.resize(data.len() + padding, 0);
        data.push(self.calculate_checksum());

        if self.ext_header.hash_appended == 1 {
            let digest = Sha256::digest(&data);
            data.extend_from_slice(&digest);
        }

        Ok(data)
    }
}
