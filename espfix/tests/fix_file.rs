use espfix::{
    chip::ChipKind,
    fix::{fixed_path, FIXED_SUFFIX},
    fix_file,
    image::{FirmwareImage, APP_DESC_MAGIC_WORD, ESP_CHECKSUM_MAGIC, ESP_IMAGE_MAGIC},
    Error,
};
use pretty_assertions::assert_eq;
use sha2::{Digest, Sha256};
use std::fs;
use tempfile::tempdir;

fn app_desc(project: &str) -> Vec<u8> {
    let mut desc = vec![0u8; 256];
    desc[0..4].copy_from_slice(&APP_DESC_MAGIC_WORD.to_le_bytes());
    desc[48..48 + project.len()].copy_from_slice(project.as_bytes());
    desc
}

fn image(chip_id: u16, segments: &[(u32, Vec<u8>)]) -> Vec<u8> {
    let mut data = vec![ESP_IMAGE_MAGIC, segments.len() as u8, 2, 0x20];
    data.extend_from_slice(&0x4008_0404u32.to_le_bytes());
    data.extend_from_slice(&[0xee, 0, 0, 0]);
    data.extend_from_slice(&chip_id.to_le_bytes());
    data.extend_from_slice(&[0; 9]);
    data.push(1);
    let mut checksum = ESP_CHECKSUM_MAGIC;
    for (addr, payload) in segments {
        data.extend_from_slice(&addr.to_le_bytes());
        data.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        data.extend_from_slice(payload);
        checksum = payload.iter().fold(checksum, |acc, b| acc ^ b);
    }
    while data.len() % 16 != 15 {
        data.push(0);
    }
    data.push(checksum);
    let digest = Sha256::digest(&data);
    data.extend_from_slice(&digest);
    data
}

#[test]
fn writes_fixed_image_next_to_input() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("app.bin");

    let mut data = image(
        2,
        &[
            (0x3f00_0020, app_desc("blink")),
            (0x4008_0000, vec![0x11; 0x40]),
        ],
    );
    let body_len = data.len();
    data.resize(0x400, 0xff);
    // patch one instruction byte
    data[24 + 8 + 256 + 8] = 0x22;
    fs::write(&input, &data).unwrap();

    let profile = ChipKind::Esp32s2.profile().unwrap();
    let output = fix_file(&profile, &input).unwrap();
    assert_eq!(output, dir.path().join(format!("app.bin{}", FIXED_SUFFIX)));

    let fixed = fs::read(&output).unwrap();
    assert_eq!(fixed.len(), 0x400);
    assert_eq!(&fixed[body_len..], &data[body_len..]);
    assert_eq!(fs::read(&input).unwrap(), data);

    let image = FirmwareImage::parse(&profile, &fixed).unwrap();
    assert!(image.checksum_valid());
    assert_eq!(image.digest_valid(), Some(true));
}

#[test]
fn unpatched_image_is_unchanged() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("app.bin");
    let data = image(0, &[(0x3f40_0020, app_desc("hello"))]);
    fs::write(&input, &data).unwrap();

    let profile = ChipKind::Esp32.profile().unwrap();
    let output = fix_file(&profile, &input).unwrap();
    assert_eq!(fs::read(output).unwrap(), data);
}

#[test]
fn wrong_chip_writes_nothing() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("app.bin");
    fs::write(&input, image(2, &[(0x3f00_0020, app_desc("s2"))])).unwrap();

    let profile = ChipKind::Esp32.profile().unwrap();
    let err = fix_file(&profile, &input).unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
    assert!(!fixed_path(&input).exists());
}

#[test]
fn missing_input_is_io_error() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("missing.bin");

    let profile = ChipKind::Esp32.profile().unwrap();
    assert!(matches!(fix_file(&profile, &input), Err(Error::IO(_))));
    assert!(!fixed_path(&input).exists());
}
