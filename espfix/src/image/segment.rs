use deku::prelude::*;

/// Address and payload length preceding every segment payload.
#[derive(Debug, DekuRead, Clone, Copy, PartialEq, Eq)]
#[deku(endian = "little")]
pub struct SegmentHeader {
    pub addr: u32,
    pub len: u32,
}

/// A block of payload bytes loaded at `addr`.
#[derive(Debug, DekuWrite, Clone, PartialEq, Eq)]
#[deku(endian = "little")]
pub struct Segment {
    pub addr: u32,
    #[deku(update = "self.data.len()")]
    len: u32,
    pub data: Vec<u8>,
}

impl Segment {
    pub fn new(addr: u32, data: Vec<u8>) -> Self {
        Segment {
            addr,
            len: data.len() as u32,
            data,
        }
    }

    pub fn size(&self) -> u32 {
        self.data.len() as u32
    }

    pub fn end(&self) -> u32 {
        self.addr.wrapping_add(self.size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_follows_payload() {
        let mut segment = Segment::new(0x3f40_0020, vec![1, 2, 3]);
        segment.data.push(4);
        segment.update().unwrap();
        assert_eq!(
            segment.to_bytes().unwrap(),
            [0x20, 0, 0x40, 0x3f, 4, 0, 0, 0, 1, 2, 3, 4]
        );
        assert_eq!(segment.end(), 0x3f40_0024);
    }

    #[test]
    fn header_layout() {
        let bytes = [0x20, 0, 0x40, 0x3f, 0xf0, 0xff, 0xff, 0xff, 1, 2];
        let ((rest, _), header) = SegmentHeader::from_bytes((&bytes[..], 0)).unwrap();
        assert_eq!(header.addr, 0x3f40_0020);
        assert_eq!(header.len, 0xffff_fff0);
        assert_eq!(rest, &[1, 2][..]);
    }
}
