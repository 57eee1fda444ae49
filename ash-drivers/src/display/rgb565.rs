//! RGB888 to RGB565 conversion
//!
//! Each channel is truncated (`r >> 3`, `g >> 2`, `b >> 3`) and packed as
//! `rrrrrggg gggbbbbb`. The panel wants one big-endian word per pixel;
//! Linux framebuffers want native little-endian.

/// Word byte order in the output stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    #[default]
    BigEndian,
    LittleEndian,
}

/// Pack one pixel
#[inline]
pub const fn pack(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 >> 3) << 11) | ((g as u16 >> 2) << 5) | (b as u16 >> 3)
}

/// Convert interleaved RGB888 bytes, appending two bytes per pixel to `out`
///
/// Trailing bytes that do not form a whole pixel are ignored.
pub fn encode_into(rgb: &[u8], order: ByteOrder, out: &mut Vec<u8>) {
    out.reserve(rgb.len() / 3 * 2);
    for px in rgb.chunks_exact(3) {
        let word = pack(px[0], px[1], px[2]);
        let bytes = match order {
            ByteOrder::BigEndian => word.to_be_bytes(),
            ByteOrder::LittleEndian => word.to_le_bytes(),
        };
        out.extend_from_slice(&bytes);
    }
}

/// Convert interleaved RGB888 bytes into a new buffer
pub fn encode(rgb: &[u8], order: ByteOrder) -> Vec<u8> {
    let mut out = Vec::new();
    encode_into(rgb, order, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_primaries() {
        assert_eq!(pack(255, 0, 0), 0xF800);
        assert_eq!(pack(0, 255, 0), 0x07E0);
        assert_eq!(pack(0, 0, 255), 0x001F);
        assert_eq!(pack(255, 255, 255), 0xFFFF);
        assert_eq!(pack(0, 0, 0), 0x0000);
    }

    #[test]
    fn test_truncates_low_bits() {
        // 0b0000_0111 loses everything in the 5-bit channels
        assert_eq!(pack(7, 3, 7), 0x0000);
        assert_eq!(pack(8, 4, 8), 0x0821);
    }

    #[test]
    fn test_big_endian_stream() {
        let rgb = [255, 0, 0, 0, 0, 255];
        assert_eq!(encode(&rgb, ByteOrder::BigEndian), vec![0xF8, 0x00, 0x00, 0x1F]);
    }

    #[test]
    fn test_little_endian_stream() {
        let rgb = [255, 0, 0];
        assert_eq!(encode(&rgb, ByteOrder::LittleEndian), vec![0x00, 0xF8]);
    }

    #[test]
    fn test_partial_pixel_ignored() {
        assert_eq!(encode(&[1, 2, 3, 4], ByteOrder::BigEndian).len(), 2);
    }

    proptest! {
        #[test]
        fn prop_pack_is_bit_exact(r: u8, g: u8, b: u8) {
            let word = pack(r, g, b);
            prop_assert_eq!(word >> 11, u16::from(r >> 3));
            prop_assert_eq!((word >> 5) & 0x3F, u16::from(g >> 2));
            prop_assert_eq!(word & 0x1F, u16::from(b >> 3));
        }

        #[test]
        fn prop_stream_is_row_major(pixels in proptest::collection::vec(any::<(u8, u8, u8)>(), 0..64)) {
            let rgb: Vec<u8> = pixels.iter().flat_map(|&(r, g, b)| [r, g, b]).collect();
            let out = encode(&rgb, ByteOrder::BigEndian);
            prop_assert_eq!(out.len(), pixels.len() * 2);
            for (i, &(r, g, b)) in pixels.iter().enumerate() {
                let word = u16::from_be_bytes([out[2 * i], out[2 * i + 1]]);
                prop_assert_eq!(word, pack(r, g, b));
            }
        }
    }
}
