//! 16-bit little-endian PCM helpers.
//!
//! Buffers move through the codec as raw bytes; these convert at the edges.

/// Decode interleaved little-endian 16-bit samples. A trailing odd byte is ignored.
pub fn decode_le(bytes: &[u8]) -> impl Iterator<Item = i16> + '_ {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
}

/// Encode samples as little-endian bytes. Output length = `samples.len() * 2`.
pub fn encode_le(samples: &[i16]) -> Vec<u8> {
    let mut data = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        data.extend_from_slice(&sample.to_le_bytes());
    }
    data
}

/// Format up to `count` leading samples, `per_row` per line, as `value (0xHEX)`.
pub fn format_rows(bytes: &[u8], count: usize, per_row: usize) -> Vec<String> {
    let samples: Vec<i16> = decode_le(bytes).take(count).collect();
    samples
        .chunks(per_row.max(1))
        .map(|row| {
            row.iter()
                .map(|&s| format!("{:6} (0x{:04X})", s, s as u16))
                .collect::<Vec<_>>()
                .join("")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_little_endian() {
        let samples: Vec<i16> = decode_le(&[0x34, 0x12, 0x00, 0x80]).collect();
        assert_eq!(samples, vec![0x1234, i16::MIN]);
    }

    #[test]
    fn decode_ignores_trailing_byte() {
        assert_eq!(decode_le(&[1, 0, 7]).count(), 1);
        assert_eq!(decode_le(&[]).count(), 0);
    }

    #[test]
    fn encode_matches_decode() {
        let samples = [0, -1, 32767, -32768, 1234];
        let bytes = encode_le(&samples);

        assert_eq!(bytes.len(), 10);
        assert_eq!(&bytes[2..4], &[0xFF, 0xFF]);
        assert_eq!(decode_le(&bytes).collect::<Vec<_>>(), samples.to_vec());
    }

    #[test]
    fn rows_are_split_and_hex_formatted() {
        let bytes = encode_le(&[-1, 2, 3]);
        let rows = format_rows(&bytes, 16, 2);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], "    -1 (0xFFFF)     2 (0x0002)");
        assert_eq!(rows[1], "     3 (0x0003)");
    }
}
