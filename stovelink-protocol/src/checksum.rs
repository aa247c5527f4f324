//! Additive checksum shared by host frames and heater write commands.

/// Sum of all bytes modulo 256
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &byte| acc.wrapping_add(byte))
}

/// Check that the last byte of `frame` is the checksum of the bytes before it
///
/// An empty slice has no checksum byte and is never valid.
pub fn has_valid_checksum(frame: &[u8]) -> bool {
    match frame.split_last() {
        Some((&sent, body)) => checksum(body) == sent,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_checksum_empty() {
        assert_eq!(checksum(&[]), 0);
    }

    #[test]
    fn test_checksum_wraps() {
        // 0x80 + 0xE8 + 0x55 = 0x1BD
        assert_eq!(checksum(&[0x80, 0xE8, 0x55]), 0xBD);
        // 0x80 + 0xE8 + 0xAA = 0x212
        assert_eq!(checksum(&[0x80, 0xE8, 0xAA]), 0x12);
    }

    #[test]
    fn test_valid_frame() {
        assert!(has_valid_checksum(&[0x00, 0x01, 0x01, 0x02]));
        assert!(!has_valid_checksum(&[0x00, 0x01, 0x01, 0x03]));
        assert!(!has_valid_checksum(&[]));
    }

    #[test]
    fn test_single_byte_frame() {
        // Only a checksum byte: sum of nothing is zero
        assert!(has_valid_checksum(&[0x00]));
        assert!(!has_valid_checksum(&[0x01]));
    }

    proptest! {
        #[test]
        fn prop_checksum_is_sum_mod_256(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let expected = bytes.iter().map(|&b| b as u32).sum::<u32>() % 256;
            prop_assert_eq!(checksum(&bytes) as u32, expected);
        }

        #[test]
        fn prop_checksum_ignores_order(mut bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let before = checksum(&bytes);
            bytes.reverse();
            prop_assert_eq!(checksum(&bytes), before);
        }

        #[test]
        fn prop_appended_checksum_validates(body in proptest::collection::vec(any::<u8>(), 0..16)) {
            let mut frame = body.clone();
            frame.push(checksum(&body));
            prop_assert!(has_valid_checksum(&frame));

            let last = frame.len() - 1;
            frame[last] = frame[last].wrapping_add(1);
            prop_assert!(!has_valid_checksum(&frame));
        }
    }
}
