/// A simple checksum utility for validating packet payloads using XOR.
pub struct CheckSum;

impl CheckSum {
    /// Computes a 16-bit checksum by folding the payload as big-endian
    /// 16-bit words with XOR. An odd trailing byte is padded with zero.
    pub fn new(payload: &[u8]) -> u16 {
        payload.chunks(2).fold(0u16, |checksum, word| {
            let high = word[0] as u16;
            let low = word.get(1).copied().unwrap_or(0) as u16;
            checksum ^ ((high << 8) | low)
        })
    }

    /// Verifies that the expected checksum matches the one computed for the payload.
    pub fn check(checksum: u16, payload: &[u8]) -> bool {
        CheckSum::new(payload) == checksum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_empty_payload() {
        assert_eq!(CheckSum::new(&[]), 0);
    }

    #[test]
    fn test_checksum_pads_odd_byte() {
        // 0xAB is treated as the word 0xAB00
        assert_eq!(CheckSum::new(&[0xAB]), 0xAB00);
    }

    #[test]
    fn test_checksum_folds_words() {
        // 0x0102 ^ 0x0304 = 0x0206
        assert_eq!(CheckSum::new(&[0x01, 0x02, 0x03, 0x04]), 0x0206);
    }

    #[test]
    fn test_checksum_check_valid() {
        let payload: &[u8] = &[0x10, 0x20, 0x30];
        let checksum = CheckSum::new(payload);
        assert!(CheckSum::check(checksum, payload));
    }

    #[test]
    fn test_checksum_check_invalid() {
        let payload: &[u8] = &[0x10, 0x20, 0x30];
        assert!(!CheckSum::check(0xFFFF, payload));
    }
}
