/// PKCS#7 padding and validation
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaddingError {
    #[error("cannot unpad an empty buffer")]
    Empty,
    #[error("invalid pkcs7 padding length {0:#04x}")]
    InvalidLength(u8),
    #[error("pkcs7 padding of length {0} is not uniform")]
    Inconsistent(u8),
}

pub fn pkcs7_pad(bytes: &[u8], block_size: usize) -> Vec<u8> {
    let n_pad = block_size - (bytes.len() % block_size);
    let mut out = Vec::with_capacity(bytes.len() + n_pad);
    out.extend_from_slice(bytes);
    out.resize(bytes.len() + n_pad, n_pad as u8);
    out
}

/// Return the number of padding bytes on the end of `bytes`.
pub fn pkcs7_padding_len(bytes: &[u8], block_size: usize) -> Result<usize, PaddingError> {
    let n_pad = *bytes.last().ok_or(PaddingError::Empty)?;
    if n_pad == 0 || n_pad as usize > block_size || n_pad as usize > bytes.len() {
        return Err(PaddingError::InvalidLength(n_pad));
    }
    let padding = &bytes[(bytes.len() - n_pad as usize)..];
    if padding.iter().all(|&b| b == n_pad) {
        Ok(n_pad as usize)
    } else {
        Err(PaddingError::Inconsistent(n_pad))
    }
}

pub fn pkcs7_unpad(bytes: &mut Vec<u8>, block_size: usize) -> Result<(), PaddingError> {
    let n_pad = pkcs7_padding_len(bytes, block_size)?;
    bytes.truncate(bytes.len() - n_pad);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case("YELL", 4, "YELL\x04\x04\x04\x04")]
    #[case("YELLOWS!!!", 6, "YELLOWS!!!\x02\x02")]
    #[case("YELLOW SUBMARINE", 20, "YELLOW SUBMARINE\x04\x04\x04\x04")]
    #[case("", 3, "\x03\x03\x03")]
    fn pkcs7_pad_pads_message(#[case] msg: &str, #[case] block_size: usize, #[case] expected: &str) {
        let padded = pkcs7_pad(msg.as_bytes(), block_size);

        assert_eq!(padded, expected.as_bytes());
    }

    #[test]
    fn pkcs7_pad_appends_full_block_to_aligned_message() {
        let padded = pkcs7_pad(b"YELLOW SUBMARINE", 16);

        assert_eq!(padded.len(), 32);
        assert!(padded[16..].iter().all(|&b| b == 0x10));
    }

    #[test]
    fn pkcs7_unpad_unpads_message() {
        let mut msg = b"ICE ICE BABY\x04\x04\x04\x04".to_vec();

        let unpadded = pkcs7_unpad(&mut msg, 16);

        assert!(unpadded.is_ok());
        assert_eq!(msg, b"ICE ICE BABY");
    }

    #[rstest]
    #[case(b"ICE ICE BABY\x05\x05\x05\x05", PaddingError::Inconsistent(5))]
    #[case(b"ICE ICE BABY\x01\x02\x03\x04", PaddingError::Inconsistent(4))]
    #[case(b"ICE ICE BABY\x00", PaddingError::InvalidLength(0))]
    #[case(b"\x02", PaddingError::InvalidLength(2))]
    #[case(b"", PaddingError::Empty)]
    fn pkcs7_unpad_returns_err_given_invalid_padding(
        #[case] padded: &[u8],
        #[case] expected: PaddingError,
    ) {
        let mut msg = padded.to_vec();

        let unpadded = pkcs7_unpad(&mut msg, 16);

        assert_eq!(unpadded, Err(expected));
        assert_eq!(msg, padded);
    }

    #[test]
    fn pkcs7_padding_len_rejects_padding_longer_than_block() {
        let msg = [0x11u8; 32];

        assert_eq!(
            pkcs7_padding_len(&msg, 16),
            Err(PaddingError::InvalidLength(0x11))
        );
    }
}
