//! Constant-time operations for security.

use subtle::ConstantTimeEq;

/// Compare two byte slices in constant time.
///
/// Only the length check may return early; lengths are not secret since the
/// expected value always has the same size. Equal-length inputs are compared
/// over their full length regardless of where the first difference is.
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_signatures() {
        let sig = b"g0hM9SsE+OTPJTGt/tmIKtSyZlE3uFJELVlNIOLJ1OE=";
        assert!(constant_time_compare(sig, sig));
    }

    #[test]
    fn test_last_byte_differs() {
        assert!(!constant_time_compare(b"abcdef=", b"abcdeg="));
    }

    #[test]
    fn test_different_lengths() {
        assert!(!constant_time_compare(b"abcdef=", b"abcdef"));
    }

    #[test]
    fn test_empty_slices() {
        assert!(constant_time_compare(b"", b""));
        assert!(!constant_time_compare(b"", b"a"));
    }
}
