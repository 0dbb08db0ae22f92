use rand::Rng;

/// Random numeric code of `length` ASCII digits; leading zeros allowed.
pub fn generate_numeric_otp(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_is_six_ascii_digits() {
        for _ in 0..50 {
            let otp = generate_numeric_otp(6);
            assert_eq!(otp.len(), 6);
            assert!(otp.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_otp_length_follows_argument() {
        assert_eq!(generate_numeric_otp(8).len(), 8);
    }
}
