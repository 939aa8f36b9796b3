//! Random case numbers for reports filed without one.

use rand::Rng;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const DEFAULT_CASE_NUMBER_LEN: usize = 8;

/// Random string of uppercase ASCII letters and digits.
pub fn generate_case_number(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_number_shape() {
        let number = generate_case_number(DEFAULT_CASE_NUMBER_LEN);
        assert_eq!(number.len(), 8);
        assert!(number
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        assert!(generate_case_number(0).is_empty());
    }
}
