use rand::{distributions::Alphanumeric, Rng};

/// Random string of `len` characters drawn from `[A-Za-z0-9]`.
pub fn random_alphanumeric(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::random_alphanumeric;

    #[test]
    fn random_alphanumeric_has_requested_length_and_alphabet() {
        let value = random_alphanumeric(64);
        assert_eq!(value.len(), 64);
        assert!(value.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn random_alphanumeric_differs_between_calls() {
        assert_ne!(random_alphanumeric(32), random_alphanumeric(32));
    }
}
