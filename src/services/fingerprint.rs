use sha2::{Digest, Sha256};

/// Short, stable identifier for an API key in log lines.
pub fn key_fingerprint(api_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    let result = hasher.finalize();
    hex::encode(&result[..4])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_short_and_stable() {
        let key = "abcdefghijklmnopqrstuvwxyz0123456789";
        let fp = key_fingerprint(key);
        assert_eq!(fp.len(), 8);
        assert_eq!(fp, key_fingerprint(key));
        assert_ne!(fp, key_fingerprint("other"));
    }
}
