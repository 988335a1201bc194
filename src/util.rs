//! Shared helpers: identifier generation and license key normalization.

use rand::Rng;

/// Crockford-style alphabet: no I, O, 0 or 1, so keys survive being read
/// over the phone or typed from a printed email.
const KEY_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

fn random_chunk(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| KEY_ALPHABET[rng.gen_range(0..KEY_ALPHABET.len())] as char)
        .collect()
}

/// Generate an opaque identifier like `ORD-K7MPX2Q9RD` or `TOK-...`.
pub fn generate_id(prefix: &str) -> String {
    format!("{}-{}", prefix, random_chunk(10))
}

/// Generate a human-enterable license key like `VG-ABCD-EFGH-JKLM`.
pub fn generate_license_key(prefix: &str) -> String {
    format!(
        "{}-{}-{}-{}",
        prefix,
        random_chunk(4),
        random_chunk(4),
        random_chunk(4)
    )
}

/// License keys are case-insensitive on entry; the stored form is uppercase.
pub fn normalize_license_key(raw: &str) -> String {
    raw.trim().to_uppercase()
}
