/// Derives a 32 byte seed from an arbitrary label so synthetic instances can be
/// reproduced from the command line.
pub fn seed_from_str(input: &str) -> [u8; 32] {
    blake3::hash(input.as_bytes()).into()
}
