use sha3::{Digest, Keccak256};

use crate::types::u256;

/// KECCAK-256 of `data` as a word.
pub fn keccak256(data: &[u8]) -> u256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let mut bytes = [0; 32];
    hasher.finalize_into((&mut bytes).into());
    bytes.into()
}

#[cfg(test)]
mod tests {
    use crate::types::hash::keccak256;

    fn hex32(word: crate::types::u256) -> String {
        format!("{word:x}")
    }

    #[test]
    fn ethereum_test_vectors() {
        // keccak256("")
        assert_eq!(
            hex32(keccak256(&[])),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
        // keccak256("hello")
        assert_eq!(
            hex32(keccak256(b"hello")),
            "1c8aff950685c2ed4bc3174f3472287b56d9517b9c948127319a09a7a36deac8"
        );
        // keccak256 of 32 zero bytes
        assert_eq!(
            hex32(keccak256(&[0; 32])),
            "290decd9548b62a8d60345a988386fc84ba6bc95484008f6362f93160ef3e563"
        );
    }
}
