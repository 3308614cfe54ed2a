//! PKCS#1 v1.5 document preparation and full-signature checking

use num_bigint::BigUint;
use sha2::{Digest, Sha256};

use crate::types::KeyMetaInfo;
use crate::wire::int_from_bytes;
use crate::{Error, Result};

/// DigestInfo prefix for SHA-256 (DER-encoded AlgorithmIdentifier)
const SHA256_PKCS_ID: [u8; 19] = [
    0x30, 0x31, 0x30, 0x0D, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01,
    0x05, 0x00, 0x04, 0x20,
];

/// Digest algorithm used inside the padding block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashKind {
    /// SHA-256 with its DigestInfo prefix
    Sha256,
    /// No hashing: the raw document bytes stand in for the digest
    None,
}

/// Pad a document into the signing block `00 01 FF.. 00 [prefix] [digest]`.
///
/// The output is exactly `ceil(bits(n)/8)` bytes, ready to be interpreted as
/// an integer below `n`.
pub fn prepare_document(doc: &[u8], hash: HashKind, info: &KeyMetaInfo) -> Result<Vec<u8>> {
    let block_len = info.public_key.n.bits().div_ceil(8) as usize;

    let (prefix, digest): (&[u8], Vec<u8>) = match hash {
        HashKind::Sha256 => (&SHA256_PKCS_ID, Sha256::digest(doc).to_vec()),
        HashKind::None => (&[], doc.to_vec()),
    };

    // two header bytes, the 00 separator, and at least one FF
    let overhead = 3 + prefix.len() + digest.len();
    if overhead + 1 > block_len {
        return Err(Error::InvalidParams(format!(
            "document needs {overhead} bytes of padding block, modulus allows {block_len}"
        )));
    }

    let mut out = Vec::with_capacity(block_len);
    out.push(0x00);
    out.push(0x01);
    out.resize(block_len - 1 - prefix.len() - digest.len(), 0xFF);
    out.push(0x00);
    out.extend_from_slice(prefix);
    out.extend_from_slice(&digest);

    debug_assert_eq!(out.len(), block_len);
    Ok(out)
}

/// Check a combined signature the way any RSA verifier would:
/// `y^e mod n == prepared document`.
pub fn rsa_verify(signature: &BigUint, doc: &[u8], hash: HashKind, info: &KeyMetaInfo) -> bool {
    let prepared = match prepare_document(doc, hash, info) {
        Ok(block) => int_from_bytes(&block),
        Err(_) => return false,
    };
    let n = &info.public_key.n;
    signature.modpow(&info.public_key.e, n) == prepared
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PublicKey;
    use num_bigint::BigUint;

    fn dummy_info(n_bytes: usize) -> KeyMetaInfo {
        // top byte 0x80 so the modulus is exactly n_bytes long
        let mut bytes = vec![0u8; n_bytes];
        bytes[0] = 0x80;
        bytes[n_bytes - 1] = 0x01;
        KeyMetaInfo {
            public_key: PublicKey {
                n: BigUint::from_bytes_be(&bytes),
                e: BigUint::from(65537u32),
            },
            k: 1,
            l: 1,
            v: BigUint::from(4u32),
            u: BigUint::from(3u32),
            vk: vec![BigUint::from(4u32)],
        }
    }

    #[test]
    fn sha256_block_layout() {
        let info = dummy_info(64);
        let block = prepare_document(b"Hello world!", HashKind::Sha256, &info).unwrap();

        assert_eq!(block.len(), 64);
        assert_eq!(&block[..2], &[0x00, 0x01]);

        // 64 = 2 + pad + 1 + 19 + 32 -> 10 bytes of 0xFF
        let pad_end = 64 - 1 - 19 - 32;
        assert!(block[2..pad_end].iter().all(|&b| b == 0xFF));
        assert_eq!(block[pad_end], 0x00);
        assert_eq!(&block[pad_end + 1..pad_end + 20], &SHA256_PKCS_ID);
        assert_eq!(
            &block[pad_end + 20..],
            Sha256::digest(b"Hello world!").as_slice()
        );
    }

    #[test]
    fn raw_mode_embeds_document_bytes() {
        let info = dummy_info(64);
        let block = prepare_document(b"abc", HashKind::None, &info).unwrap();
        assert_eq!(block.len(), 64);
        assert_eq!(&block[61..], b"abc");
        assert_eq!(block[60], 0x00);
    }

    #[test]
    fn oversized_document_is_rejected() {
        let info = dummy_info(64);
        let doc = vec![0xAB; 64];
        assert!(prepare_document(&doc, HashKind::None, &info).is_err());
    }
}
