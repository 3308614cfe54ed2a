//! Wire serialization for inter-party messages
//!
//! Records start with a 16-bit big-endian format version; integer fields are
//! `(32-bit big-endian length, minimal big-endian bytes)` in declaration
//! order, small scalars are raw 16-bit big-endian. The whole record is
//! wrapped in standard base64. Decoders reject version mismatches and
//! truncated input with recoverable errors instead of reading out of
//! bounds.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use num_bigint::BigUint;
use num_traits::Zero;

use crate::types::{KeyMetaInfo, KeyShare, PublicKey, SignatureShare};
use crate::{Error, Result};

/// Current wire format version
pub const WIRE_VERSION: u16 = 1;

/// Minimal big-endian encoding; zero is the empty string.
///
/// This exact encoding also feeds the proof hash, so it must stay in sync
/// with deserialization.
pub fn int_to_bytes(x: &BigUint) -> Vec<u8> {
    if x.is_zero() {
        Vec::new()
    } else {
        x.to_bytes_be()
    }
}

/// Inverse of [`int_to_bytes`]; the empty string decodes to zero.
pub fn int_from_bytes(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Serialize a key share for transport to its party.
pub fn serialize_key_share(share: &KeyShare) -> String {
    let mut buf = Vec::new();
    put_u16(&mut buf, WIRE_VERSION);
    put_u16(&mut buf, share.id);
    put_int(&mut buf, &share.n);
    put_int(&mut buf, &share.s_i);
    BASE64.encode(buf)
}

/// Decode a key share, rejecting foreign format versions.
pub fn deserialize_key_share(b64: &str) -> Result<KeyShare> {
    let buf = decode_b64(b64)?;
    let mut r = Reader::new(&buf);
    check_version(r.read_u16()?)?;

    Ok(KeyShare {
        id: r.read_u16()?,
        n: r.read_int()?,
        s_i: r.read_int()?,
    })
}

/// Serialize a signature share for the combiner.
pub fn serialize_signature_share(sig: &SignatureShare) -> String {
    let mut buf = Vec::new();
    put_u16(&mut buf, WIRE_VERSION);
    put_u16(&mut buf, sig.id);
    put_int(&mut buf, &sig.x_i);
    put_int(&mut buf, &sig.c);
    put_int(&mut buf, &sig.z);
    BASE64.encode(buf)
}

/// Decode a signature share.
pub fn deserialize_signature_share(b64: &str) -> Result<SignatureShare> {
    let buf = decode_b64(b64)?;
    let mut r = Reader::new(&buf);
    check_version(r.read_u16()?)?;

    Ok(SignatureShare {
        id: r.read_u16()?,
        x_i: r.read_int()?,
        c: r.read_int()?,
        z: r.read_int()?,
    })
}

/// Serialize the public group parameters.
///
/// The public key travels as a nested length-prefixed blob so its layout can
/// evolve with the version number.
pub fn serialize_key_metainfo(info: &KeyMetaInfo) -> String {
    let mut pk = Vec::new();
    put_int(&mut pk, &info.public_key.n);
    put_int(&mut pk, &info.public_key.e);

    let mut buf = Vec::new();
    put_u16(&mut buf, WIRE_VERSION);
    put_field(&mut buf, &pk);
    put_u16(&mut buf, info.k);
    put_u16(&mut buf, info.l);
    put_int(&mut buf, &info.v);
    put_int(&mut buf, &info.u);
    for vk in &info.vk {
        put_int(&mut buf, vk);
    }
    BASE64.encode(buf)
}

/// Decode public group parameters.
pub fn deserialize_key_metainfo(b64: &str) -> Result<KeyMetaInfo> {
    let buf = decode_b64(b64)?;
    let mut r = Reader::new(&buf);
    check_version(r.read_u16()?)?;

    let pk_blob = r.read_field()?.to_vec();
    let k = r.read_u16()?;
    let l = r.read_u16()?;
    let v = r.read_int()?;
    let u = r.read_int()?;

    let mut vk = Vec::with_capacity(l as usize);
    for _ in 0..l {
        vk.push(r.read_int()?);
    }

    let mut pk = Reader::new(&pk_blob);
    let public_key = PublicKey {
        n: pk.read_int()?,
        e: pk.read_int()?,
    };

    Ok(KeyMetaInfo {
        public_key,
        k,
        l,
        v,
        u,
        vk,
    })
}

fn decode_b64(b64: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(b64)
        .map_err(|e| Error::Deserialization(format!("invalid base64: {e}")))
}

fn check_version(actual: u16) -> Result<()> {
    if actual != WIRE_VERSION {
        return Err(Error::VersionMismatch {
            expected: WIRE_VERSION,
            actual,
        });
    }
    Ok(())
}

fn put_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn put_field(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    buf.extend_from_slice(bytes);
}

fn put_int(buf: &mut Vec<u8>, value: &BigUint) {
    put_field(buf, &int_to_bytes(value));
}

/// Bounds-checked cursor over a decoded record.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.buf.len())
            .ok_or_else(|| Error::Deserialization("truncated record".into()))?;
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_field(&mut self) -> Result<&'a [u8]> {
        let len = self.read_u32()? as usize;
        self.take(len)
    }

    fn read_int(&mut self) -> Result<BigUint> {
        Ok(int_from_bytes(self.read_field()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keygen::generate_keys;
    use crate::sign::sign_share;
    use crate::types::KeyParams;
    use rand::rngs::OsRng;

    #[test]
    fn int_codec_is_minimal() {
        assert!(int_to_bytes(&BigUint::zero()).is_empty());
        assert_eq!(int_to_bytes(&BigUint::from(1u32)), vec![1]);
        assert_eq!(int_to_bytes(&BigUint::from(0x1234u32)), vec![0x12, 0x34]);
        assert_eq!(int_from_bytes(&[]), BigUint::zero());
        for v in [0u64, 1, 255, 256, u64::MAX] {
            let v = BigUint::from(v);
            assert_eq!(int_from_bytes(&int_to_bytes(&v)), v);
        }
    }

    #[test]
    fn base64_round_trips_awkward_lengths() {
        for len in [0usize, 1, 2, 4, 5, 31] {
            let data: Vec<u8> = (0..len as u8).collect();
            let encoded = BASE64.encode(&data);
            assert_eq!(BASE64.decode(encoded).unwrap(), data);
        }
    }

    #[test]
    fn round_trips_preserve_every_field() {
        let mut rng = OsRng;
        let params = KeyParams::new(512, 3, 5).unwrap();
        let (shares, info) = generate_keys(&params, &mut rng).unwrap();

        let share = deserialize_key_share(&serialize_key_share(&shares[0])).unwrap();
        assert_eq!(share, shares[0]);

        let doc = BigUint::from(31337u32);
        let sig = sign_share(&shares[1], &doc, &info, &mut rng).unwrap();
        let sig2 = deserialize_signature_share(&serialize_signature_share(&sig)).unwrap();
        assert_eq!(sig, sig2);

        let info2 = deserialize_key_metainfo(&serialize_key_metainfo(&info)).unwrap();
        assert_eq!(info, info2);
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let share = KeyShare {
            id: 1,
            s_i: BigUint::from(7u32),
            n: BigUint::from(35u32),
        };
        let b64 = serialize_key_share(&share);
        let mut raw = BASE64.decode(&b64).unwrap();
        raw[0] = 0xFF;
        let err = deserialize_key_share(&BASE64.encode(&raw)).unwrap_err();
        assert!(matches!(err, Error::VersionMismatch { .. }));
    }

    #[test]
    fn truncated_record_is_rejected() {
        let share = KeyShare {
            id: 1,
            s_i: BigUint::from(7u32),
            n: BigUint::from(35u32),
        };
        let b64 = serialize_key_share(&share);
        let raw = BASE64.decode(&b64).unwrap();
        // every prefix must fail cleanly, never panic
        for cut in 0..raw.len() {
            assert!(deserialize_key_share(&BASE64.encode(&raw[..cut])).is_err());
        }
    }

    #[test]
    fn garbage_base64_is_rejected() {
        assert!(deserialize_key_share("not!base64").is_err());
        assert!(deserialize_signature_share("AA").is_err());
    }
}
