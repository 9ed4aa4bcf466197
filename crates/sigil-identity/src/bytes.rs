//! Fixed-length byte arrays in binary serde formats.

use serde::de::{self, SeqAccess, Visitor};
use std::fmt;

/// Deserializes exactly `N` bytes written with `serialize_bytes`.
///
/// Formats that encode byte strings as sequences are accepted too.
pub(crate) fn deserialize_array<'de, D, const N: usize>(
    deserializer: D,
) -> Result<[u8; N], D::Error>
where
    D: de::Deserializer<'de>,
{
    let bytes = deserializer.deserialize_byte_buf(ByteBufVisitor)?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| de::Error::custom(format!("expected {N} bytes, got {len}")))
}

struct ByteBufVisitor;

impl<'de> Visitor<'de> for ByteBufVisitor {
    type Value = Vec<u8>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a byte string")
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
        Ok(v.to_vec())
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Self::Value, E> {
        Ok(v)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut out = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(b) = seq.next_element::<u8>()? {
            out.push(b);
        }
        Ok(out)
    }
}
