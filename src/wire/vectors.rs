//! Packed vector byte payloads
//!
//! Floating-point vectors cross the wire as little-endian `f32` byte
//! payloads next to an explicit type tag, so a payload can be read back
//! without per-element framing. Multi-vector payloads carry a leading
//! `u32` column count; rows are laid out row-major after it.

use crate::error::{ConstructionError, DecodeError};
use crate::query::VectorInput;
use bytes::{BufMut, Bytes, BytesMut};

/// Type tag for a flat single-vector payload
pub const SINGLE_VECTOR_TAG: u8 = 1;

/// Type tag for a row-major multi-vector payload
pub const MULTI_VECTOR_TAG: u8 = 2;

/// Pack one query vector payload, returning the type tag and bytes
pub fn pack(input: &VectorInput) -> Result<(u8, Bytes), ConstructionError> {
    match input {
        VectorInput::Single(values) => Ok((SINGLE_VECTOR_TAG, pack_single(values))),
        VectorInput::Multi(rows) => Ok((MULTI_VECTOR_TAG, pack_multi(rows)?)),
    }
}

fn pack_single(values: &[f32]) -> Bytes {
    let mut buf = BytesMut::with_capacity(values.len() * 4);
    for value in values {
        buf.put_f32_le(*value);
    }
    buf.freeze()
}

fn pack_multi(rows: &[Vec<f32>]) -> Result<Bytes, ConstructionError> {
    let first = rows.first().ok_or(ConstructionError::EmptyOperandList)?;
    let width = first.len();

    let mut buf = BytesMut::with_capacity(4 + rows.len() * width * 4);
    buf.put_u32_le(width as u32);
    for row in rows {
        if row.len() != width {
            return Err(ConstructionError::RaggedMultiVector {
                expected: width,
                found: row.len(),
            });
        }
        for value in row {
            buf.put_f32_le(*value);
        }
    }
    Ok(buf.freeze())
}

/// Unpack a tagged vector payload.
///
/// Returns `Ok(None)` for an unrecognized type tag so decoding can degrade
/// forward-compatibly; malformed payloads for a known tag are decode
/// defects.
pub fn unpack(name: &str, tag: u8, payload: &[u8]) -> Result<Option<VectorInput>, DecodeError> {
    match tag {
        SINGLE_VECTOR_TAG => Ok(Some(VectorInput::Single(read_f32s(name, payload)?))),
        MULTI_VECTOR_TAG => {
            if payload.len() < 4 {
                return Err(DecodeError::MalformedVector {
                    name: name.to_owned(),
                    reason: "missing column-count prefix".to_owned(),
                });
            }
            let (prefix, body) = payload.split_at(4);
            let width = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;
            let values = read_f32s(name, body)?;

            if width == 0 {
                if values.is_empty() {
                    return Ok(Some(VectorInput::Multi(Vec::new())));
                }
                return Err(DecodeError::MalformedVector {
                    name: name.to_owned(),
                    reason: "zero column count with non-empty body".to_owned(),
                });
            }
            if values.len() % width != 0 {
                return Err(DecodeError::MalformedVector {
                    name: name.to_owned(),
                    reason: format!(
                        "body of {} values is not a multiple of column count {}",
                        values.len(),
                        width
                    ),
                });
            }
            let rows = values.chunks(width).map(<[f32]>::to_vec).collect();
            Ok(Some(VectorInput::Multi(rows)))
        }
        _ => Ok(None),
    }
}

fn read_f32s(name: &str, payload: &[u8]) -> Result<Vec<f32>, DecodeError> {
    if payload.len() % 4 != 0 {
        return Err(DecodeError::MalformedVector {
            name: name.to_owned(),
            reason: format!("payload of {} bytes is not a multiple of 4", payload.len()),
        });
    }
    Ok(payload
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_roundtrip() {
        let input = VectorInput::Single(vec![0.25, -1.5, 3.75]);
        let (tag, payload) = pack(&input).unwrap();
        assert_eq!(tag, SINGLE_VECTOR_TAG);

        let decoded = unpack("default", tag, &payload).unwrap().unwrap();
        assert_eq!(decoded, input);
    }

    #[test]
    fn test_multi_roundtrip() {
        let input = VectorInput::Multi(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
        let (tag, payload) = pack(&input).unwrap();
        assert_eq!(tag, MULTI_VECTOR_TAG);

        let decoded = unpack("colbert", tag, &payload).unwrap().unwrap();
        assert_eq!(decoded, input);
    }

    #[test]
    fn test_unknown_tag_is_skipped_not_fatal() {
        let decoded = unpack("future", 99, &[1, 2, 3]).unwrap();
        assert!(decoded.is_none());
    }

    #[test]
    fn test_truncated_payload_is_a_decode_defect() {
        let result = unpack("default", SINGLE_VECTOR_TAG, &[0, 0, 128]);
        assert!(matches!(
            result,
            Err(DecodeError::MalformedVector { .. })
        ));
    }

    #[test]
    fn test_ragged_multi_vector_fails_at_pack_time() {
        let input = VectorInput::Multi(vec![vec![1.0, 2.0], vec![3.0]]);
        let err = pack(&input).unwrap_err();
        assert_eq!(
            err,
            ConstructionError::RaggedMultiVector {
                expected: 2,
                found: 1
            }
        );
    }
}
