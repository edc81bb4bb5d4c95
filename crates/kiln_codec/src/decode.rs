//! Type-driven binary decoding.

use crate::error::CodecError;
use kiln_common::Interner;
use kiln_data_parser::{DataNode, DataNodeKind, LabeledValue, MapEntry};
use kiln_elaborate::{ResolvedField, ResolvedPayload, ResolvedType};
use kiln_source::Span;

/// Decodes bytes back into a data tree per the resolved type used to encode
/// them.
///
/// Decoded nodes carry dummy spans. Tuple payload labels declared in the
/// recipe are reattached, so a decoded tree compares equal to the labeled
/// source tree it was encoded from. Trailing bytes after the root value are
/// an error.
pub fn decode(
    bytes: &[u8],
    ty: &ResolvedType,
    interner: &Interner,
) -> Result<DataNode, CodecError> {
    let mut decoder = Decoder {
        bytes,
        pos: 0,
        interner,
    };
    let root = decoder.value(ty)?;
    if decoder.pos != bytes.len() {
        return Err(CodecError::TrailingBytes {
            count: bytes.len() - decoder.pos,
        });
    }
    Ok(root)
}

struct Decoder<'a> {
    bytes: &'a [u8],
    pos: usize,
    interner: &'a Interner,
}

impl<'a> Decoder<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if self.pos + n > self.bytes.len() {
            return Err(CodecError::UnexpectedEof { offset: self.pos });
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn count(&mut self) -> Result<usize, CodecError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize)
    }

    fn value(&mut self, ty: &ResolvedType) -> Result<DataNode, CodecError> {
        let kind = match ty {
            ResolvedType::Error => {
                return Err(CodecError::Nonconforming(
                    "unresolved type reached the decoder".to_string(),
                ))
            }
            ResolvedType::Bool => {
                let byte = self.take(1)?[0];
                if byte > 1 {
                    return Err(CodecError::Nonconforming(format!(
                        "invalid boolean byte {byte}"
                    )));
                }
                let name = self
                    .interner
                    .get_or_intern(if byte == 0 { "false" } else { "true" });
                DataNodeKind::Ident {
                    name,
                    payload: None,
                }
            }
            ResolvedType::Int { signed, bits } => {
                let width = *bits as usize / 8;
                let raw = self.take(width)?;
                DataNodeKind::Int(int_from_le(raw, *signed))
            }
            ResolvedType::Float { bits } => {
                if *bits == 32 {
                    let raw = self.take(4)?;
                    let value = f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
                    DataNodeKind::Float(value as f64)
                } else {
                    let raw = self.take(8)?;
                    let mut buf = [0u8; 8];
                    buf.copy_from_slice(raw);
                    DataNodeKind::Float(f64::from_le_bytes(buf))
                }
            }
            ResolvedType::Str => {
                let len = self.count()?;
                let raw = self.take(len)?;
                let text = std::str::from_utf8(raw).map_err(|_| CodecError::InvalidUtf8)?;
                DataNodeKind::Str(text.to_string())
            }
            ResolvedType::List(elem) => {
                let len = self.count()?;
                let mut items = Vec::with_capacity(len.min(1024));
                for _ in 0..len {
                    items.push(self.value(elem)?);
                }
                DataNodeKind::List(items)
            }
            ResolvedType::Map(key, value) => {
                let len = self.count()?;
                let mut entries = Vec::with_capacity(len.min(1024));
                for _ in 0..len {
                    let k = self.value(key)?;
                    let v = self.value(value)?;
                    entries.push(MapEntry {
                        key: k,
                        value: v,
                        span: Span::DUMMY,
                    });
                }
                DataNodeKind::Map(entries)
            }
            ResolvedType::Tuple(elems) => {
                let mut values = Vec::with_capacity(elems.len());
                for elem in elems {
                    values.push(LabeledValue {
                        label: None,
                        value: self.value(elem)?,
                        span: Span::DUMMY,
                    });
                }
                DataNodeKind::Tuple(values)
            }
            ResolvedType::Struct(s) => self.fields(&s.fields)?,
            ResolvedType::Enum(e) => {
                let width = e.index_width();
                let raw = self.take(width)?;
                let mut buf = [0u8; 8];
                buf[..width].copy_from_slice(raw);
                let index = u64::from_le_bytes(buf);
                let variant = e
                    .variants
                    .get(index as usize)
                    .ok_or(CodecError::InvalidVariant {
                        index,
                        count: e.variants.len(),
                    })?;
                let payload = match &variant.payload {
                    None => None,
                    Some(ResolvedPayload::Tuple(elems)) => {
                        let mut values = Vec::with_capacity(elems.len());
                        for elem in elems {
                            values.push(LabeledValue {
                                label: elem.label,
                                value: self.value(&elem.ty)?,
                                span: Span::DUMMY,
                            });
                        }
                        Some(Box::new(DataNode::synthetic(DataNodeKind::Tuple(values))))
                    }
                    Some(ResolvedPayload::Struct(fields)) => Some(Box::new(
                        DataNode::synthetic(self.fields(fields)?),
                    )),
                };
                DataNodeKind::Ident {
                    name: variant.name,
                    payload,
                }
            }
        };
        Ok(DataNode::synthetic(kind))
    }

    /// Decodes a field list back into a map keyed by field names, in
    /// declaration order.
    fn fields(&mut self, fields: &[ResolvedField]) -> Result<DataNodeKind, CodecError> {
        let mut entries = Vec::with_capacity(fields.len());
        for field in fields {
            let value = self.value(&field.ty)?;
            entries.push(MapEntry {
                key: DataNode::synthetic(DataNodeKind::Ident {
                    name: field.name,
                    payload: None,
                }),
                value,
                span: Span::DUMMY,
            });
        }
        Ok(DataNodeKind::Map(entries))
    }
}

/// Reassembles a little-endian integer, sign-extending when signed.
fn int_from_le(bytes: &[u8], signed: bool) -> i128 {
    let mut buf = [0u8; 16];
    buf[..bytes.len()].copy_from_slice(bytes);
    if signed && bytes[bytes.len() - 1] & 0x80 != 0 {
        for byte in buf.iter_mut().skip(bytes.len()) {
            *byte = 0xff;
        }
    }
    i128::from_le_bytes(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_extension() {
        assert_eq!(int_from_le(&[0xff], true), -1);
        assert_eq!(int_from_le(&[0xff], false), 255);
        assert_eq!(int_from_le(&[0x00, 0x80], true), i16::MIN as i128);
        assert_eq!(int_from_le(&[0xff; 8], false), u64::MAX as i128);
    }
}
