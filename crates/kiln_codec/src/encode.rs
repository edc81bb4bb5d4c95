//! Type-driven binary encoding.

use crate::error::CodecError;
use kiln_common::{Ident, Interner};
use kiln_data_parser::{DataNode, DataNodeKind, MapEntry};
use kiln_elaborate::{ResolvedField, ResolvedPayload, ResolvedType};

/// Encodes a validated data tree into bytes per its resolved type.
///
/// The tree must have passed [`validate`](kiln_elaborate::validate); a
/// nonconforming tree fails with [`CodecError::Nonconforming`].
pub fn encode(
    data: &DataNode,
    ty: &ResolvedType,
    interner: &Interner,
) -> Result<Vec<u8>, CodecError> {
    let mut encoder = Encoder {
        out: Vec::new(),
        interner,
    };
    encoder.value(data, ty)?;
    Ok(encoder.out)
}

struct Encoder<'env> {
    out: Vec<u8>,
    interner: &'env Interner,
}

impl<'env> Encoder<'env> {
    fn mismatch(&self, what: &str, data: &DataNode) -> CodecError {
        CodecError::Nonconforming(format!("expected {what}, found {:?}", data.kind))
    }

    fn count(&mut self, len: usize, what: &'static str) -> Result<(), CodecError> {
        let count = u32::try_from(len).map_err(|_| CodecError::CountOverflow { what })?;
        self.out.extend_from_slice(&count.to_le_bytes());
        Ok(())
    }

    fn value(&mut self, data: &DataNode, ty: &ResolvedType) -> Result<(), CodecError> {
        match ty {
            ResolvedType::Error => Err(CodecError::Nonconforming(
                "unresolved type reached the encoder".to_string(),
            )),
            ResolvedType::Bool => self.bool_value(data),
            ResolvedType::Int { bits, .. } => self.int_value(data, *bits),
            ResolvedType::Float { bits } => self.float_value(data, *bits),
            ResolvedType::Str => self.str_value(data),
            ResolvedType::List(elem) => self.list_value(data, elem),
            ResolvedType::Map(key, value) => self.map_value(data, key, value),
            ResolvedType::Tuple(elems) => self.tuple_value(data, elems),
            ResolvedType::Struct(s) => self.struct_value(data, &s.fields),
            ResolvedType::Enum(e) => self.enum_value(data, e),
        }
    }

    fn bool_value(&mut self, data: &DataNode) -> Result<(), CodecError> {
        if let DataNodeKind::Ident {
            name,
            payload: None,
        } = &data.kind
        {
            match self.interner.resolve(*name) {
                "true" => {
                    self.out.push(1);
                    return Ok(());
                }
                "false" => {
                    self.out.push(0);
                    return Ok(());
                }
                _ => {}
            }
        }
        Err(self.mismatch("boolean", data))
    }

    fn int_value(&mut self, data: &DataNode, bits: u8) -> Result<(), CodecError> {
        let DataNodeKind::Int(value) = &data.kind else {
            return Err(self.mismatch("integer", data));
        };
        // Two's complement little-endian, truncated to the declared width.
        let bytes = value.to_le_bytes();
        self.out.extend_from_slice(&bytes[..bits as usize / 8]);
        Ok(())
    }

    fn float_value(&mut self, data: &DataNode, bits: u8) -> Result<(), CodecError> {
        let value = match &data.kind {
            DataNodeKind::Float(f) => *f,
            DataNodeKind::Int(i) => *i as f64,
            _ => return Err(self.mismatch("float", data)),
        };
        if bits == 32 {
            self.out.extend_from_slice(&(value as f32).to_le_bytes());
        } else {
            self.out.extend_from_slice(&value.to_le_bytes());
        }
        Ok(())
    }

    fn str_value(&mut self, data: &DataNode) -> Result<(), CodecError> {
        let DataNodeKind::Str(text) = &data.kind else {
            return Err(self.mismatch("string", data));
        };
        self.count(text.len(), "string length")?;
        self.out.extend_from_slice(text.as_bytes());
        Ok(())
    }

    fn list_value(&mut self, data: &DataNode, elem: &ResolvedType) -> Result<(), CodecError> {
        let DataNodeKind::List(items) = &data.kind else {
            return Err(self.mismatch("list", data));
        };
        self.count(items.len(), "list length")?;
        for item in items {
            self.value(item, elem)?;
        }
        Ok(())
    }

    fn map_value(
        &mut self,
        data: &DataNode,
        key: &ResolvedType,
        value: &ResolvedType,
    ) -> Result<(), CodecError> {
        let DataNodeKind::Map(entries) = &data.kind else {
            return Err(self.mismatch("map", data));
        };
        self.count(entries.len(), "map length")?;
        for entry in entries {
            self.value(&entry.key, key)?;
            self.value(&entry.value, value)?;
        }
        Ok(())
    }

    fn tuple_value(&mut self, data: &DataNode, elems: &[ResolvedType]) -> Result<(), CodecError> {
        let DataNodeKind::Tuple(values) = &data.kind else {
            return Err(self.mismatch("tuple", data));
        };
        if values.len() != elems.len() {
            return Err(self.mismatch("tuple of matching arity", data));
        }
        for (val, ty) in values.iter().zip(elems) {
            self.value(&val.value, ty)?;
        }
        Ok(())
    }

    /// Members concatenate in declaration order, regardless of the order
    /// the data file wrote them in.
    fn struct_value(&mut self, data: &DataNode, fields: &[ResolvedField]) -> Result<(), CodecError> {
        let DataNodeKind::Map(entries) = &data.kind else {
            return Err(self.mismatch("map", data));
        };
        for field in fields {
            let entry = find_field(entries, field.name)
                .ok_or_else(|| self.mismatch("field", data))?;
            self.value(&entry.value, &field.ty)?;
        }
        Ok(())
    }

    fn enum_value(
        &mut self,
        data: &DataNode,
        e: &kiln_elaborate::ResolvedEnum,
    ) -> Result<(), CodecError> {
        let DataNodeKind::Ident { name, payload } = &data.kind else {
            return Err(self.mismatch("enum variant", data));
        };
        let (index, variant) = e
            .variant(*name)
            .ok_or_else(|| self.mismatch("declared variant", data))?;
        let index_bytes = (index as u64).to_le_bytes();
        self.out.extend_from_slice(&index_bytes[..e.index_width()]);
        match (&variant.payload, payload) {
            (None, None) => Ok(()),
            (Some(ResolvedPayload::Tuple(elems)), Some(value)) => {
                let DataNodeKind::Tuple(values) = &value.kind else {
                    return Err(self.mismatch("tuple payload", value));
                };
                if values.len() != elems.len() {
                    return Err(self.mismatch("payload of matching arity", value));
                }
                for (val, elem) in values.iter().zip(elems) {
                    self.value(&val.value, &elem.ty)?;
                }
                Ok(())
            }
            (Some(ResolvedPayload::Struct(fields)), Some(value)) => {
                self.struct_value(value, fields)
            }
            _ => Err(self.mismatch("matching payload shape", data)),
        }
    }
}

fn find_field(entries: &[MapEntry], name: Ident) -> Option<&MapEntry> {
    entries.iter().find(|entry| {
        matches!(
            &entry.key.kind,
            DataNodeKind::Ident {
                name: key,
                payload: None,
            } if *key == name
        )
    })
}
