//! Length-prefixed binary record codec.
//!
//! Each column is encoded as a 1-byte null flag, followed by its body when
//! not null: `Int` as 8 bytes signed BE, `Float` as 8 bytes IEEE-754 BE,
//! `Text` as a 2-byte BE length followed by UTF-8 bytes.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::Cursor;

use crate::catalog::schema::{ColumnType, TableSchema};
use crate::error::SchemaError;
use crate::value::SqlValue;

const NULL_FLAG: u8 = 0;
const PRESENT_FLAG: u8 = 1;

pub fn encode_row(schema: &TableSchema, values: &[SqlValue]) -> Result<Vec<u8>, SchemaError> {
    if values.len() != schema.columns.len() {
        return Err(SchemaError::ArityMismatch {
            expected: schema.columns.len(),
            got: values.len(),
        });
    }

    let mut buf = Vec::new();
    for (col, value) in schema.columns.iter().zip(values.iter()) {
        if value.is_null() {
            buf.write_u8(NULL_FLAG).unwrap();
            continue;
        }
        buf.write_u8(PRESENT_FLAG).unwrap();
        match (col.dtype, value) {
            (ColumnType::Int, SqlValue::Int(i)) => {
                buf.write_i64::<BigEndian>(*i).unwrap();
            }
            (ColumnType::Float, SqlValue::Float(x)) => {
                buf.write_f64::<BigEndian>(*x).unwrap();
            }
            (ColumnType::Text, SqlValue::Text(s)) => {
                let bytes = s.as_bytes();
                if bytes.len() > u16::MAX as usize {
                    return Err(SchemaError::UnsupportedType(format!(
                        "text value for column {} exceeds {} bytes",
                        col.name,
                        u16::MAX
                    )));
                }
                buf.write_u16::<BigEndian>(bytes.len() as u16).unwrap();
                buf.extend_from_slice(bytes);
            }
            _ => {
                return Err(SchemaError::TypeMismatch {
                    column: col.name.clone(),
                })
            }
        }
    }
    Ok(buf)
}

pub fn decode_row(schema: &TableSchema, bytes: &[u8]) -> Result<Vec<SqlValue>, SchemaError> {
    let mut cursor = Cursor::new(bytes);
    let mut values = Vec::with_capacity(schema.columns.len());
    for col in &schema.columns {
        let flag = cursor
            .read_u8()
            .map_err(|_| SchemaError::BufferTooShort {
                column: col.name.clone(),
            })?;
        if flag == NULL_FLAG {
            values.push(SqlValue::Null);
            continue;
        }
        let value = match col.dtype {
            ColumnType::Int => {
                let i = cursor
                    .read_i64::<BigEndian>()
                    .map_err(|_| SchemaError::BufferTooShort {
                        column: col.name.clone(),
                    })?;
                SqlValue::Int(i)
            }
            ColumnType::Float => {
                let x = cursor
                    .read_f64::<BigEndian>()
                    .map_err(|_| SchemaError::BufferTooShort {
                        column: col.name.clone(),
                    })?;
                SqlValue::Float(x)
            }
            ColumnType::Text => {
                let len = cursor
                    .read_u16::<BigEndian>()
                    .map_err(|_| SchemaError::BufferTooShort {
                        column: col.name.clone(),
                    })? as usize;
                let start = cursor.position() as usize;
                let end = start + len;
                let slice =
                    bytes
                        .get(start..end)
                        .ok_or_else(|| SchemaError::BufferTooShort {
                            column: col.name.clone(),
                        })?;
                let s = std::str::from_utf8(slice)
                    .map_err(|_| SchemaError::UnsupportedType(format!(
                        "column {} is not valid utf-8",
                        col.name
                    )))?
                    .to_string();
                cursor.set_position(end as u64);
                SqlValue::Text(s)
            }
        };
        values.push(value);
    }
    Ok(values)
}
