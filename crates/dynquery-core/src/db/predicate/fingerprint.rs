use crate::{
    db::{
        predicate::Predicate,
        resolve::{Branch, FieldPath},
    },
    value::Value,
};
use sha2::{Digest, Sha256};

/// Hash predicate structure into the plan hash stream.
pub(in crate::db) fn hash_predicate(hasher: &mut Sha256, predicate: &Predicate) {
    match predicate {
        Predicate::True => write_tag(hasher, 0x21),
        Predicate::And(children) => {
            write_tag(hasher, 0x23);
            write_len_u32(hasher, children.len());
            for child in children {
                hash_predicate(hasher, child);
            }
        }
        Predicate::Or(children) => {
            write_tag(hasher, 0x24);
            write_len_u32(hasher, children.len());
            for child in children {
                hash_predicate(hasher, child);
            }
        }
        Predicate::Compare(compare) => {
            write_tag(hasher, 0x26);
            hash_field_path(hasher, &compare.field);
            write_tag(hasher, compare.op.tag());
            write_value(hasher, &compare.value);
        }
    }
}

/// Hash a resolved field path: branch walk, owning entity and slot.
pub(in crate::db) fn hash_field_path(hasher: &mut Sha256, path: &FieldPath) {
    write_len_u32(hasher, path.branches.len());
    for branch in &path.branches {
        write_tag(
            hasher,
            match branch {
                Branch::Outer => 0x31,
                Branch::Inner => 0x32,
            },
        );
    }
    write_str(hasher, path.entity.as_str());
    write_len_u32(hasher, path.slot);
}

///
/// Encode one value into the plan hash stream.
///
/// Decimals are normalized so equal values hash identically.
///

pub(in crate::db) fn write_value(hasher: &mut Sha256, value: &Value) {
    match value {
        Value::Null => write_tag(hasher, 0x40),
        Value::Bool(v) => {
            write_tag(hasher, 0x41);
            write_tag(hasher, u8::from(*v));
        }
        Value::Decimal(v) => {
            write_tag(hasher, 0x42);
            write_str(hasher, &v.normalize().to_string());
        }
        Value::Int(v) => {
            write_tag(hasher, 0x43);
            hasher.update(v.to_be_bytes());
        }
        Value::List(items) | Value::Tuple(items) => {
            write_tag(hasher, 0x44);
            write_len_u32(hasher, items.len());
            for item in items {
                write_value(hasher, item);
            }
        }
        Value::Text(v) => {
            write_tag(hasher, 0x45);
            write_str(hasher, v);
        }
        Value::Timestamp(v) => {
            write_tag(hasher, 0x46);
            write_str(hasher, &v.to_string());
        }
        Value::Uint(v) => {
            write_tag(hasher, 0x47);
            hasher.update(v.to_be_bytes());
        }
    }
}

///
/// Encode one string with length prefix into the plan hash stream.
///

pub(in crate::db) fn write_str(hasher: &mut Sha256, value: &str) {
    write_len_u32(hasher, value.len());
    hasher.update(value.as_bytes());
}

/// Encode a platform-sized length as u32 with deterministic saturation.
pub(in crate::db) fn write_len_u32(hasher: &mut Sha256, len: usize) {
    let len = u32::try_from(len).unwrap_or(u32::MAX);
    hasher.update(len.to_be_bytes());
}

///
/// Encode one tag byte into the plan hash stream.
///

pub(in crate::db) fn write_tag(hasher: &mut Sha256, tag: u8) {
    hasher.update([tag]);
}
