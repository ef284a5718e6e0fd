//! Path descent over typed struct graphs.
//!
//! Failures are fail-fast: the first error aborts the call. Pointers
//! allocated and sequence slots grown before the failing segment stay in
//! place; they hold zero values and a retry reuses them.

use crate::error::PathError;
use crate::path::{parse_typed_path, Path, PathSegment};
use crate::tree::kind_name;
use crate::typed::field::{Addressable, Field, LeafSlot, SequenceSlot, Slot};
use serde_json::Value;

/// A slot with every pointer on the way already materialized
enum Resolved<'a> {
    Struct(&'a mut dyn Addressable),
    Sequence(&'a mut dyn SequenceSlot),
    Leaf(&'a mut dyn LeafSlot),
}

fn resolve(slot: Slot<'_>) -> Resolved<'_> {
    match slot {
        Slot::Pointer(pointer) => resolve(pointer.materialize()),
        Slot::Struct(target) => Resolved::Struct(target),
        Slot::Sequence(sequence) => Resolved::Sequence(sequence),
        Slot::Leaf(leaf) => Resolved::Leaf(leaf),
    }
}

/// Set the field addressed by `path` inside `target` to `value`.
///
/// `target` is never allocated here: a nil root pointer is a
/// [`PathError::NilRoot`]. Every pointer and sequence slot below it is
/// created on demand.
pub fn set_typed_field<T, V>(path: &str, target: &mut T, value: V) -> Result<(), PathError>
where
    T: Field + ?Sized,
    V: Into<Value>,
{
    let parsed = parse_typed_path(path)?;
    let root = target.slot();
    if let Slot::Pointer(pointer) = &root {
        if pointer.is_nil() {
            return Err(PathError::NilRoot {
                type_name: pointer.type_name(),
            });
        }
    }
    descend(root, parsed.segments(), &parsed, value.into())
}

fn descend(
    slot: Slot<'_>,
    segments: &[PathSegment],
    path: &Path,
    value: Value,
) -> Result<(), PathError> {
    let resolved = resolve(slot);
    let Some((head, rest)) = segments.split_first() else {
        return assign_resolved(resolved, value);
    };

    match resolved {
        Resolved::Struct(target) => {
            let owner = target.type_name();
            let name = match head {
                PathSegment::FieldName(name) => name.as_str(),
                PathSegment::Index(index) => {
                    return Err(PathError::UnknownField {
                        field: index.to_string(),
                        owner,
                    })
                }
            };
            let field = target
                .field_mut(name)
                .ok_or_else(|| PathError::UnknownField {
                    field: name.to_string(),
                    owner,
                })?;
            descend(field, rest, path, value)
        }
        Resolved::Sequence(sequence) => match head {
            PathSegment::Index(index) => descend(sequence.element(*index), rest, path, value),
            PathSegment::FieldName(name) => Err(PathError::malformed(
                &path.to_string(),
                format!(
                    "expected an index into {}, found '{}'",
                    sequence.type_name(),
                    name
                ),
            )),
        },
        Resolved::Leaf(leaf) => Err(PathError::NotAStruct {
            segment: match head {
                PathSegment::FieldName(name) => name.clone(),
                PathSegment::Index(index) => index.to_string(),
            },
            type_name: leaf.type_name(),
        }),
    }
}

/// Terminal assignment of a generic value onto any slot.
///
/// Leaves coerce, sequences take a whole sequence value, structs take a
/// mapping whose keys are applied one field at a time.
pub(crate) fn assign(slot: Slot<'_>, value: Value) -> Result<(), PathError> {
    assign_resolved(resolve(slot), value)
}

fn assign_resolved(resolved: Resolved<'_>, value: Value) -> Result<(), PathError> {
    match resolved {
        Resolved::Leaf(leaf) => leaf.assign(value),
        Resolved::Sequence(sequence) => match value {
            Value::Array(items) => sequence.replace(items),
            other => Err(PathError::TypeMismatch {
                expected: sequence.type_name(),
                found: kind_name(&other),
            }),
        },
        Resolved::Struct(target) => match value {
            Value::Object(map) => {
                validate_fields(target, &map)?;
                for (name, field_value) in map {
                    let owner = target.type_name();
                    let field = target
                        .field_mut(&name)
                        .ok_or_else(|| PathError::UnknownField {
                            field: name.clone(),
                            owner,
                        })?;
                    assign(field, field_value)?;
                }
                Ok(())
            }
            other => Err(PathError::TypeMismatch {
                expected: target.type_name(),
                found: kind_name(&other),
            }),
        },
    }
}

/// Dry run of [`assign`]: same errors, no writes and no allocation.
fn validate(slot: Slot<'_>, value: &Value) -> Result<(), PathError> {
    match slot {
        Slot::Leaf(leaf) => leaf.validate(value),
        Slot::Pointer(pointer) => pointer.validate(value),
        Slot::Sequence(sequence) => match value {
            Value::Array(items) => sequence.validate(items),
            other => Err(PathError::TypeMismatch {
                expected: sequence.type_name(),
                found: kind_name(other),
            }),
        },
        Slot::Struct(target) => match value {
            Value::Object(map) => validate_fields(target, map),
            other => Err(PathError::TypeMismatch {
                expected: target.type_name(),
                found: kind_name(other),
            }),
        },
    }
}

fn validate_fields(
    target: &mut dyn Addressable,
    map: &serde_json::Map<String, Value>,
) -> Result<(), PathError> {
    for (name, field_value) in map {
        let owner = target.type_name();
        let field = target
            .field_mut(name)
            .ok_or_else(|| PathError::UnknownField {
                field: name.clone(),
                owner,
            })?;
        validate(field, field_value)?;
    }
    Ok(())
}
