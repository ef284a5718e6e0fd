//! Path addressing
//!
//! A [`Path`] is an ordered, non-empty list of [`PathSegment`]s. Two grammars
//! produce paths and they are kept as separate entry points:
//!
//! - [`parse_tree_path`]: dotted names with bracketed indices (`a.b[2].c`),
//!   used for generic trees. Bare numeric segments are plain names here.
//! - [`parse_typed_path`]: dotted segments only (`Rules.3.Name`), used for
//!   typed struct graphs. A purely numeric segment becomes an index and the
//!   mutator decides whether an index is legal at that position.
//!
//! Indices above [`MAX_INDEX`] are rejected by both grammars, since
//! addressing an index grows the sequence densely up to it.

use crate::error::PathError;
use std::fmt;

/// Largest index either grammar accepts.
pub const MAX_INDEX: usize = 1 << 20;

/// One step of a path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    FieldName(String),
    Index(usize),
}

/// A non-empty, ordered address into a tree or a typed struct graph
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false for parsed paths; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append `other` to a copy of this path.
    pub fn join(&self, other: &Path) -> Path {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Path { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::FieldName(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// Parse a generic-tree path: `name`, `name[idx]`, `name[i][j]`, joined by dots.
pub fn parse_tree_path(path: &str) -> Result<Path, PathError> {
    if path.is_empty() {
        return Err(PathError::malformed(path, "path is empty"));
    }

    let mut segments = Vec::new();
    for piece in path.split('.') {
        let (name, mut rest) = match piece.find('[') {
            Some(open) => piece.split_at(open),
            None => (piece, ""),
        };
        if name.is_empty() {
            return Err(PathError::malformed(path, "empty field name"));
        }
        if name.contains(']') {
            return Err(PathError::malformed(path, "unbalanced ']'"));
        }
        segments.push(PathSegment::FieldName(name.to_string()));

        while !rest.is_empty() {
            let Some(body) = rest.strip_prefix('[') else {
                return Err(PathError::malformed(
                    path,
                    format!("unexpected text '{}' after index", rest),
                ));
            };
            let Some(close) = body.find(']') else {
                return Err(PathError::malformed(path, "unbalanced '['"));
            };
            segments.push(PathSegment::Index(parse_index(path, &body[..close])?));
            rest = &body[close + 1..];
        }
    }

    Ok(Path { segments })
}

/// Parse a typed-struct path: dot-separated segments, numeric segments become indices.
pub fn parse_typed_path(path: &str) -> Result<Path, PathError> {
    if path.is_empty() {
        return Err(PathError::malformed(path, "path is empty"));
    }
    if path.contains(['[', ']']) {
        return Err(PathError::malformed(
            path,
            "bracket indices are not valid in typed paths, use 'field.N'",
        ));
    }

    let segments = path
        .split('.')
        .map(|piece| {
            if piece.is_empty() {
                Err(PathError::malformed(path, "empty segment"))
            } else if piece.bytes().all(|b| b.is_ascii_digit()) {
                parse_index(path, piece).map(PathSegment::Index)
            } else {
                Ok(PathSegment::FieldName(piece.to_string()))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Path { segments })
}

fn parse_index(path: &str, digits: &str) -> Result<usize, PathError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PathError::malformed(
            path,
            format!("'{}' is not a non-negative integer index", digits),
        ));
    }
    match digits.parse::<usize>() {
        Ok(index) if index <= MAX_INDEX => Ok(index),
        _ => Err(PathError::malformed(
            path,
            format!("index '{}' exceeds the maximum of {}", digits, MAX_INDEX),
        )),
    }
}
