//! Capability traits for addressable struct graphs.
//!
//! A struct owns its pointer fields and sequence elements exclusively; all
//! allocation during descent goes through `Default` on the owned type.

use crate::error::PathError;
use crate::typed::mutator::assign;
use serde_json::Value;
use tracing::trace;

/// A mutable handle on one position of a struct graph
pub enum Slot<'a> {
    Struct(&'a mut dyn Addressable),
    Pointer(&'a mut dyn PointerSlot),
    Sequence(&'a mut dyn SequenceSlot),
    Leaf(&'a mut dyn LeafSlot),
}

/// Anything that can sit at a position in a struct graph.
pub trait Field {
    fn slot(&mut self) -> Slot<'_>;
}

/// A struct whose fields can be looked up by their external name.
pub trait Addressable {
    fn type_name(&self) -> &'static str;

    /// Exact, case-sensitive lookup. `None` for unknown names.
    fn field_mut(&mut self, name: &str) -> Option<Slot<'_>>;
}

/// A nullable, owned pointer.
pub trait PointerSlot {
    fn type_name(&self) -> &'static str;

    fn is_nil(&self) -> bool;

    /// Allocate the zero value if nil, then hand out the pointee.
    fn materialize(&mut self) -> Slot<'_>;

    /// Check that `value` would assign onto the pointee, without allocating.
    fn validate(&self, value: &Value) -> Result<(), PathError>;
}

/// A growable sequence.
pub trait SequenceSlot {
    fn type_name(&self) -> &'static str;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grow to `index + 1` with zero values if needed, then hand out the element.
    fn element(&mut self, index: usize) -> Slot<'_>;

    /// Replace the whole sequence, coercing every element. Leaves the
    /// sequence untouched if any element fails.
    fn replace(&mut self, items: Vec<Value>) -> Result<(), PathError>;

    /// Check that `items` would replace the sequence, without touching it.
    fn validate(&self, items: &[Value]) -> Result<(), PathError>;
}

/// A terminal value with coercion from generic values.
pub trait LeafSlot {
    fn type_name(&self) -> &'static str;

    fn assign(&mut self, value: Value) -> Result<(), PathError>;

    fn validate(&self, value: &Value) -> Result<(), PathError>;
}

impl<T: Field + Default> PointerSlot for Option<T> {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn is_nil(&self) -> bool {
        self.is_none()
    }

    fn materialize(&mut self) -> Slot<'_> {
        if self.is_none() {
            trace!(pointee = std::any::type_name::<T>(), "Allocating nil pointer");
        }
        self.get_or_insert_with(T::default).slot()
    }

    fn validate(&self, value: &Value) -> Result<(), PathError> {
        let mut scratch = T::default();
        assign(scratch.slot(), value.clone())
    }
}

impl<T: Field + Default> Field for Option<T> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Pointer(self)
    }
}

impl<T: Field + ?Sized> Field for Box<T> {
    fn slot(&mut self) -> Slot<'_> {
        (**self).slot()
    }
}

impl<T: Field + Default> SequenceSlot for Vec<T> {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn element(&mut self, index: usize) -> Slot<'_> {
        if index >= Vec::len(self) {
            trace!(from = Vec::len(self), to = index + 1, "Growing sequence");
            self.resize_with(index + 1, T::default);
        }
        self[index].slot()
    }

    fn replace(&mut self, items: Vec<Value>) -> Result<(), PathError> {
        let mut fresh = Vec::with_capacity(items.len());
        for item in items {
            let mut element = T::default();
            assign(element.slot(), item)?;
            fresh.push(element);
        }
        *self = fresh;
        Ok(())
    }

    fn validate(&self, items: &[Value]) -> Result<(), PathError> {
        for item in items {
            let mut scratch = T::default();
            assign(scratch.slot(), item.clone())?;
        }
        Ok(())
    }
}

impl<T: Field + Default> Field for Vec<T> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Sequence(self)
    }
}
