//! Typed Path Mutation
//!
//! Applies dotted paths (`Rules.3.Name`) directly to strongly-typed struct
//! graphs. Types opt in through capability traits instead of runtime
//! reflection:
//!
//! - structs implement [`Addressable`] (usually through [`addressable!`]),
//!   mapping external field names to their Rust fields
//! - `Option<T>` is a lazily allocated pointer
//! - `Vec<T>` is a sequence that grows densely on demand
//! - scalars, `Duration` and `serde_json::Value` are leaves with coercion
//!
//! The descent itself lives in [`mutator`].

mod coerce;
mod field;
pub mod mutator;

pub use field::{Addressable, Field, LeafSlot, PointerSlot, SequenceSlot, Slot};
pub use mutator::set_typed_field;

/// Implement [`Addressable`] and [`Field`] for plain structs.
///
/// Each entry maps the external (case-sensitive) field name used in paths to
/// the Rust field that backs it. Every backing field type must implement
/// [`Field`].
///
/// ```
/// use stitch::addressable;
///
/// #[derive(Default)]
/// struct Rule {
///     name: String,
///     sample_rate: u32,
/// }
///
/// addressable!(Rule {
///     "Name" => name,
///     "SampleRate" => sample_rate,
/// });
///
/// let mut rule = Rule::default();
/// stitch::typed::set_typed_field("SampleRate", &mut rule, 10).unwrap();
/// assert_eq!(rule.sample_rate, 10);
/// ```
#[macro_export]
macro_rules! addressable {
    ($($ty:ident { $($name:literal => $field:ident),* $(,)? });+ $(;)?) => {
        $(
            impl $crate::typed::Addressable for $ty {
                fn type_name(&self) -> &'static str {
                    stringify!($ty)
                }

                fn field_mut(&mut self, name: &str) -> ::std::option::Option<$crate::typed::Slot<'_>> {
                    match name {
                        $($name => ::std::option::Option::Some($crate::typed::Field::slot(&mut self.$field)),)*
                        _ => ::std::option::Option::None,
                    }
                }
            }

            impl $crate::typed::Field for $ty {
                fn slot(&mut self) -> $crate::typed::Slot<'_> {
                    $crate::typed::Slot::Struct(self)
                }
            }
        )+
    };
}
