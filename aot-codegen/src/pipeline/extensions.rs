//! Type-indexed side channel between generators.

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt,
};

/// A store holding at most one value per Rust type.
///
/// Generators use it to hand data to generators that run after them. The
/// type itself is the tag, so a read always yields the type that was written.
///
/// ```
/// use aotgen_codegen::pipeline::Extensions;
///
/// #[derive(Debug, PartialEq)]
/// struct Seen(u32);
///
/// let mut ext = Extensions::new();
/// assert!(ext.get::<Seen>().is_none());
///
/// ext.put(Seen(1));
/// ext.put(Seen(2));
/// assert_eq!(ext.get::<Seen>(), Some(&Seen(2)));
/// ```
#[derive(Default)]
pub struct Extensions {
    values: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Extensions {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, replacing any previous value of the same type.
    ///
    /// Returns the replaced value.
    pub fn put<T: Any + Send + Sync>(&mut self, value: T) -> Option<T> {
        self.values
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|old| old.downcast::<T>().ok())
            .map(|old| *old)
    }

    /// Get the value of type `T`, if one was stored.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    /// Get a mutable reference to the value of type `T`.
    pub fn get_mut<T: Any + Send + Sync>(&mut self) -> Option<&mut T> {
        self.values
            .get_mut(&TypeId::of::<T>())
            .and_then(|value| value.downcast_mut::<T>())
    }

    /// Remove and return the value of type `T`.
    pub fn remove<T: Any + Send + Sync>(&mut self) -> Option<T> {
        self.values
            .remove(&TypeId::of::<T>())
            .and_then(|value| value.downcast::<T>().ok())
            .map(|value| *value)
    }

    /// Check whether a value of type `T` is stored.
    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<T>())
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extensions")
            .field("len", &self.values.len())
            .finish()
    }
}
