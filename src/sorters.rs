//! Orderings applied to selected fields before handlers run.
//!
//! A [`FieldSorter`] is a three-way comparator. Sorting is stable, so fields
//! that compare equal keep their record order.

use crate::error::Result;
use crate::record::Field;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;

/// Three-way comparison of two fields.
pub trait FieldSorter {
    /// Compare `a` with `b`.
    fn compare(&self, a: &Field, b: &Field) -> Ordering;
}

impl<S: FieldSorter + ?Sized> FieldSorter for &S {
    fn compare(&self, a: &Field, b: &Field) -> Ordering {
        (**self).compare(a, b)
    }
}

impl<S: FieldSorter + ?Sized> FieldSorter for Box<S> {
    fn compare(&self, a: &Field, b: &Field) -> Ordering {
        (**self).compare(a, b)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Smallest first (default)
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

impl SortDirection {
    /// Apply the direction to an ascending comparison result.
    #[must_use]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Orders fields by the value of the first subfield whose name matches a pattern.
///
/// Fields without such a subfield (including control fields) sort as if the
/// value were empty.
#[derive(Debug, Clone)]
pub struct SortBySubfields {
    pattern: Regex,
    direction: SortDirection,
}

impl SortBySubfields {
    /// Create an ascending sorter.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MarcError::InvalidPattern`] if the pattern does not compile.
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(SortBySubfields {
            pattern: Regex::new(pattern)?,
            direction: SortDirection::Ascending,
        })
    }

    /// Set the direction.
    #[must_use]
    pub fn with_direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    fn key<'f>(&self, field: &'f Field) -> &'f str {
        field
            .subfields()
            .ok()
            .and_then(|subfields| subfields.iter().find(|sf| self.pattern.is_match(&sf.name)))
            .map_or("", |sf| sf.value.as_str())
    }
}

impl FieldSorter for SortBySubfields {
    fn compare(&self, a: &Field, b: &Field) -> Ordering {
        self.direction.apply(self.key(a).cmp(self.key(b)))
    }
}

/// Adapts a comparison closure into a sorter.
pub struct SortWith<F>(pub F);

impl<F> fmt::Debug for SortWith<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortWith").finish_non_exhaustive()
    }
}

impl<F: Fn(&Field, &Field) -> Ordering> FieldSorter for SortWith<F> {
    fn compare(&self, a: &Field, b: &Field) -> Ordering {
        (self.0)(a, b)
    }
}

/// A list of sorters; the first one that tells two fields apart decides.
#[derive(Default)]
pub struct SortChain {
    sorters: Vec<Box<dyn FieldSorter>>,
}

impl fmt::Debug for SortChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortChain")
            .field("sorters", &self.sorters.len())
            .finish()
    }
}

impl SortChain {
    /// Create an empty chain, which considers all fields equal.
    #[must_use]
    pub fn new() -> Self {
        SortChain::default()
    }

    /// Append a sorter to the chain.
    #[must_use]
    pub fn then(mut self, sorter: impl FieldSorter + 'static) -> Self {
        self.sorters.push(Box::new(sorter));
        self
    }
}

impl FieldSorter for SortChain {
    fn compare(&self, a: &Field, b: &Field) -> Ordering {
        self.sorters
            .iter()
            .map(|sorter| sorter.compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

/// Stable sort of selected fields.
pub(crate) fn sort_fields(fields: &mut [&Field], sorter: &dyn FieldSorter) {
    fields.sort_by(|a, b| sorter.compare(a, b));
}
