//! Field and subfield matchers used to select what a traversal visits.
//!
//! Traversals are generic over two small capabilities:
//!
//! - [`FieldMatcher`] decides whether a field of a record is selected
//! - [`SubfieldMatcher`] decides whether a subfield of a field is selected
//!
//! Matchers take `&mut self` because [`MatchField`] counts how often each
//! field name has matched so far. That count lets one matcher select only
//! a given occurrence, e.g. "the second 700 field". Counts live for as long
//! as the matcher does; call [`MatchField::reset`] before reusing a matcher
//! for an unrelated traversal.
//!
//! A bare [`Regex`] is a matcher too. As a field matcher it tests the field
//! name; as a subfield matcher it tests the subfield name. `None::<M>` and
//! [`MatchAll`] select everything.
//!
//! # Examples
//!
//! ```ignore
//! // Only the first 700 field
//! let mut first_700 = MatchField::field("700")?.bounds(Some(1), None);
//! let selected = EachFactory::new(&record).select_fields(&mut first_700);
//!
//! // 245 fields that have an $a followed somewhere by an $e
//! let matcher = MatchField::new(Some("245"), None, Some("a.*e"))?;
//! ```

use crate::error::Result;
use crate::record::{Field, Record, Subfield};
use indexmap::IndexMap;
use regex::Regex;
use std::fmt;

/// Decides whether a field is selected.
pub trait FieldMatcher {
    /// Return `true` if `field` (contained in `record`) is selected.
    fn match_field(&mut self, record: &Record, field: &Field) -> bool;
}

/// Decides whether a subfield is selected.
pub trait SubfieldMatcher {
    /// Return `true` if `subfield` (contained in `field`) is selected.
    fn match_subfield(&mut self, field: &Field, subfield: &Subfield) -> bool;
}

impl<M: FieldMatcher + ?Sized> FieldMatcher for &mut M {
    fn match_field(&mut self, record: &Record, field: &Field) -> bool {
        (**self).match_field(record, field)
    }
}

impl<M: FieldMatcher + ?Sized> FieldMatcher for Box<M> {
    fn match_field(&mut self, record: &Record, field: &Field) -> bool {
        (**self).match_field(record, field)
    }
}

impl<M: SubfieldMatcher + ?Sized> SubfieldMatcher for &mut M {
    fn match_subfield(&mut self, field: &Field, subfield: &Subfield) -> bool {
        (**self).match_subfield(field, subfield)
    }
}

impl<M: SubfieldMatcher + ?Sized> SubfieldMatcher for Box<M> {
    fn match_subfield(&mut self, field: &Field, subfield: &Subfield) -> bool {
        (**self).match_subfield(field, subfield)
    }
}

/// An absent matcher selects everything.
impl<M: FieldMatcher> FieldMatcher for Option<M> {
    fn match_field(&mut self, record: &Record, field: &Field) -> bool {
        self.as_mut().map_or(true, |m| m.match_field(record, field))
    }
}

impl<M: SubfieldMatcher> SubfieldMatcher for Option<M> {
    fn match_subfield(&mut self, field: &Field, subfield: &Subfield) -> bool {
        self.as_mut().map_or(true, |m| m.match_subfield(field, subfield))
    }
}

impl FieldMatcher for Regex {
    fn match_field(&mut self, _record: &Record, field: &Field) -> bool {
        self.is_match(field.name())
    }
}

impl FieldMatcher for &Regex {
    fn match_field(&mut self, _record: &Record, field: &Field) -> bool {
        self.is_match(field.name())
    }
}

impl SubfieldMatcher for Regex {
    fn match_subfield(&mut self, _field: &Field, subfield: &Subfield) -> bool {
        self.is_match(&subfield.name)
    }
}

impl SubfieldMatcher for &Regex {
    fn match_subfield(&mut self, _field: &Field, subfield: &Subfield) -> bool {
        self.is_match(&subfield.name)
    }
}

/// Matches every field and every subfield.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchAll;

impl FieldMatcher for MatchAll {
    fn match_field(&mut self, _record: &Record, _field: &Field) -> bool {
        true
    }
}

impl SubfieldMatcher for MatchAll {
    fn match_subfield(&mut self, _field: &Field, _subfield: &Subfield) -> bool {
        true
    }
}

fn compile(pattern: Option<&str>) -> Result<Option<Regex>> {
    Ok(pattern.map(Regex::new).transpose()?)
}

/// Field matcher on name, indicator and subfield layout, with occurrence bounds.
///
/// Each pattern is optional. When present:
/// - the field name must match `field`
/// - the indicator must match `indicator` (control fields never do)
/// - the concatenated subfield names, e.g. `"0ah"`, must match `subfields`
///
/// Once a field passes those tests its name's counter is incremented, and the
/// field is selected only if the new count lies within `[min, max]`.
#[derive(Debug, Clone, Default)]
pub struct MatchField {
    field: Option<Regex>,
    indicator: Option<Regex>,
    subfields: Option<Regex>,
    min: Option<usize>,
    max: Option<usize>,
    counters: IndexMap<String, usize>,
}

impl MatchField {
    /// Create a matcher from optional patterns.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MarcError::InvalidPattern`] if a pattern does not compile.
    pub fn new(
        field: Option<&str>,
        indicator: Option<&str>,
        subfields: Option<&str>,
    ) -> Result<Self> {
        Ok(MatchField {
            field: compile(field)?,
            indicator: compile(indicator)?,
            subfields: compile(subfields)?,
            ..MatchField::default()
        })
    }

    /// Create a matcher on the field name only.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MarcError::InvalidPattern`] if the pattern does not compile.
    pub fn field(pattern: &str) -> Result<Self> {
        MatchField::new(Some(pattern), None, None)
    }

    /// Restrict matches to occurrences `min..=max` of each field name (1-based).
    ///
    /// A missing `max` defaults to `min`, so `bounds(Some(2), None)` selects
    /// exactly the second occurrence.
    #[must_use]
    pub fn bounds(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min = min;
        self.max = max.or(min);
        self
    }

    /// Forget all occurrence counts.
    pub fn reset(&mut self) {
        self.counters.clear();
    }

    /// How many times fields named `name` have passed the pattern tests so far.
    #[must_use]
    pub fn count_for(&self, name: &str) -> usize {
        self.counters.get(name).copied().unwrap_or(0)
    }

    fn matches_structure(&self, field: &Field) -> bool {
        if let Some(pattern) = &self.field {
            if !pattern.is_match(field.name()) {
                return false;
            }
        }
        if let Some(pattern) = &self.indicator {
            match field.indicator() {
                Ok(indicator) if pattern.is_match(indicator) => {},
                _ => return false,
            }
        }
        if let Some(pattern) = &self.subfields {
            if !pattern.is_match(&field.subfield_names()) {
                return false;
            }
        }
        true
    }
}

impl FieldMatcher for MatchField {
    fn match_field(&mut self, _record: &Record, field: &Field) -> bool {
        if !self.matches_structure(field) {
            return false;
        }
        let count = self.counters.entry(field.name().to_string()).or_insert(0);
        *count += 1;
        let count = *count;
        self.min.map_or(true, |min| count >= min) && self.max.map_or(true, |max| count <= max)
    }
}

/// Subfield matcher on optional name and value patterns.
#[derive(Debug, Clone, Default)]
pub struct MatchSubField {
    name: Option<Regex>,
    value: Option<Regex>,
}

impl MatchSubField {
    /// Create a matcher from optional name and value patterns.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MarcError::InvalidPattern`] if a pattern does not compile.
    pub fn new(name: Option<&str>, value: Option<&str>) -> Result<Self> {
        Ok(MatchSubField {
            name: compile(name)?,
            value: compile(value)?,
        })
    }

    /// Create a matcher on the subfield name only.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MarcError::InvalidPattern`] if the pattern does not compile.
    pub fn name(pattern: &str) -> Result<Self> {
        MatchSubField::new(Some(pattern), None)
    }
}

impl SubfieldMatcher for MatchSubField {
    fn match_subfield(&mut self, _field: &Field, subfield: &Subfield) -> bool {
        self.name.as_ref().map_or(true, |p| p.is_match(&subfield.name))
            && self.value.as_ref().map_or(true, |p| p.is_match(&subfield.value))
    }
}

/// [`MatchField`] with the indicator left unconstrained.
#[derive(Debug, Clone, Default)]
pub struct DbcMatchField {
    inner: MatchField,
}

impl DbcMatchField {
    /// Create a matcher on field name and subfield layout.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MarcError::InvalidPattern`] if a pattern does not compile.
    pub fn new(field: Option<&str>, subfields: Option<&str>) -> Result<Self> {
        Ok(DbcMatchField {
            inner: MatchField::new(field, None, subfields)?,
        })
    }

    /// See [`MatchField::bounds`].
    #[must_use]
    pub fn bounds(self, min: Option<usize>, max: Option<usize>) -> Self {
        DbcMatchField {
            inner: self.inner.bounds(min, max),
        }
    }

    /// See [`MatchField::reset`].
    pub fn reset(&mut self) {
        self.inner.reset();
    }
}

impl FieldMatcher for DbcMatchField {
    fn match_field(&mut self, record: &Record, field: &Field) -> bool {
        self.inner.match_field(record, field)
    }
}

/// Adapts a predicate closure into a matcher.
///
/// A closure over `&Field` is a [`FieldMatcher`]; a closure over `&Subfield`
/// is a [`SubfieldMatcher`].
///
/// ```
/// use marcline::{Field, MatchFunc, Record};
///
/// let record: Record = "700 00 *a Hansen\n245 00 *a Title\n".parse().unwrap();
/// let mut has_a = MatchFunc(|f: &Field| f.name() == "700" && f.count_named("a").unwrap_or(0) > 0);
/// assert_eq!(record.select_fields(&mut has_a).len(), 1);
/// ```
pub struct MatchFunc<F>(pub F);

impl<F> fmt::Debug for MatchFunc<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchFunc").finish_non_exhaustive()
    }
}

impl<F: FnMut(&Field) -> bool> FieldMatcher for MatchFunc<F> {
    fn match_field(&mut self, _record: &Record, field: &Field) -> bool {
        (self.0)(field)
    }
}

impl<F: FnMut(&Subfield) -> bool> SubfieldMatcher for MatchFunc<F> {
    fn match_subfield(&mut self, _field: &Field, subfield: &Subfield) -> bool {
        (self.0)(subfield)
    }
}
