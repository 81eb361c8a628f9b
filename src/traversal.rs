//! Matcher-driven traversal over fields and subfields.
//!
//! [`EachFactory`] selects fields of a record with a [`FieldMatcher`],
//! optionally orders them with a [`FieldSorter`], calls a handler for each
//! one and folds the handler results with [`Combine`]. The same operations
//! exist for the subfields of a field, and [`Record`] / [`Field`] expose them
//! as inherent methods.
//!
//! Handlers receive the container and the element: `(record, field)` for
//! field traversals and `(field, subfield)` for subfield traversals. A plain
//! closure works, and so does a [`Handler`], which carries a mutable context
//! value into every call.
//!
//! [`MatchMap`] and [`SubfieldMap`] dispatch by exact name instead of by matcher.
//!
//! # Examples
//!
//! ```
//! use marcline::{Field, Record};
//! use regex::Regex;
//!
//! let record: Record = "700 00 *a Marvin\n700 00 *a Richard\n245 00 *a Title\n"
//!     .parse()
//!     .unwrap();
//!
//! let names = record.each_field(Regex::new("700").unwrap(), |_: &Record, f: &Field| {
//!     format!("{};", f.subfield_named("a").unwrap().unwrap().value)
//! });
//! assert_eq!(names, "Marvin;Richard;");
//!
//! let count = record.each_field(Regex::new("700").unwrap(), |_: &Record, _: &Field| 1usize);
//! assert_eq!(count, 2);
//! ```

use crate::error::Result;
use crate::matchers::{FieldMatcher, SubfieldMatcher};
use crate::record::{Field, Record, Subfield};
use crate::sorters::{sort_fields, FieldSorter};
use indexmap::IndexMap;
use std::fmt;

/// Folding of handler results.
///
/// The first result of a traversal is taken as is; each later result is
/// combined onto it. A traversal that visits nothing yields `Default::default()`.
pub trait Combine: Default {
    /// Combine an accumulated value with the next result.
    #[must_use]
    fn combine(self, next: Self) -> Self;

    /// Whether the value counts as "no result" for the `first_*` traversals.
    ///
    /// Empty strings and collections, `None` and `()` are blank. Numbers and
    /// booleans never are, so `0` and `false` end a `first_*` traversal.
    fn is_blank(&self) -> bool;
}

impl Combine for String {
    fn combine(mut self, next: Self) -> Self {
        self.push_str(&next);
        self
    }

    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Combine for () {
    fn combine(self, (): Self) -> Self {}

    fn is_blank(&self) -> bool {
        true
    }
}

impl Combine for bool {
    fn combine(self, next: Self) -> Self {
        self || next
    }

    fn is_blank(&self) -> bool {
        false
    }
}

macro_rules! impl_combine_for_integers {
    ($($t:ty),*) => {
        $(
            impl Combine for $t {
                fn combine(self, next: Self) -> Self {
                    self + next
                }

                fn is_blank(&self) -> bool {
                    false
                }
            }
        )*
    };
}

impl_combine_for_integers!(i32, i64, u32, u64, usize);

impl<T> Combine for Vec<T> {
    fn combine(mut self, next: Self) -> Self {
        self.extend(next);
        self
    }

    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Combine> Combine for Option<T> {
    fn combine(self, next: Self) -> Self {
        match (self, next) {
            (Some(acc), Some(next)) => Some(acc.combine(next)),
            (acc, None) => acc,
            (None, next) => next,
        }
    }

    fn is_blank(&self) -> bool {
        self.as_ref().map_or(true, Combine::is_blank)
    }
}

fn fold<R: Combine>(results: impl Iterator<Item = R>) -> R {
    results.reduce(Combine::combine).unwrap_or_default()
}

/// Called for each selected field.
pub trait FieldHandler<R> {
    /// Handle `field` of `record`.
    fn handle(&mut self, record: &Record, field: &Field) -> R;
}

impl<R, F: FnMut(&Record, &Field) -> R> FieldHandler<R> for F {
    fn handle(&mut self, record: &Record, field: &Field) -> R {
        self(record, field)
    }
}

/// Called for each selected subfield.
pub trait SubfieldHandler<R> {
    /// Handle `subfield` of `field`.
    fn handle(&mut self, field: &Field, subfield: &Subfield) -> R;
}

impl<R, F: FnMut(&Field, &Subfield) -> R> SubfieldHandler<R> for F {
    fn handle(&mut self, field: &Field, subfield: &Subfield) -> R {
        self(field, subfield)
    }
}

/// A handler function bound to a context value.
///
/// The function receives `&mut context` ahead of the usual arguments, so
/// state can be gathered across calls and taken back afterwards.
///
/// ```
/// use marcline::{Field, Handler, Record};
/// use regex::Regex;
///
/// let record: Record = "001 00 *a 1\n002 00 *a 2\n".parse().unwrap();
/// let mut handler = Handler::new(Vec::new(), |seen: &mut Vec<String>, _: &Record, f: &Field| {
///     seen.push(f.name().to_string());
/// });
/// record.each_field(Regex::new(".").unwrap(), &mut handler);
/// assert_eq!(handler.into_context(), vec!["001", "002"]);
/// ```
pub struct Handler<C, F> {
    /// The value passed to every call
    pub context: C,
    func: F,
}

impl<C: fmt::Debug, F> fmt::Debug for Handler<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl<C, F> Handler<C, F> {
    /// Bind `func` to `context`.
    pub fn new(context: C, func: F) -> Self {
        Handler { context, func }
    }

    /// Take the context back.
    pub fn into_context(self) -> C {
        self.context
    }
}

impl<C, F, R> FieldHandler<R> for Handler<C, F>
where
    F: FnMut(&mut C, &Record, &Field) -> R,
{
    fn handle(&mut self, record: &Record, field: &Field) -> R {
        (self.func)(&mut self.context, record, field)
    }
}

impl<C, F, R> SubfieldHandler<R> for Handler<C, F>
where
    F: FnMut(&mut C, &Field, &Subfield) -> R,
{
    fn handle(&mut self, field: &Field, subfield: &Subfield) -> R {
        (self.func)(&mut self.context, field, subfield)
    }
}

impl<C, F, R> FieldHandler<R> for &mut Handler<C, F>
where
    F: FnMut(&mut C, &Record, &Field) -> R,
{
    fn handle(&mut self, record: &Record, field: &Field) -> R {
        (**self).handle(record, field)
    }
}

impl<C, F, R> SubfieldHandler<R> for &mut Handler<C, F>
where
    F: FnMut(&mut C, &Field, &Subfield) -> R,
{
    fn handle(&mut self, field: &Field, subfield: &Subfield) -> R {
        (**self).handle(field, subfield)
    }
}

/// Round robin over several lists until the longest one is exhausted.
fn interleave<'a, T>(lists: &'a [Vec<&'a T>]) -> impl Iterator<Item = &'a T> + 'a {
    let longest = lists.iter().map(Vec::len).max().unwrap_or(0);
    (0..longest).flat_map(move |i| lists.iter().filter_map(move |list| list.get(i).copied()))
}

/// Drives traversals over one record.
///
/// The selected fields are borrowed from the record, so the record cannot be
/// changed while a traversal is running. To remove what a traversal found,
/// collect first and mutate afterwards (see
/// [`crate::RecordHelpers::remove_with_matcher`]).
#[derive(Clone, Copy)]
pub struct EachFactory<'r> {
    record: &'r Record,
    sorter: Option<&'r dyn FieldSorter>,
}

impl fmt::Debug for EachFactory<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EachFactory")
            .field("fields", &self.record.size())
            .field("sorted", &self.sorter.is_some())
            .finish()
    }
}

impl<'r> EachFactory<'r> {
    /// Traverse `record` in field order.
    #[must_use]
    pub fn new(record: &'r Record) -> Self {
        EachFactory {
            record,
            sorter: None,
        }
    }

    /// Traverse `record`, ordering each selection with `sorter`.
    #[must_use]
    pub fn with_sorter(record: &'r Record, sorter: &'r dyn FieldSorter) -> Self {
        EachFactory {
            record,
            sorter: Some(sorter),
        }
    }

    /// Fields for which `matcher` returns `true`, in record order (then sorted).
    pub fn select_fields<M: FieldMatcher>(&self, mut matcher: M) -> Vec<&'r Field> {
        let record = self.record;
        let mut selected: Vec<&'r Field> = record
            .fields()
            .iter()
            .filter(|field| matcher.match_field(record, field))
            .collect();
        if let Some(sorter) = self.sorter {
            sort_fields(&mut selected, sorter);
        }
        selected
    }

    /// Concatenation of [`EachFactory::select_fields`] for each matcher, in matcher order.
    pub fn select_fields_sequence<M, I>(&self, matchers: I) -> Vec<&'r Field>
    where
        M: FieldMatcher,
        I: IntoIterator<Item = M>,
    {
        matchers
            .into_iter()
            .flat_map(|matcher| self.select_fields(matcher))
            .collect()
    }

    /// Call `handler` for each selected field and fold the results.
    pub fn each_field<M, H, R>(&self, matcher: M, mut handler: H) -> R
    where
        M: FieldMatcher,
        H: FieldHandler<R>,
        R: Combine,
    {
        let record = self.record;
        fold(
            self.select_fields(matcher)
                .into_iter()
                .map(|field| handler.handle(record, field)),
        )
    }

    /// Call `handler` for selected fields until it returns a non-blank result.
    ///
    /// Returns that result, or `R::default()` if every result was blank.
    pub fn first_field<M, H, R>(&self, matcher: M, mut handler: H) -> R
    where
        M: FieldMatcher,
        H: FieldHandler<R>,
        R: Combine,
    {
        let record = self.record;
        self.select_fields(matcher)
            .into_iter()
            .map(|field| handler.handle(record, field))
            .find(|result| !result.is_blank())
            .unwrap_or_default()
    }

    /// Visit the first field selected by each matcher, then the second of
    /// each, and so on until the longest selection is exhausted.
    pub fn each_field_sequence<M, I, H, R>(&self, matchers: I, mut handler: H) -> R
    where
        M: FieldMatcher,
        I: IntoIterator<Item = M>,
        H: FieldHandler<R>,
        R: Combine,
    {
        let record = self.record;
        let lists: Vec<Vec<&Field>> = matchers
            .into_iter()
            .map(|matcher| self.select_fields(matcher))
            .collect();
        fold(interleave(&lists).map(|field| handler.handle(record, field)))
    }

    /// Subfields of `field` for which `matcher` returns `true`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MarcError::StateViolation`] on a control field.
    pub fn select_subfields<'f, M: SubfieldMatcher>(
        field: &'f Field,
        mut matcher: M,
    ) -> Result<Vec<&'f Subfield>> {
        Ok(field
            .subfields()?
            .iter()
            .filter(|subfield| matcher.match_subfield(field, subfield))
            .collect())
    }

    /// Call `handler` for each selected subfield and fold the results.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MarcError::StateViolation`] on a control field.
    pub fn each_subfield<M, H, R>(field: &Field, matcher: M, mut handler: H) -> Result<R>
    where
        M: SubfieldMatcher,
        H: SubfieldHandler<R>,
        R: Combine,
    {
        Ok(fold(
            Self::select_subfields(field, matcher)?
                .into_iter()
                .map(|subfield| handler.handle(field, subfield)),
        ))
    }

    /// Call `handler` for selected subfields until it returns a non-blank result.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MarcError::StateViolation`] on a control field.
    pub fn first_subfield<M, H, R>(field: &Field, matcher: M, mut handler: H) -> Result<R>
    where
        M: SubfieldMatcher,
        H: SubfieldHandler<R>,
        R: Combine,
    {
        Ok(Self::select_subfields(field, matcher)?
            .into_iter()
            .map(|subfield| handler.handle(field, subfield))
            .find(|result| !result.is_blank())
            .unwrap_or_default())
    }

    /// Round robin over the subfields selected by each matcher.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MarcError::StateViolation`] on a control field.
    pub fn each_subfield_sequence<M, I, H, R>(
        field: &Field,
        matchers: I,
        mut handler: H,
    ) -> Result<R>
    where
        M: SubfieldMatcher,
        I: IntoIterator<Item = M>,
        H: SubfieldHandler<R>,
        R: Combine,
    {
        let lists = matchers
            .into_iter()
            .map(|matcher| Self::select_subfields(field, matcher))
            .collect::<Result<Vec<_>>>()?;
        Ok(fold(
            interleave(&lists).map(|subfield| handler.handle(field, subfield)),
        ))
    }
}

impl Record {
    /// A traversal over this record that orders selections with `sorter`.
    #[must_use]
    pub fn sorted_by<'r>(&'r self, sorter: &'r dyn FieldSorter) -> EachFactory<'r> {
        EachFactory::with_sorter(self, sorter)
    }

    /// See [`EachFactory::select_fields`].
    pub fn select_fields<M: FieldMatcher>(&self, matcher: M) -> Vec<&Field> {
        EachFactory::new(self).select_fields(matcher)
    }

    /// See [`EachFactory::select_fields_sequence`].
    pub fn select_fields_sequence<M, I>(&self, matchers: I) -> Vec<&Field>
    where
        M: FieldMatcher,
        I: IntoIterator<Item = M>,
    {
        EachFactory::new(self).select_fields_sequence(matchers)
    }

    /// See [`EachFactory::each_field`].
    pub fn each_field<M, H, R>(&self, matcher: M, handler: H) -> R
    where
        M: FieldMatcher,
        H: FieldHandler<R>,
        R: Combine,
    {
        EachFactory::new(self).each_field(matcher, handler)
    }

    /// See [`EachFactory::first_field`].
    pub fn first_field<M, H, R>(&self, matcher: M, handler: H) -> R
    where
        M: FieldMatcher,
        H: FieldHandler<R>,
        R: Combine,
    {
        EachFactory::new(self).first_field(matcher, handler)
    }

    /// See [`EachFactory::each_field_sequence`].
    pub fn each_field_sequence<M, I, H, R>(&self, matchers: I, handler: H) -> R
    where
        M: FieldMatcher,
        I: IntoIterator<Item = M>,
        H: FieldHandler<R>,
        R: Combine,
    {
        EachFactory::new(self).each_field_sequence(matchers, handler)
    }

    /// Dispatch each field to the function registered for its exact name.
    ///
    /// Fields whose name is not in `map` are skipped.
    pub fn each_field_map(&self, map: &mut MatchMap<'_, ()>) {
        for field in self.fields() {
            map.dispatch(field, &mut ());
        }
    }

    /// Dispatch each field by exact name, falling back to `default`.
    ///
    /// `extra` is handed to every call.
    pub fn each_field_map_with_default<E, D>(
        &self,
        map: &mut MatchMap<'_, E>,
        mut default: D,
        extra: &mut E,
    ) where
        D: FnMut(&Field, &mut E),
    {
        for field in self.fields() {
            if !map.dispatch(field, extra) {
                default(field, extra);
            }
        }
    }
}

impl Field {
    /// See [`EachFactory::select_subfields`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::MarcError::StateViolation`] on a control field.
    pub fn select_subfields<M: SubfieldMatcher>(&self, matcher: M) -> Result<Vec<&Subfield>> {
        EachFactory::select_subfields(self, matcher)
    }

    /// See [`EachFactory::each_subfield`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::MarcError::StateViolation`] on a control field.
    pub fn each_subfield<M, H, R>(&self, matcher: M, handler: H) -> Result<R>
    where
        M: SubfieldMatcher,
        H: SubfieldHandler<R>,
        R: Combine,
    {
        EachFactory::each_subfield(self, matcher, handler)
    }

    /// See [`EachFactory::first_subfield`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::MarcError::StateViolation`] on a control field.
    pub fn first_subfield<M, H, R>(&self, matcher: M, handler: H) -> Result<R>
    where
        M: SubfieldMatcher,
        H: SubfieldHandler<R>,
        R: Combine,
    {
        EachFactory::first_subfield(self, matcher, handler)
    }

    /// See [`EachFactory::each_subfield_sequence`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::MarcError::StateViolation`] on a control field.
    pub fn each_subfield_sequence<M, I, H, R>(&self, matchers: I, handler: H) -> Result<R>
    where
        M: SubfieldMatcher,
        I: IntoIterator<Item = M>,
        H: SubfieldHandler<R>,
        R: Combine,
    {
        EachFactory::each_subfield_sequence(self, matchers, handler)
    }

    /// Dispatch each subfield to the function registered for its exact name.
    ///
    /// Subfields whose name is not in `map` are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MarcError::StateViolation`] on a control field.
    pub fn each_subfield_map(&self, map: &mut SubfieldMap<'_, ()>) -> Result<()> {
        for subfield in self.subfields()? {
            map.dispatch(self, subfield, &mut ());
        }
        Ok(())
    }

    /// Dispatch each subfield by exact name, falling back to `default`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MarcError::StateViolation`] on a control field.
    pub fn each_subfield_map_with_default<E, D>(
        &self,
        map: &mut SubfieldMap<'_, E>,
        mut default: D,
        extra: &mut E,
    ) -> Result<()>
    where
        D: FnMut(&Field, &Subfield, &mut E),
    {
        for subfield in self.subfields()? {
            if !map.dispatch(self, subfield, extra) {
                default(self, subfield, extra);
            }
        }
        Ok(())
    }
}

/// Exact names mapped to slots in a list of functions.
struct NameTable<F> {
    names: IndexMap<String, usize>,
    functions: Vec<F>,
}

impl<F> NameTable<F> {
    fn new() -> Self {
        NameTable {
            names: IndexMap::new(),
            functions: Vec::new(),
        }
    }

    fn put(&mut self, names: &[&str], func: F) {
        let index = self.functions.len();
        self.functions.push(func);
        for name in names {
            self.names.insert((*name).to_string(), index);
        }
    }

    fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut F> {
        let index = *self.names.get(name)?;
        self.functions.get_mut(index)
    }

    fn debug_names(&self, f: &mut fmt::Formatter<'_>, label: &str) -> fmt::Result {
        f.debug_struct(label)
            .field("names", &self.names.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

type MapFunction<'h, E> = Box<dyn FnMut(&Field, &mut E) + 'h>;

/// Functions keyed by exact field name, for single-pass dispatch.
///
/// Several names may share one function.
///
/// ```
/// use marcline::{Field, MatchMap, Record};
///
/// let record: Record = "001 00 *a\n002 00 *a\n245 00 *a\n".parse().unwrap();
/// let mut map = MatchMap::new();
/// map.put(&["001", "002"], |f: &Field, seen: &mut Vec<String>| seen.push(f.name().to_string()));
///
/// let mut seen = Vec::new();
/// record.each_field_map_with_default(&mut map, |f, seen| seen.push(format!("default {}", f.name())), &mut seen);
/// assert_eq!(seen, vec!["001", "002", "default 245"]);
/// ```
pub struct MatchMap<'h, E = ()> {
    table: NameTable<MapFunction<'h, E>>,
}

impl<E> fmt::Debug for MatchMap<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.table.debug_names(f, "MatchMap")
    }
}

impl<E> Default for MatchMap<'_, E> {
    fn default() -> Self {
        MatchMap {
            table: NameTable::new(),
        }
    }
}

impl<'h, E> MatchMap<'h, E> {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        MatchMap::default()
    }

    /// Register `func` for each of `names`, replacing earlier registrations.
    pub fn put<F>(&mut self, names: &[&str], func: F)
    where
        F: FnMut(&Field, &mut E) + 'h,
    {
        self.table.put(names, Box::new(func));
    }

    /// Whether a function is registered for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.table.contains(name)
    }

    /// Call the function registered for the field's name. Returns `false` if there is none.
    fn dispatch(&mut self, field: &Field, extra: &mut E) -> bool {
        match self.table.get_mut(field.name()) {
            Some(func) => {
                func(field, extra);
                true
            },
            None => false,
        }
    }
}

type SubfieldMapFunction<'h, E> = Box<dyn FnMut(&Field, &Subfield, &mut E) + 'h>;

/// Functions keyed by exact subfield name; the subfield counterpart of [`MatchMap`].
///
/// ```
/// use marcline::{Field, Record, Subfield, SubfieldMap};
///
/// let record: Record = "700 00 *a Welch *h Bruce *4 aut\n".parse().unwrap();
/// let mut map = SubfieldMap::new();
/// map.put(&["a", "h"], |_: &Field, sf: &Subfield, name: &mut Vec<String>| name.push(sf.value.clone()));
///
/// let mut name = Vec::new();
/// record.field(0).unwrap().each_subfield_map_with_default(&mut map, |_, _, _| {}, &mut name).unwrap();
/// assert_eq!(name, vec!["Welch", "Bruce"]);
/// ```
pub struct SubfieldMap<'h, E = ()> {
    table: NameTable<SubfieldMapFunction<'h, E>>,
}

impl<E> fmt::Debug for SubfieldMap<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.table.debug_names(f, "SubfieldMap")
    }
}

impl<E> Default for SubfieldMap<'_, E> {
    fn default() -> Self {
        SubfieldMap {
            table: NameTable::new(),
        }
    }
}

impl<'h, E> SubfieldMap<'h, E> {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        SubfieldMap::default()
    }

    /// Register `func` for each of `names`, replacing earlier registrations.
    pub fn put<F>(&mut self, names: &[&str], func: F)
    where
        F: FnMut(&Field, &Subfield, &mut E) + 'h,
    {
        self.table.put(names, Box::new(func));
    }

    /// Whether a function is registered for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.table.contains(name)
    }

    fn dispatch(&mut self, field: &Field, subfield: &Subfield, extra: &mut E) -> bool {
        match self.table.get_mut(&subfield.name) {
            Some(func) => {
                func(field, subfield, extra);
                true
            },
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchers::{MatchAll, MatchField, MatchSubField};
    use crate::sorters::{SortBySubfields, SortDirection};
    use regex::Regex;

    fn sample() -> Record {
        "001 00 *a 1234 *b 870970\n\
         700 00 *a Marvin *h Hank *å 2\n\
         245 00 *a Title *e Cliff\n\
         700 00 *a Richard *h Cliff *å 1\n\
         700 00 *a Welch *h Bruce *å 3\n\
         300 00 *a 1 bd.\n"
            .parse()
            .unwrap()
    }

    fn re(pattern: &str) -> Regex {
        Regex::new(pattern).unwrap()
    }

    fn family(_: &Record, f: &Field) -> String {
        f.subfield_named("a").unwrap().unwrap().value.clone()
    }

    #[test]
    fn test_select_fields_absent_matcher_selects_all() {
        let record = sample();
        assert_eq!(record.select_fields(None::<Regex>).len(), 6);
        assert_eq!(record.select_fields(MatchAll).len(), 6);
        assert_eq!(record.select_fields(re("700")).len(), 3);
    }

    #[test]
    fn test_each_field_folds_strings_and_numbers() {
        let record = sample();
        let joined = record.each_field(re("700"), |r: &Record, f: &Field| family(r, f) + ",");
        assert_eq!(joined, "Marvin,Richard,Welch,");

        let total = record.each_field(re("."), |_: &Record, f: &Field| f.count().unwrap_or(0));
        assert_eq!(total, 14);

        let nothing: String = record.each_field(re("999"), family);
        assert_eq!(nothing, "");
    }

    #[test]
    fn test_first_field_skips_blank_results() {
        let record = sample();
        let given = record.first_field(re("700"), |_: &Record, f: &Field| {
            let h = f.subfield_named("h").unwrap().unwrap();
            if h.value.starts_with('C') {
                h.value.clone()
            } else {
                String::new()
            }
        });
        assert_eq!(given, "Cliff");

        let mut calls = 0;
        let first: String = record.first_field(re("700"), |r: &Record, f: &Field| {
            calls += 1;
            family(r, f)
        });
        assert_eq!(first, "Marvin");
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_sorted_traversal() {
        let record = sample();
        let sorter = SortBySubfields::new("å").unwrap();
        let names = record.sorted_by(&sorter).each_field(re("700"), |r: &Record, f: &Field| {
            family(r, f) + " "
        });
        assert_eq!(names, "Richard Marvin Welch ");

        let descending = SortBySubfields::new("å")
            .unwrap()
            .with_direction(SortDirection::Descending);
        let first = record.sorted_by(&descending).first_field(re("700"), family);
        assert_eq!(first, "Welch");
    }

    #[test]
    fn test_each_field_sequence_is_zip_longest() {
        let record = sample();
        let visited = record.each_field_sequence(
            vec![re("700"), re("245"), re("001")],
            |_: &Record, f: &Field| vec![f.name().to_string()],
        );
        assert_eq!(visited, vec!["700", "245", "001", "700", "700"]);
    }

    #[test]
    fn test_select_fields_sequence_concatenates() {
        let record = sample();
        let names: Vec<&str> = record
            .select_fields_sequence(vec![re("300"), re("700")])
            .into_iter()
            .map(Field::name)
            .collect();
        assert_eq!(names, vec!["300", "700", "700", "700"]);
    }

    #[test]
    fn test_counting_matcher_across_traversal() {
        let record = sample();
        let mut second = MatchField::field("700").unwrap().bounds(Some(2), None);
        assert_eq!(record.each_field(&mut second, family), "Richard");
    }

    #[test]
    fn test_handler_with_context() {
        let record = sample();
        let mut handler = Handler::new(0usize, |count: &mut usize, _: &Record, f: &Field| {
            *count += 1;
            f.name().to_string()
        });
        let names = record.each_field(re("^[23]"), &mut handler);
        assert_eq!(names, "245300");
        assert_eq!(handler.into_context(), 2);
    }

    #[test]
    fn test_subfield_traversal() {
        let record = sample();
        let field = record.field_named("700").unwrap();

        let values = field
            .each_subfield(re("[ah]"), |_: &Field, sf: &Subfield| sf.value.clone())
            .unwrap();
        assert_eq!(values, "MarvinHank");

        let first = field
            .first_subfield(MatchSubField::new(None, Some("^H")).unwrap(), |_: &Field, sf: &Subfield| {
                sf.name.clone()
            })
            .unwrap();
        assert_eq!(first, "h");

        let count = field.each_subfield(None::<Regex>, |_: &Field, _: &Subfield| 1usize).unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_subfield_sequence_is_round_robin() {
        let field = Field::builder("245", "00")
            .subfield("a", "a1")
            .subfield("b", "b1")
            .subfield("a", "a2")
            .subfield("a", "a3")
            .subfield("b", "b2")
            .build();
        let order = field
            .each_subfield_sequence(vec![re("a"), re("b")], |_: &Field, sf: &Subfield| {
                format!("{} ", sf.value)
            })
            .unwrap();
        assert_eq!(order, "a1 b1 a2 b2 a3 ");
    }

    #[test]
    fn test_subfield_traversal_on_control_field_fails() {
        let field = Field::control("001", "x");
        assert!(field
            .each_subfield(MatchAll, |_: &Field, _: &Subfield| ())
            .is_err());
        assert!(field.select_subfields(MatchAll).is_err());
    }

    #[test]
    fn test_each_field_map() {
        let record = sample();
        let mut seen = Vec::new();
        {
            let mut map = MatchMap::new();
            map.put(&["700"], |f: &Field, _: &mut ()| {
                seen.push(f.subfield_named("a").unwrap().unwrap().value.clone());
            });
            assert!(map.contains("700"));
            record.each_field_map(&mut map);
        }
        assert_eq!(seen, vec!["Marvin", "Richard", "Welch"]);
    }

    #[test]
    fn test_each_field_map_with_default() {
        let record = sample();
        let mut map = MatchMap::new();
        map.put(&["001", "245"], |f: &Field, out: &mut Vec<String>| {
            out.push(format!("{} called {}", f.name(), f.name()));
        });
        let mut out = Vec::new();
        record.each_field_map_with_default(
            &mut map,
            |f, out: &mut Vec<String>| out.push(format!("default called {}", f.name())),
            &mut out,
        );
        assert_eq!(
            out,
            vec![
                "001 called 001",
                "default called 700",
                "245 called 245",
                "default called 700",
                "default called 700",
                "default called 300",
            ]
        );
    }

    #[test]
    fn test_each_subfield_map() {
        let record = sample();
        let field = record.field(1).unwrap();
        let mut seen = Vec::new();
        {
            let mut map = SubfieldMap::new();
            map.put(&["a", "h"], |_: &Field, sf: &Subfield, _: &mut ()| seen.push(sf.value.clone()));
            assert!(map.contains("h"));
            assert!(!map.contains("å"));
            field.each_subfield_map(&mut map).unwrap();
        }
        assert_eq!(seen, vec!["Marvin", "Hank"]);
    }

    #[test]
    fn test_each_subfield_map_with_default() {
        let record = sample();
        let mut map = SubfieldMap::new();
        map.put(&["a"], |f: &Field, sf: &Subfield, out: &mut Vec<String>| {
            out.push(format!("{}{} {}", f.name(), sf.name, sf.value));
        });
        map.put(&["a"], |_: &Field, sf: &Subfield, out: &mut Vec<String>| {
            out.push(format!("latest {}", sf.value));
        });
        let mut out = Vec::new();
        record
            .field(3)
            .unwrap()
            .each_subfield_map_with_default(
                &mut map,
                |_, sf, out: &mut Vec<String>| out.push(format!("default {}", sf.name)),
                &mut out,
            )
            .unwrap();
        assert_eq!(out, vec!["latest Richard", "default h", "default å"]);

        let control = Field::control("001", "x");
        assert!(control.each_subfield_map(&mut SubfieldMap::new()).is_err());
    }

    #[test]
    fn test_combine_option_and_bool() {
        assert_eq!(Some(2).combine(None).combine(Some(3)), Some(5));
        assert!(None::<String>.is_blank());
        assert!(false.combine(true));
        assert!(!0usize.is_blank());
        assert!(!false.is_blank());
        assert!(!Some(0).is_blank());
    }

    #[test]
    fn test_first_field_stops_at_zero() {
        let record: Record = "700 00 *a A\n700 00 *a B *b C\n".parse().unwrap();
        let mut calls = 0;
        let first = record.first_field(re("700"), |_: &Record, f: &Field| {
            calls += 1;
            f.count_named("b").unwrap()
        });
        assert_eq!((first, calls), (0, 1));

        let mut calls = 0;
        let found = record.first_field(re("700"), |_: &Record, f: &Field| {
            calls += 1;
            f.count_named("b").unwrap() > 0
        });
        assert_eq!((found, calls), (false, 1));
    }
}
