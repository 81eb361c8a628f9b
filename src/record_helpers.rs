//! Value extraction and removal helpers built on the matchers.
//!
//! This module provides the [`RecordHelpers`] and [`FieldHelpers`] traits,
//! which add convenience queries on top of the traversal engine: existence
//! and uniqueness tests, value extraction with optional separators, regex
//! tests on extracted values, and removal of everything a matcher selects.
//! The traits are implemented for every type that exposes a [`Record`]
//! (or [`Field`]) through `AsRef`/`AsMut`.
//!
//! The field helpers treat a control field as a field without subfields:
//! nothing exists in it and every extracted value is empty.
//!
//! # Examples
//!
//! ```
//! use marcline::{FieldHelpers, MatchAll, Record, RecordHelpers};
//! use regex::Regex;
//!
//! let record: Record = "700 00 *a Marvin *h Hank\n700 00 *a Richard *h Cliff\n"
//!     .parse()
//!     .unwrap();
//!
//! let a = Regex::new("a").unwrap();
//! assert_eq!(record.get_value(Regex::new("700").unwrap(), &a, Some(", ")), "Marvin, Richard");
//! assert!(!record.is_unique(Regex::new("700").unwrap()));
//!
//! let field = record.field(0).unwrap();
//! assert_eq!(field.get_value([MatchAll], Some(" ")), "Marvin Hank");
//! ```

use crate::matchers::{FieldMatcher, SubfieldMatcher};
use crate::record::{Field, Record};
use regex::Regex;

impl AsRef<Record> for Record {
    fn as_ref(&self) -> &Record {
        self
    }
}

impl AsMut<Record> for Record {
    fn as_mut(&mut self) -> &mut Record {
        self
    }
}

impl AsRef<Field> for Field {
    fn as_ref(&self) -> &Field {
        self
    }
}

impl AsMut<Field> for Field {
    fn as_mut(&mut self) -> &mut Field {
        self
    }
}

/// Extension trait with matcher-driven queries on a field's subfields.
pub trait FieldHelpers: AsRef<Field> + AsMut<Field> {
    /// Whether any subfield is selected by `matcher`.
    fn exists<M: SubfieldMatcher>(&self, matcher: M) -> bool {
        self.as_ref()
            .select_subfields(matcher)
            .map_or(false, |selected| !selected.is_empty())
    }

    /// Whether exactly one subfield is selected by `matcher`.
    fn is_unique<M: SubfieldMatcher>(&self, matcher: M) -> bool {
        self.as_ref()
            .select_subfields(matcher)
            .map_or(false, |selected| selected.len() == 1)
    }

    /// Value of the first selected subfield with a non-empty value, or `""`.
    fn get_first_value<M: SubfieldMatcher>(&self, matcher: M) -> &str {
        self.as_ref()
            .select_subfields(matcher)
            .unwrap_or_default()
            .into_iter()
            .map(|subfield| subfield.value.as_str())
            .find(|value| !value.is_empty())
            .unwrap_or("")
    }

    /// Non-empty values selected by the first matcher that yields any.
    fn get_value_as_array<M, I>(&self, matchers: I) -> Vec<&str>
    where
        M: SubfieldMatcher,
        I: IntoIterator<Item = M>,
    {
        let field = self.as_ref();
        for matcher in matchers {
            let values: Vec<&str> = field
                .select_subfields(matcher)
                .unwrap_or_default()
                .into_iter()
                .map(|subfield| subfield.value.as_str())
                .filter(|value| !value.is_empty())
                .collect();
            if !values.is_empty() {
                return values;
            }
        }
        Vec::new()
    }

    /// Values selected by the first matcher that selects anything, joined.
    ///
    /// `sep` is inserted before a value only when the text collected so far
    /// is non-empty. Returns `""` if no matcher selects a subfield.
    fn get_value<M, I>(&self, matchers: I, sep: Option<&str>) -> String
    where
        M: SubfieldMatcher,
        I: IntoIterator<Item = M>,
    {
        let field = self.as_ref();
        for matcher in matchers {
            let selected = field.select_subfields(matcher).unwrap_or_default();
            let mut values = selected.iter().map(|subfield| subfield.value.as_str());
            if let Some(first) = values.next() {
                let mut result = first.to_string();
                for value in values {
                    if let Some(sep) = sep {
                        if !result.is_empty() {
                            result.push_str(sep);
                        }
                    }
                    result.push_str(value);
                }
                return result;
            }
        }
        String::new()
    }

    /// Whether `pattern` matches the joined value selected by `matcher`.
    fn match_value<M: SubfieldMatcher>(&self, matcher: M, pattern: &Regex) -> bool {
        pattern.is_match(&self.get_value([matcher], None))
    }

    /// Remove every subfield selected by any of `matchers`.
    ///
    /// Each matcher sees the subfields left by the previous one. Returns the
    /// number of removed subfields; a control field is left untouched.
    fn remove_with_matcher<M, I>(&mut self, matchers: I) -> usize
    where
        M: SubfieldMatcher,
        I: IntoIterator<Item = M>,
    {
        let field = self.as_mut();
        let mut removed = 0;
        for mut matcher in matchers {
            let targets: Vec<usize> = match field.subfields() {
                Ok(subfields) => subfields
                    .iter()
                    .enumerate()
                    .filter(|(_, subfield)| matcher.match_subfield(field, subfield))
                    .map(|(i, _)| i)
                    .collect(),
                Err(_) => return 0,
            };
            for index in targets.into_iter().rev() {
                if let Ok(Some(_)) = field.remove_at(index) {
                    removed += 1;
                }
            }
        }
        removed
    }
}

impl<T: AsRef<Field> + AsMut<Field> + ?Sized> FieldHelpers for T {}

/// Extension trait with matcher-driven queries on a record's fields.
pub trait RecordHelpers: AsRef<Record> + AsMut<Record> {
    /// First field whose name matches `pattern`.
    fn first_field_as_field(&self, pattern: &Regex) -> Option<&Field> {
        self.as_ref()
            .fields()
            .iter()
            .find(|field| pattern.is_match(field.name()))
    }

    /// Whether any field is selected by `matcher`.
    fn exist_field<M: FieldMatcher>(&self, matcher: M) -> bool {
        !self.as_ref().select_fields(matcher).is_empty()
    }

    /// Whether exactly one field is selected by `matcher`.
    fn is_unique<M: FieldMatcher>(&self, matcher: M) -> bool {
        self.as_ref().select_fields(matcher).len() == 1
    }

    /// First non-empty subfield value found in the selected fields, or `""`.
    fn get_first_value<F, S>(&self, field_matcher: F, mut subfield_matcher: S) -> &str
    where
        F: FieldMatcher,
        S: SubfieldMatcher,
    {
        self.as_ref()
            .select_fields(field_matcher)
            .into_iter()
            .map(|field| field.get_first_value(&mut subfield_matcher))
            .find(|value| !value.is_empty())
            .unwrap_or("")
    }

    /// Joined subfield values of all selected fields.
    ///
    /// Each field contributes [`FieldHelpers::get_value`]; `sep` goes between
    /// fields whenever the text collected so far is non-empty.
    fn get_value<F, S>(&self, field_matcher: F, mut subfield_matcher: S, sep: Option<&str>) -> String
    where
        F: FieldMatcher,
        S: SubfieldMatcher,
    {
        let mut result = String::new();
        for field in self.as_ref().select_fields(field_matcher) {
            if let Some(sep) = sep {
                if !result.is_empty() {
                    result.push_str(sep);
                }
            }
            result.push_str(&field.get_value([&mut subfield_matcher], sep));
        }
        result
    }

    /// Whether `pattern` matches the joined value of the selected fields.
    fn match_value<F, S>(&self, field_matcher: F, subfield_matcher: S, pattern: &Regex) -> bool
    where
        F: FieldMatcher,
        S: SubfieldMatcher,
    {
        pattern.is_match(&self.get_value(field_matcher, subfield_matcher, None))
    }

    /// Remove every field selected by any of `matchers`.
    ///
    /// Targets are collected before anything is removed. Returns the number
    /// of removed fields.
    fn remove_with_matcher<M, I>(&mut self, matchers: I) -> usize
    where
        M: FieldMatcher,
        I: IntoIterator<Item = M>,
    {
        let record = self.as_mut();
        let mut removed = 0;
        for mut matcher in matchers {
            let targets: Vec<usize> = record
                .fields()
                .iter()
                .enumerate()
                .filter(|(_, field)| matcher.match_field(record, field))
                .map(|(i, _)| i)
                .collect();
            removed += targets.len();
            record.retain_indices(&targets);
        }
        removed
    }
}

impl<T: AsRef<Record> + AsMut<Record> + ?Sized> RecordHelpers for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchers::{MatchAll, MatchField, MatchSubField};

    fn re(pattern: &str) -> Regex {
        Regex::new(pattern).unwrap()
    }

    fn sample() -> Record {
        "001 00 *a 1234 *b 870970\n\
         245 00 *a Title *a  *e Cliff\n\
         700 00 *a Marvin *h Hank\n\
         700 00 *a Richard *h Cliff\n"
            .parse()
            .unwrap()
    }

    #[test]
    fn test_field_exists_and_unique() {
        let record = sample();
        let field = record.field_named("245").unwrap();
        assert!(field.exists(re("e")));
        assert!(!field.exists(re("x")));
        assert!(field.is_unique(re("e")));
        assert!(!field.is_unique(re("a")));
        assert!(!Field::control("001", "x").exists(MatchAll));
    }

    #[test]
    fn test_field_get_value_separator() {
        let field = Field::builder("245", "00")
            .subfield("a", "")
            .subfield("a", "one")
            .subfield("a", "two")
            .build();
        assert_eq!(field.get_value([re("a")], Some("|")), "one|two");
        assert_eq!(field.get_value([re("a")], None), "onetwo");
        assert_eq!(field.get_value([re("x"), re("a")], Some("|")), "one|two");
        assert_eq!(field.get_value([re("x")], Some("|")), "");
    }

    #[test]
    fn test_field_first_value_and_array() {
        let record = sample();
        let field = record.field_named("245").unwrap();
        assert_eq!(field.get_first_value(re("a")), "Title");
        assert_eq!(field.get_first_value(re("x")), "");
        assert_eq!(field.get_value_as_array([re("a")]), vec!["Title"]);
        assert_eq!(field.get_value_as_array([re("x"), re("e")]), vec!["Cliff"]);
        assert!(field.get_value_as_array([re("x")]).is_empty());
    }

    #[test]
    fn test_field_match_value() {
        let record = sample();
        let field = record.field_named("700").unwrap();
        assert!(field.match_value(re("h"), &re("^Ha")));
        assert!(!field.match_value(re("a"), &re("^Ha")));
    }

    #[test]
    fn test_field_remove_with_matcher() {
        let mut field = Field::builder("245", "00")
            .subfield("a", "x")
            .subfield("b", "y")
            .subfield("a", "z")
            .build();
        assert_eq!(field.remove_with_matcher([re("a")]), 2);
        assert_eq!(field.subfield_names(), "b");
        assert_eq!(Field::control("001", "x").remove_with_matcher([MatchAll]), 0);
    }

    #[test]
    fn test_record_queries() {
        let record = sample();
        assert_eq!(record.first_field_as_field(&re("^7")).unwrap().name(), "700");
        assert!(record.first_field_as_field(&re("^9")).is_none());
        assert!(record.exist_field(re("245")));
        assert!(record.is_unique(re("245")));
        assert!(!record.is_unique(re("700")));
        assert_eq!(record.get_first_value(re("700"), re("h")), "Hank");
        assert_eq!(record.get_first_value(re("999"), re("h")), "");
    }

    #[test]
    fn test_record_get_value() {
        let record = sample();
        assert_eq!(record.get_value(re("700"), re("a"), Some(", ")), "Marvin, Richard");
        assert_eq!(record.get_value(re("700"), re("[ah]"), Some(" ")), "Marvin Hank Richard Cliff");
        assert_eq!(record.get_value(re("700"), re("a"), None), "MarvinRichard");
        assert!(record.match_value(re("700"), re("h"), &re("HankCliff")));
    }

    #[test]
    fn test_record_remove_with_matcher() {
        let mut record = sample();
        let removed = record.remove_with_matcher([MatchField::field("700").unwrap()]);
        assert_eq!(removed, 2);
        assert_eq!(record.count("700"), 0);
        assert_eq!(record.size(), 2);

        let mut record = sample();
        assert_eq!(record.remove_with_matcher([MatchAll]), 4);
        assert!(record.is_empty());
    }

    #[test]
    fn test_remove_with_counting_matcher() {
        let mut record = sample();
        let second = MatchField::field("700").unwrap().bounds(Some(2), None);
        assert_eq!(record.remove_with_matcher([second]), 1);
        assert_eq!(
            record.field_named("700").unwrap().get_first_value(MatchSubField::name("a").unwrap()),
            "Marvin"
        );
    }
}
