//! MARC record structures and operations.
//!
//! This module provides the core types of the record model:
//! - [`Record`] - ordered list of fields plus three header strings
//! - [`Field`] - a data field (name, indicator, subfields) or a control field (name, value)
//! - [`Subfield`] - a named value inside a data field
//!
//! All collections keep insertion order, and names may repeat. Positional
//! lookups come in three shapes: by index, by name (first occurrence) and by
//! name plus a zero-based occurrence number counted among same-named entries.
//!
//! # Examples
//!
//! ```
//! use marcline::{Field, Record};
//!
//! let mut record = Record::new();
//! let mut field = Field::new("001", "00");
//! field.append_value("a", "2 548 263 8").unwrap();
//! field.append_value("b", "870970").unwrap();
//! record.append(field);
//!
//! assert_eq!(record.to_string(), "001 00 *a 2 548 263 8 *b 870970 \n");
//! ```
//!
//! Control fields are created from an empty field by assigning a value:
//!
//! ```
//! use marcline::Field;
//!
//! let mut field = Field::default();
//! field.set_name("010");
//! field.set_value("control data").unwrap();
//! assert!(field.is_control_field());
//! assert!(field.indicator().is_err());
//! ```

use crate::error::{MarcError, Result};
use crate::line_format::{escape_value, EscapeMode};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Default record status (leader position 5).
pub const DEFAULT_RECORD_STATUS: &str = "c";
/// Default implementation codes (leader positions 6-9).
pub const DEFAULT_IMPLEMENTATION_CODES: &str = "    ";
/// Default "for user systems" codes (leader positions 17-19).
pub const DEFAULT_FOR_USER_SYSTEMS: &str = "   ";

static EMPTY_SUBFIELD: Subfield = Subfield {
    name: String::new(),
    value: String::new(),
};

lazy_static! {
    static ref EMPTY_FIELD: Field = Field::default();
}

/// A subfield within a data field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subfield {
    /// Subfield name (usually a single character)
    pub name: String,
    /// Subfield value
    pub value: String,
}

impl Subfield {
    /// Create a new subfield.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Subfield {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The shared read-only placeholder returned for lookups that find nothing.
    #[must_use]
    pub fn empty() -> &'static Subfield {
        &EMPTY_SUBFIELD
    }

    /// Subfield name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Subfield value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Render the subfield in line format using the given escape mode.
    ///
    /// An empty value renders as the bare marker, `*a`.
    #[must_use]
    pub fn to_line_string(&self, mode: EscapeMode) -> String {
        if self.value.is_empty() {
            format!("*{}", self.name)
        } else {
            format!("*{} {}", self.name, escape_value(&self.value, mode))
        }
    }
}

impl fmt::Display for Subfield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line_string(EscapeMode::default()))
    }
}

impl From<&Subfield> for Subfield {
    fn from(subfield: &Subfield) -> Self {
        subfield.clone()
    }
}

impl<N: Into<String>, V: Into<String>> From<(N, V)> for Subfield {
    fn from((name, value): (N, V)) -> Self {
        Subfield::new(name, value)
    }
}

/// The two mutually exclusive shapes of a [`Field`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Indicator plus an ordered list of subfields.
    Data {
        /// Indicator string (conventionally two characters)
        indicator: String,
        /// Subfields (stored in `SmallVec` to avoid allocation for typical fields)
        subfields: SmallVec<[Subfield; 4]>,
    },
    /// A single value with no indicator and no subfields.
    Control {
        /// Control field value
        value: String,
    },
}

/// A field in a MARC record.
///
/// Every field starts out as a data field. It turns into a control field when
/// [`Field::set_value`] is called while the indicator is empty and there are
/// no subfields; the change is one-way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    name: String,
    kind: FieldKind,
}

impl Default for Field {
    fn default() -> Self {
        Field::new("", "")
    }
}

impl From<&Field> for Field {
    fn from(field: &Field) -> Self {
        field.clone()
    }
}

impl Field {
    /// Create a new data field.
    #[must_use]
    pub fn new(name: impl Into<String>, indicator: impl Into<String>) -> Self {
        Field {
            name: name.into(),
            kind: FieldKind::Data {
                indicator: indicator.into(),
                subfields: SmallVec::new(),
            },
        }
    }

    /// Create a control field directly.
    #[must_use]
    pub fn control(name: impl Into<String>, value: impl Into<String>) -> Self {
        Field {
            name: name.into(),
            kind: FieldKind::Control {
                value: value.into(),
            },
        }
    }

    /// Create a builder for constructing data fields fluently.
    ///
    /// # Examples
    ///
    /// ```
    /// use marcline::Field;
    ///
    /// let field = Field::builder("245", "00")
    ///     .subfield("a", "Something's goin' on")
    ///     .subfield("e", "Cliff Richard")
    ///     .build();
    /// assert_eq!(field.count().unwrap(), 2);
    /// ```
    #[must_use]
    pub fn builder(name: impl Into<String>, indicator: impl Into<String>) -> FieldBuilder {
        FieldBuilder {
            field: Field::new(name, indicator),
        }
    }

    /// The shared read-only placeholder returned for lookups that find nothing.
    #[must_use]
    pub fn empty() -> &'static Field {
        &EMPTY_FIELD
    }

    /// Field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the field. Allowed on both kinds.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The field's current shape.
    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Whether the field has become a control field.
    #[must_use]
    pub fn is_control_field(&self) -> bool {
        matches!(self.kind, FieldKind::Control { .. })
    }

    /// Indicator of a data field.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::StateViolation`] on a control field.
    pub fn indicator(&self) -> Result<&str> {
        match &self.kind {
            FieldKind::Data { indicator, .. } => Ok(indicator),
            FieldKind::Control { .. } => Err(MarcError::on_control_field("reading the indicator")),
        }
    }

    /// Replace the indicator of a data field.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::StateViolation`] on a control field.
    pub fn set_indicator(&mut self, value: impl Into<String>) -> Result<()> {
        match &mut self.kind {
            FieldKind::Data { indicator, .. } => {
                *indicator = value.into();
                Ok(())
            },
            FieldKind::Control { .. } => Err(MarcError::on_control_field("setting the indicator")),
        }
    }

    /// Value of a control field.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::StateViolation`] on a data field.
    pub fn value(&self) -> Result<&str> {
        match &self.kind {
            FieldKind::Control { value } => Ok(value),
            FieldKind::Data { .. } => Err(MarcError::on_data_field("reading the value")),
        }
    }

    /// Assign a control value.
    ///
    /// On a data field with an empty indicator and no subfields this turns the
    /// field into a control field.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::StateViolation`] if the field is a data field with
    /// an indicator or with subfields.
    pub fn set_value(&mut self, value: impl Into<String>) -> Result<()> {
        match &mut self.kind {
            FieldKind::Control { value: current } => {
                *current = value.into();
                Ok(())
            },
            FieldKind::Data {
                indicator,
                subfields,
            } if indicator.is_empty() && subfields.is_empty() => {
                self.kind = FieldKind::Control {
                    value: value.into(),
                };
                Ok(())
            },
            FieldKind::Data { .. } => Err(MarcError::on_data_field("setting the value")),
        }
    }

    fn data(&self, operation: &str) -> Result<&SmallVec<[Subfield; 4]>> {
        match &self.kind {
            FieldKind::Data { subfields, .. } => Ok(subfields),
            FieldKind::Control { .. } => Err(MarcError::on_control_field(operation)),
        }
    }

    fn data_mut(&mut self, operation: &str) -> Result<&mut SmallVec<[Subfield; 4]>> {
        match &mut self.kind {
            FieldKind::Data { subfields, .. } => Ok(subfields),
            FieldKind::Control { .. } => Err(MarcError::on_control_field(operation)),
        }
    }

    /// All subfields in order.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::StateViolation`] on a control field.
    pub fn subfields(&self) -> Result<&[Subfield]> {
        self.data("reading subfields").map(SmallVec::as_slice)
    }

    /// All subfields in order, mutably.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::StateViolation`] on a control field.
    pub fn subfields_mut(&mut self) -> Result<&mut [Subfield]> {
        self.data_mut("modifying subfields")
            .map(SmallVec::as_mut_slice)
    }

    // ============================================================================
    // Structural operations
    // ============================================================================

    /// Append a copy of a subfield.
    ///
    /// Accepts a [`Subfield`], a `&Subfield` (copied) or a `(name, value)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::StateViolation`] on a control field.
    pub fn append(&mut self, subfield: impl Into<Subfield>) -> Result<()> {
        self.data_mut("append")?.push(subfield.into());
        Ok(())
    }

    /// Append a new subfield built from a name and a value.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::StateViolation`] on a control field.
    pub fn append_value(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        self.append(Subfield::new(name, value))
    }

    /// Replace the first subfield named `name`, or append if there is none.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::StateViolation`] on a control field.
    pub fn append_or_replace(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        let subfield = Subfield::new(name, value);
        let subfields = self.data_mut("append")?;
        match subfields.iter_mut().find(|sf| sf.name == subfield.name) {
            Some(existing) => *existing = subfield,
            None => subfields.push(subfield),
        }
        Ok(())
    }

    /// Insert a new subfield at `index`, shifting later subfields right.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::StateViolation`] on a control field and
    /// [`MarcError::IndexOutOfRange`] if `index` is greater than the subfield count.
    pub fn insert(
        &mut self,
        index: usize,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        let subfields = self.data_mut("insert")?;
        if index > subfields.len() {
            return Err(MarcError::IndexOutOfRange {
                index,
                len: subfields.len(),
            });
        }
        subfields.insert(index, Subfield::new(name, value));
        Ok(())
    }

    /// Remove the first subfield named `name`. Returns the removed subfield.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::StateViolation`] on a control field.
    pub fn remove(&mut self, name: &str) -> Result<Option<Subfield>> {
        self.remove_occurrence(name, 0)
    }

    /// Remove the `occurrence`-th subfield named `name` (zero-based).
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::StateViolation`] on a control field.
    pub fn remove_occurrence(&mut self, name: &str, occurrence: usize) -> Result<Option<Subfield>> {
        let subfields = self.data_mut("remove")?;
        Ok(position_of(subfields, |sf| sf.name == name, occurrence).map(|i| subfields.remove(i)))
    }

    /// Remove the subfield at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::StateViolation`] on a control field.
    pub fn remove_at(&mut self, index: usize) -> Result<Option<Subfield>> {
        let subfields = self.data_mut("remove")?;
        Ok((index < subfields.len()).then(|| subfields.remove(index)))
    }

    /// Total number of subfields.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::StateViolation`] on a control field.
    pub fn count(&self) -> Result<usize> {
        Ok(self.data("count")?.len())
    }

    /// Number of subfields named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::StateViolation`] on a control field.
    pub fn count_named(&self, name: &str) -> Result<usize> {
        Ok(self.data("count")?.iter().filter(|sf| sf.name == name).count())
    }

    /// Same as [`Field::count`].
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::StateViolation`] on a control field.
    pub fn size(&self) -> Result<usize> {
        self.count()
    }

    /// Whether the data field has no subfields.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::StateViolation`] on a control field.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.count()? == 0)
    }

    // ============================================================================
    // Lookup
    // ============================================================================

    /// Subfield at position `index`.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::StateViolation`] on a control field.
    pub fn subfield(&self, index: usize) -> Result<Option<&Subfield>> {
        Ok(self.data("subfield lookup")?.get(index))
    }

    /// First subfield named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::StateViolation`] on a control field.
    pub fn subfield_named(&self, name: &str) -> Result<Option<&Subfield>> {
        self.subfield_occurrence(name, 0)
    }

    /// The `occurrence`-th subfield named `name` (zero-based).
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::StateViolation`] on a control field.
    pub fn subfield_occurrence(&self, name: &str, occurrence: usize) -> Result<Option<&Subfield>> {
        Ok(self
            .data("subfield lookup")?
            .iter()
            .filter(|sf| sf.name == name)
            .nth(occurrence))
    }

    /// Mutable subfield at position `index`.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::StateViolation`] on a control field.
    pub fn subfield_mut(&mut self, index: usize) -> Result<Option<&mut Subfield>> {
        Ok(self.data_mut("subfield lookup")?.get_mut(index))
    }

    /// Mutable first subfield named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::StateViolation`] on a control field.
    pub fn subfield_named_mut(&mut self, name: &str) -> Result<Option<&mut Subfield>> {
        self.subfield_occurrence_mut(name, 0)
    }

    /// Mutable `occurrence`-th subfield named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::StateViolation`] on a control field.
    pub fn subfield_occurrence_mut(
        &mut self,
        name: &str,
        occurrence: usize,
    ) -> Result<Option<&mut Subfield>> {
        Ok(self
            .data_mut("subfield lookup")?
            .iter_mut()
            .filter(|sf| sf.name == name)
            .nth(occurrence))
    }

    /// Like [`Field::subfield`], but returns the empty placeholder when absent.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::StateViolation`] on a control field.
    pub fn subfield_or_empty(&self, index: usize) -> Result<&Subfield> {
        Ok(self.subfield(index)?.unwrap_or(Subfield::empty()))
    }

    /// Like [`Field::subfield_named`], but returns the empty placeholder when absent.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::StateViolation`] on a control field.
    pub fn subfield_named_or_empty(&self, name: &str) -> Result<&Subfield> {
        Ok(self.subfield_named(name)?.unwrap_or(Subfield::empty()))
    }

    /// Like [`Field::subfield_occurrence`], but returns the empty placeholder when absent.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::StateViolation`] on a control field.
    pub fn subfield_occurrence_or_empty(&self, name: &str, occurrence: usize) -> Result<&Subfield> {
        Ok(self
            .subfield_occurrence(name, occurrence)?
            .unwrap_or(Subfield::empty()))
    }

    /// Concatenation of all subfield names in order, e.g. `"0ah"`.
    ///
    /// Empty for control fields.
    #[must_use]
    pub fn subfield_names(&self) -> String {
        match &self.kind {
            FieldKind::Data { subfields, .. } => {
                subfields.iter().map(|sf| sf.name.as_str()).collect()
            },
            FieldKind::Control { .. } => String::new(),
        }
    }

    /// Render the field in line format (without the trailing newline).
    #[must_use]
    pub fn to_line_string(&self, mode: EscapeMode) -> String {
        match &self.kind {
            FieldKind::Control { value } => {
                format!("{} {}", self.name, escape_value(value, mode))
            },
            FieldKind::Data {
                indicator,
                subfields,
            } => {
                let mut out = format!("{} {} ", self.name, indicator);
                for subfield in subfields {
                    out.push_str(&subfield.to_line_string(mode));
                    out.push(' ');
                }
                out
            },
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line_string(EscapeMode::default()))
    }
}

/// Index of the `occurrence`-th element satisfying `predicate`.
pub(crate) fn position_of<T>(
    items: &[T],
    predicate: impl Fn(&T) -> bool,
    occurrence: usize,
) -> Option<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| predicate(item))
        .nth(occurrence)
        .map(|(i, _)| i)
}

/// Builder for fluently constructing data fields.
#[derive(Debug)]
pub struct FieldBuilder {
    field: Field,
}

impl FieldBuilder {
    /// Add a subfield to the field being built.
    #[must_use]
    pub fn subfield(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let FieldKind::Data { subfields, .. } = &mut self.field.kind {
            subfields.push(Subfield::new(name, value));
        }
        self
    }

    /// Build the field.
    #[must_use]
    pub fn build(self) -> Field {
        self.field
    }
}

/// A MARC record: three header strings and an ordered list of fields.
///
/// Fields are held by value. [`Record::append`] takes ownership of the field
/// (or copies it when given a reference), so later changes to the caller's
/// field never reach the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Record status (one character, leader position 5)
    pub record_status: String,
    /// Implementation codes (four characters, leader positions 6-9)
    pub implementation_codes: String,
    /// For user systems (three characters, leader positions 17-19)
    pub for_user_systems: String,
    fields: Vec<Field>,
}

impl Default for Record {
    fn default() -> Self {
        Record::new()
    }
}

impl Record {
    /// Create an empty record with default header values.
    #[must_use]
    pub fn new() -> Self {
        Record {
            record_status: DEFAULT_RECORD_STATUS.to_string(),
            implementation_codes: DEFAULT_IMPLEMENTATION_CODES.to_string(),
            for_user_systems: DEFAULT_FOR_USER_SYSTEMS.to_string(),
            fields: Vec::new(),
        }
    }

    /// Create a builder for fluently constructing records.
    ///
    /// # Examples
    ///
    /// ```
    /// use marcline::{Field, Record};
    ///
    /// let record = Record::builder()
    ///     .record_status("n")
    ///     .field(Field::builder("245", "00").subfield("a", "Title").build())
    ///     .build();
    /// assert_eq!(record.size(), 1);
    /// ```
    #[must_use]
    pub fn builder() -> RecordBuilder {
        RecordBuilder {
            record: Record::new(),
        }
    }

    /// All fields in order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Iterate mutably over all fields.
    pub fn fields_mut(&mut self) -> impl Iterator<Item = &mut Field> {
        self.fields.iter_mut()
    }

    /// Append a field. A `&Field` argument is copied.
    pub fn append(&mut self, field: impl Into<Field>) {
        self.fields.push(field.into());
    }

    /// Append a new, empty data field and return it for further editing.
    pub fn append_new(
        &mut self,
        name: impl Into<String>,
        indicator: impl Into<String>,
    ) -> &mut Field {
        self.fields.push(Field::new(name, indicator));
        let last = self.fields.len() - 1;
        &mut self.fields[last]
    }

    /// Remove the field at `index`.
    pub fn remove_at(&mut self, index: usize) -> Option<Field> {
        (index < self.fields.len()).then(|| self.fields.remove(index))
    }

    /// Remove the first field named `name`.
    pub fn remove(&mut self, name: &str) -> Option<Field> {
        self.remove_occurrence(name, 0)
    }

    /// Remove the `occurrence`-th field named `name` (zero-based).
    pub fn remove_occurrence(&mut self, name: &str, occurrence: usize) -> Option<Field> {
        position_of(&self.fields, |f| f.name == name, occurrence).map(|i| self.fields.remove(i))
    }

    /// Remove every field named `name`, keeping the others in order.
    ///
    /// Returns the number of removed fields.
    pub fn remove_all(&mut self, name: &str) -> usize {
        let before = self.fields.len();
        self.fields.retain(|f| f.name != name);
        before - self.fields.len()
    }

    /// Remove all fields. Header values are kept.
    pub fn clear_fields(&mut self) {
        self.fields.clear();
    }

    /// Number of fields named `name`.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.fields.iter().filter(|f| f.name == name).count()
    }

    /// Total number of fields.
    #[must_use]
    pub fn number_of_fields(&self) -> usize {
        self.fields.len()
    }

    /// Same as [`Record::number_of_fields`].
    #[must_use]
    pub fn size(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    // ============================================================================
    // Lookup
    // ============================================================================

    /// Field at position `index`.
    #[must_use]
    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// First field named `name`.
    #[must_use]
    pub fn field_named(&self, name: &str) -> Option<&Field> {
        self.field_occurrence(name, 0)
    }

    /// The `occurrence`-th field named `name` (zero-based).
    #[must_use]
    pub fn field_occurrence(&self, name: &str, occurrence: usize) -> Option<&Field> {
        self.fields.iter().filter(|f| f.name == name).nth(occurrence)
    }

    /// Mutable field at position `index`.
    pub fn field_mut(&mut self, index: usize) -> Option<&mut Field> {
        self.fields.get_mut(index)
    }

    /// Mutable first field named `name`.
    pub fn field_named_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.field_occurrence_mut(name, 0)
    }

    /// Mutable `occurrence`-th field named `name`.
    pub fn field_occurrence_mut(&mut self, name: &str, occurrence: usize) -> Option<&mut Field> {
        self.fields
            .iter_mut()
            .filter(|f| f.name == name)
            .nth(occurrence)
    }

    /// Like [`Record::field`], but returns the empty placeholder when absent.
    #[must_use]
    pub fn field_or_empty(&self, index: usize) -> &Field {
        self.field(index).unwrap_or(Field::empty())
    }

    /// Like [`Record::field_named`], but returns the empty placeholder when absent.
    #[must_use]
    pub fn field_named_or_empty(&self, name: &str) -> &Field {
        self.field_named(name).unwrap_or(Field::empty())
    }

    /// Like [`Record::field_occurrence`], but returns the empty placeholder when absent.
    #[must_use]
    pub fn field_occurrence_or_empty(&self, name: &str, occurrence: usize) -> &Field {
        self.field_occurrence(name, occurrence)
            .unwrap_or(Field::empty())
    }

    /// Render the record in line format: one line per field, each ending in `\n`.
    #[must_use]
    pub fn to_line_string(&self, mode: EscapeMode) -> String {
        let mut out = String::new();
        for field in &self.fields {
            out.push_str(&field.to_line_string(mode));
            out.push('\n');
        }
        out
    }

    pub(crate) fn replace_fields(&mut self, fields: Vec<Field>) {
        self.fields = fields;
    }

    pub(crate) fn retain_indices(&mut self, remove: &[usize]) {
        let mut index = 0;
        self.fields.retain(|_| {
            let keep = !remove.contains(&index);
            index += 1;
            keep
        });
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line_string(EscapeMode::default()))
    }
}

/// Builder for fluently constructing records.
#[derive(Debug)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    /// Set the record status.
    #[must_use]
    pub fn record_status(mut self, status: impl Into<String>) -> Self {
        self.record.record_status = status.into();
        self
    }

    /// Set the implementation codes.
    #[must_use]
    pub fn implementation_codes(mut self, codes: impl Into<String>) -> Self {
        self.record.implementation_codes = codes.into();
        self
    }

    /// Set the "for user systems" codes.
    #[must_use]
    pub fn for_user_systems(mut self, codes: impl Into<String>) -> Self {
        self.record.for_user_systems = codes.into();
        self
    }

    /// Add a field to the record being built.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.record.append(field);
        self
    }

    /// Build the record.
    #[must_use]
    pub fn build(self) -> Record {
        self.record
    }
}
