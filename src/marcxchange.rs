//! MarcXchange conversion and the flat field boundary.
//!
//! MarcXchange (ISO 25577) is the XML carrier used for both danMARC2 and
//! MARC21 records. A MarcXchange `<record>` carries a `format` attribute
//! (`danMARC2` or `MARC21`), a `type` attribute, a `<leader>`, and one
//! `<controlfield>` or `<datafield>` element per field; `tag`, `ind1`, `ind2`
//! and `code` are attributes.
//!
//! Two readers exist because the formats use the record differently:
//! - [`marcxchange_to_record`] reads danMARC2: data fields only; the leader
//!   and control fields are ignored
//! - [`marcxchange_m21_to_record`] reads MARC21: it requires
//!   `format="MARC21"`, takes the three header values from the leader and
//!   reads control fields before data fields
//!
//! The writer emits one element per field in record order.
//!
//! Both accept default-namespace, prefixed-namespace and namespace-free input.
//!
//! Independently of XML, [`record_to_flat`] and [`record_from_flat`] convert
//! between a [`Record`] and a flat list of [`FlatField`] tuples.
//!
//! # Examples
//!
//! ```
//! use marcline::marcxchange::{self, MarcFormat, RecordType};
//! use marcline::Record;
//!
//! let record: Record = "001 00 *a 27907431 *b 870970\n".parse().unwrap();
//! let xml = marcxchange::record_to_marcxchange(&record, MarcFormat::DanMarc2, RecordType::Bibliographic).unwrap();
//! assert!(xml.contains(r#"<datafield tag="001" ind1="0" ind2="0">"#));
//!
//! let restored = marcxchange::marcxchange_to_record(&xml).unwrap();
//! assert_eq!(restored.to_string(), record.to_string());
//! ```

use crate::error::{MarcError, Result};
use crate::record::{Field, FieldKind, Record};
use lazy_static::lazy_static;
use quick_xml::de::from_str as xml_from_str;
use quick_xml::se::to_string as xml_to_string;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The MARC21 slim namespace URI.
pub const MARC21_NS: &str = "http://www.loc.gov/MARC21/slim";
/// The MarcXchange namespace URI used for danMARC2 records.
pub const MARCXCHANGE_NS: &str = "info:lc/xmlns/marcxchange-v1";

lazy_static! {
    static ref XMLNS_DECLARATION: Regex =
        Regex::new(r#"\s+xmlns(?::\w+)?="[^"]*""#).expect("xmlns pattern is valid");
    static ref ELEMENT_PREFIX: Regex = Regex::new(r"<(/?)(\w+):").expect("prefix pattern is valid");
}

/// Record format written to the `format` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarcFormat {
    /// MARC21, in the MARC21 slim namespace
    #[serde(rename = "MARC21")]
    Marc21,
    /// danMARC2, in the MarcXchange namespace
    #[serde(rename = "danMARC2")]
    DanMarc2,
}

impl MarcFormat {
    /// Attribute value, `"MARC21"` or `"danMARC2"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MarcFormat::Marc21 => "MARC21",
            MarcFormat::DanMarc2 => "danMARC2",
        }
    }

    /// XML namespace used when writing this format.
    #[must_use]
    pub fn namespace(self) -> &'static str {
        match self {
            MarcFormat::Marc21 => MARC21_NS,
            MarcFormat::DanMarc2 => MARCXCHANGE_NS,
        }
    }
}

impl fmt::Display for MarcFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarcFormat {
    type Err = MarcError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "MARC21" => Ok(MarcFormat::Marc21),
            "danMARC2" => Ok(MarcFormat::DanMarc2),
            other => Err(MarcError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Record level written to the `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RecordType {
    /// A single record, or a merged main+section+volume record
    #[default]
    Bibliographic,
    /// A main record
    BibliographicMain,
    /// A section record
    BibliographicSection,
    /// A volume record
    BibliographicVolume,
}

impl RecordType {
    /// Attribute value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::Bibliographic => "Bibliographic",
            RecordType::BibliographicMain => "BibliographicMain",
            RecordType::BibliographicSection => "BibliographicSection",
            RecordType::BibliographicVolume => "BibliographicVolume",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = MarcError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Bibliographic" => Ok(RecordType::Bibliographic),
            "BibliographicMain" => Ok(RecordType::BibliographicMain),
            "BibliographicSection" => Ok(RecordType::BibliographicSection),
            "BibliographicVolume" => Ok(RecordType::BibliographicVolume),
            other => Err(MarcError::UnsupportedFormat(format!("record type {other}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Flat boundary
// ---------------------------------------------------------------------------

/// One field as a flat tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlatField {
    /// `(tag, value)`
    Control {
        /// Field name
        tag: String,
        /// Control value
        value: String,
    },
    /// `(tag, ind1, ind2, [(code, value)*])`
    Data {
        /// Field name
        tag: String,
        /// First indicator character (may be empty)
        ind1: String,
        /// Second indicator character (may be empty)
        ind2: String,
        /// Subfield codes and values in order
        subfields: Vec<(String, String)>,
    },
}

/// Build a record with default header values from flat fields.
#[must_use]
pub fn record_from_flat<I: IntoIterator<Item = FlatField>>(fields: I) -> Record {
    let mut record = Record::new();
    for flat in fields {
        record.append(field_from_flat(flat));
    }
    record
}

fn field_from_flat(flat: FlatField) -> Field {
    match flat {
        FlatField::Control { tag, value } => Field::control(tag, value),
        FlatField::Data {
            tag,
            ind1,
            ind2,
            subfields,
        } => subfields
            .into_iter()
            .fold(Field::builder(tag, ind1 + &ind2), |builder, (code, value)| {
                builder.subfield(code, value)
            })
            .build(),
    }
}

/// Flatten a record's fields, in record order.
///
/// # Errors
///
/// Returns [`MarcError::StateViolation`] if a data field's indicator has more
/// than two characters, since `ind1` and `ind2` cannot hold the rest.
pub fn record_to_flat(record: &Record) -> Result<Vec<FlatField>> {
    record.fields().iter().map(field_to_flat).collect()
}

fn field_to_flat(field: &Field) -> Result<FlatField> {
    match field.kind() {
        FieldKind::Control { value } => Ok(FlatField::Control {
            tag: field.name().to_string(),
            value: value.clone(),
        }),
        FieldKind::Data {
            indicator,
            subfields,
        } => {
            let (ind1, ind2) = split_indicator(field.name(), indicator)?;
            Ok(FlatField::Data {
                tag: field.name().to_string(),
                ind1,
                ind2,
                subfields: subfields
                    .iter()
                    .map(|sf| (sf.name.clone(), sf.value.clone()))
                    .collect(),
            })
        },
    }
}

/// First and second indicator characters; missing ones become empty strings.
fn split_indicator(name: &str, indicator: &str) -> Result<(String, String)> {
    let mut chars = indicator.chars();
    let ind1 = chars.next().map(String::from).unwrap_or_default();
    let ind2 = chars.next().map(String::from).unwrap_or_default();
    if chars.next().is_some() {
        return Err(MarcError::StateViolation(format!(
            "field {name} has indicator {indicator:?}; at most two characters fit ind1 and ind2"
        )));
    }
    Ok((ind1, ind2))
}

// ---------------------------------------------------------------------------
// XML representation
// ---------------------------------------------------------------------------

/// MarcXchange record representation for serialization.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "record")]
pub struct MarcxchangeRecord {
    /// `format` attribute
    #[serde(rename = "@format", default)]
    pub format: String,
    /// `type` attribute
    #[serde(rename = "@type", default)]
    pub record_type: String,
    /// Leader string
    #[serde(default)]
    pub leader: String,
    /// Control and data fields in document order
    #[serde(rename = "$value", default)]
    pub fields: Vec<MarcxchangeField>,
}

/// One `<controlfield>` or `<datafield>` child of a record.
#[derive(Debug, Serialize, Deserialize)]
pub enum MarcxchangeField {
    /// `<controlfield>`
    #[serde(rename = "controlfield")]
    Control(MarcxchangeControlField),
    /// `<datafield>`
    #[serde(rename = "datafield")]
    Data(MarcxchangeDataField),
}

impl From<FlatField> for MarcxchangeField {
    fn from(flat: FlatField) -> Self {
        match flat {
            FlatField::Control { tag, value } => {
                MarcxchangeField::Control(MarcxchangeControlField { tag, value })
            },
            FlatField::Data {
                tag,
                ind1,
                ind2,
                subfields,
            } => MarcxchangeField::Data(MarcxchangeDataField {
                tag,
                ind1,
                ind2,
                subfield: subfields
                    .into_iter()
                    .map(|(code, value)| MarcxchangeSubfield { code, value })
                    .collect(),
            }),
        }
    }
}

/// MarcXchange control field representation.
#[derive(Debug, Serialize, Deserialize)]
pub struct MarcxchangeControlField {
    /// Field tag as an XML attribute
    #[serde(rename = "@tag")]
    pub tag: String,
    /// Control field value (text content)
    #[serde(rename = "$value", default)]
    pub value: String,
}

/// MarcXchange data field representation.
#[derive(Debug, Serialize, Deserialize)]
pub struct MarcxchangeDataField {
    /// Field tag as an XML attribute
    #[serde(rename = "@tag")]
    pub tag: String,
    /// First indicator as an XML attribute
    #[serde(rename = "@ind1", default)]
    pub ind1: String,
    /// Second indicator as an XML attribute
    #[serde(rename = "@ind2", default)]
    pub ind2: String,
    /// Subfields
    #[serde(default)]
    pub subfield: Vec<MarcxchangeSubfield>,
}

/// MarcXchange subfield representation.
#[derive(Debug, Serialize, Deserialize)]
pub struct MarcxchangeSubfield {
    /// Subfield code as an XML attribute
    #[serde(rename = "@code")]
    pub code: String,
    /// Subfield value (text content)
    #[serde(rename = "$value", default)]
    pub value: String,
}

/// Strip namespace declarations and element prefixes.
fn strip_namespaces(xml: &str) -> String {
    let stripped = XMLNS_DECLARATION.replace_all(xml, "");
    ELEMENT_PREFIX.replace_all(&stripped, "<$1").to_string()
}

fn parse_xml(xml: &str) -> Result<MarcxchangeRecord> {
    xml_from_str(&strip_namespaces(xml))
        .map_err(|e| MarcError::XmlError(format!("Failed to parse MarcXchange: {e}")))
}

fn data_field(df: MarcxchangeDataField) -> Field {
    field_from_flat(FlatField::Data {
        tag: df.tag,
        ind1: df.ind1,
        ind2: df.ind2,
        subfields: df.subfield.into_iter().map(|sf| (sf.code, sf.value)).collect(),
    })
}

/// Characters `start..end` of the leader; short leaders yield shorter strings.
fn leader_slice(leader: &str, start: usize, end: usize) -> String {
    leader.chars().skip(start).take(end - start).collect()
}

/// Build the leader written for a record.
#[must_use]
pub fn leader_for(record: &Record) -> String {
    format!(
        "00000{}{}2200000{}4500",
        record.record_status, record.implementation_codes, record.for_user_systems
    )
}

// ---------------------------------------------------------------------------
// Deserialization: MarcXchange → Record
// ---------------------------------------------------------------------------

/// Read a danMARC2 MarcXchange record.
///
/// Only data fields are read; the record gets default header values.
///
/// # Errors
///
/// Returns [`MarcError::XmlError`] if the XML cannot be parsed.
pub fn marcxchange_to_record(xml: &str) -> Result<Record> {
    let xml_record = parse_xml(xml)?;
    let mut record = Record::new();
    for field in xml_record.fields {
        if let MarcxchangeField::Data(df) = field {
            record.append(data_field(df));
        }
    }
    tracing::debug!(fields = record.size(), "read danMARC2 MarcXchange record");
    Ok(record)
}

/// Read a MARC21 MarcXchange record.
///
/// # Errors
///
/// Returns [`MarcError::UnsupportedFormat`] if the `format` attribute is not
/// `MARC21`, and [`MarcError::XmlError`] if the XML cannot be parsed.
pub fn marcxchange_m21_to_record(xml: &str) -> Result<Record> {
    let xml_record = parse_xml(xml)?;
    if xml_record.format != MarcFormat::Marc21.as_str() {
        return Err(MarcError::UnsupportedFormat(xml_record.format));
    }

    let leader = &xml_record.leader;
    let mut record = Record::builder()
        .record_status(leader_slice(leader, 5, 6))
        .implementation_codes(leader_slice(leader, 6, 10))
        .for_user_systems(leader_slice(leader, 17, 20))
        .build();

    let (control, data): (Vec<_>, Vec<_>) = xml_record
        .fields
        .into_iter()
        .partition(|field| matches!(field, MarcxchangeField::Control(_)));
    for field in control.into_iter().chain(data) {
        match field {
            MarcxchangeField::Control(cf) => record.append(Field::control(cf.tag, cf.value)),
            MarcxchangeField::Data(df) => record.append(data_field(df)),
        }
    }
    tracing::debug!(
        fields = record.size(),
        leader = %xml_record.leader,
        "read MARC21 MarcXchange record"
    );
    Ok(record)
}

// ---------------------------------------------------------------------------
// Serialization: Record → MarcXchange
// ---------------------------------------------------------------------------

/// Convert a record to a MarcXchange XML string.
///
/// The root `<record>` carries the namespace of `format` plus the `format`
/// and `type` attributes. Fields are written in record order.
///
/// # Errors
///
/// Returns [`MarcError::StateViolation`] for an indicator longer than two
/// characters, and [`MarcError::XmlError`] if serialization fails.
pub fn record_to_marcxchange(
    record: &Record,
    format: MarcFormat,
    record_type: RecordType,
) -> Result<String> {
    let xml_record = MarcxchangeRecord {
        format: format.as_str().to_string(),
        record_type: record_type.as_str().to_string(),
        leader: leader_for(record),
        fields: record_to_flat(record)?
            .into_iter()
            .map(MarcxchangeField::from)
            .collect(),
    };

    let body = xml_to_string(&xml_record)
        .map_err(|e| MarcError::XmlError(format!("Failed to serialize to MarcXchange: {e}")))?;
    let body = body.replacen(
        "<record ",
        &format!("<record xmlns=\"{}\" ", format.namespace()),
        1,
    );
    tracing::debug!(%format, fields = record.size(), "wrote MarcXchange record");

    Ok(format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>{body}"))
}
