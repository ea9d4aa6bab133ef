//! Field extraction and validation.
//!
//! Turns a [`RawRequest`] into a flat name → value mapping and checks it
//! against a [`FieldSchema`]. Both encodings share the same rules:
//!
//! - text is UTF-8; anything else is a malformed request
//! - a field without text is present but has no value
//! - the first occurrence of a repeated field wins

use std::collections::BTreeMap;

use percent_encoding::percent_decode;
use quick_xml::Reader;
use quick_xml::events::Event;
use relay_core::RawRequest;

use crate::config::Encoding;
use crate::error::{ExtractError, ValidationError};
use crate::schema::FieldSchema;

/// Media type of a POST form body.
const FORM_MEDIA_TYPE: &str = "application/x-www-form-urlencoded";

/// Fields observed in one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFields {
    fields: BTreeMap<String, Option<String>>,
}

impl RawFields {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a field unless it was already seen. Empty text is stored as
    /// no value.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        let value = value.filter(|v| !v.is_empty());
        self.fields.entry(name.into()).or_insert(value);
    }

    /// Returns the value of a field, if it has one.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|v| v.as_deref())
    }

    /// Returns true if the field was seen, with or without a value.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Observed field names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of observed fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no field was observed.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawFields {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut fields = Self::new();
        for (name, value) in iter {
            fields.insert(name, Some(value.into()));
        }
        fields
    }
}

/// Validated field values.
///
/// Every expected field has a value; every optional field has an entry,
/// `None` when the request did not supply it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    values: BTreeMap<String, Option<String>>,
}

impl FieldValues {
    /// Returns the value of a field.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(|v| v.as_deref())
    }

    /// Returns the value of a field as an owned string.
    pub fn get_owned(&self, name: &str) -> Option<String> {
        self.get(name).map(str::to_string)
    }

    /// Returns true if `name` belongs to the validated schema.
    pub fn has_slot(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}

/// Checks observed fields against a schema.
///
/// Both error lists are computed in full before failing.
pub fn validate(fields: &RawFields, schema: &FieldSchema) -> Result<FieldValues, ValidationError> {
    let unexpected_parameter: Vec<String> = fields
        .names()
        .filter(|name| !schema.accepts(name))
        .map(str::to_string)
        .collect();

    let missing_parameter: Vec<String> = schema
        .expected()
        .iter()
        .filter(|name| fields.get(name).is_none())
        .cloned()
        .collect();

    let error = ValidationError {
        missing_parameter,
        unexpected_parameter,
    };
    if !error.is_empty() {
        return Err(error);
    }

    let values = schema
        .expected()
        .iter()
        .chain(schema.optional())
        .map(|name| (name.clone(), fields.get(name).map(str::to_string)))
        .collect();
    Ok(FieldValues { values })
}

/// Extracts the fields of a request in the given encoding.
pub fn extract(request: &RawRequest, encoding: Encoding) -> Result<RawFields, ExtractError> {
    match encoding {
        Encoding::Form => {
            let mut fields = RawFields::new();
            if let Some(query) = &request.query {
                parse_form_into(query.as_bytes(), &mut fields)?;
            }
            if request.method.eq_ignore_ascii_case("POST")
                && request
                    .media_type()
                    .is_some_and(|mt| mt.eq_ignore_ascii_case(FORM_MEDIA_TYPE))
            {
                parse_form_into(&request.body, &mut fields)?;
            }
            Ok(fields)
        }
        Encoding::Xml => parse_xml(&request.body),
    }
}

/// Parses `application/x-www-form-urlencoded` data.
pub fn parse_form(data: &[u8]) -> Result<RawFields, ExtractError> {
    let mut fields = RawFields::new();
    parse_form_into(data, &mut fields)?;
    Ok(fields)
}

fn parse_form_into(data: &[u8], fields: &mut RawFields) -> Result<(), ExtractError> {
    for pair in data.split(|b| *b == b'&').filter(|p| !p.is_empty()) {
        let (name, value) = match pair.iter().position(|b| *b == b'=') {
            Some(idx) => (&pair[..idx], &pair[idx + 1..]),
            None => (pair, &b""[..]),
        };
        let name = decode_component(name)?;
        let value = decode_component(value)?;
        fields.insert(name, Some(value));
    }
    Ok(())
}

fn decode_component(raw: &[u8]) -> Result<String, ExtractError> {
    let plus_as_space: Vec<u8> = raw
        .iter()
        .map(|b| if *b == b'+' { b' ' } else { *b })
        .collect();
    percent_decode(&plus_as_space)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| ExtractError::malformed(format!("form field is not valid UTF-8: {e}")))
}

/// Parses a flat XML document.
///
/// Direct children of the root become fields; deeper elements contribute
/// nothing.
pub fn parse_xml(body: &[u8]) -> Result<RawFields, ExtractError> {
    let text = std::str::from_utf8(body)
        .map_err(|e| ExtractError::malformed(format!("body is not valid UTF-8: {e}")))?;

    let mut reader = Reader::from_str(text);
    let mut fields = RawFields::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut current: Option<(String, String)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                if depth == 0 && seen_root {
                    return Err(ExtractError::malformed("more than one root element"));
                }
                seen_root = true;
                depth += 1;
                if depth == 2 {
                    current = Some((element_name(start.name().as_ref())?, String::new()));
                }
            }
            Ok(Event::Empty(start)) => {
                if depth == 0 {
                    if seen_root {
                        return Err(ExtractError::malformed("more than one root element"));
                    }
                    seen_root = true;
                } else if depth == 1 {
                    fields.insert(element_name(start.name().as_ref())?, None);
                }
            }
            Ok(Event::Text(t)) if depth == 2 => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractError::malformed(e.to_string()))?;
                if let Some((_, value)) = current.as_mut() {
                    value.push_str(&text);
                }
            }
            Ok(Event::CData(data)) if depth == 2 => {
                let text = std::str::from_utf8(&data)
                    .map_err(|e| ExtractError::malformed(e.to_string()))?;
                if let Some((_, value)) = current.as_mut() {
                    value.push_str(text);
                }
            }
            Ok(Event::End(_)) => {
                if depth == 2 {
                    if let Some((name, value)) = current.take() {
                        fields.insert(name, Some(value));
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ExtractError::malformed(format!(
                    "invalid XML at position {}: {e}",
                    reader.buffer_position()
                )));
            }
        }
    }

    if !seen_root {
        return Err(ExtractError::malformed("no root element"));
    }
    if depth != 0 {
        return Err(ExtractError::malformed("unclosed element"));
    }
    Ok(fields)
}

fn element_name(raw: &[u8]) -> Result<String, ExtractError> {
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(|e| ExtractError::malformed(format!("element name is not valid UTF-8: {e}")))
}
