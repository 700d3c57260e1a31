//! Access to per-document field values

use std::collections::HashMap;

use crate::{base::Timestamp, error::FieldAccessError};

/// Field values of the document being scored.
///
/// `Ok(None)` means that the document has no such field, which is
/// distinct from a field that is present but cannot be read.
pub trait DocumentFields {
    /// Textual value of a field
    fn string_value(&self, field: &str) -> Result<Option<String>, FieldAccessError>;

    /// Date value of a field, in milliseconds since the epoch
    fn date_millis(&self, field: &str) -> Result<Option<Timestamp>, FieldAccessError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValues {
    Text(Vec<String>),
    Date(Vec<Timestamp>),
}

/// A document whose field values are held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocument {
    fields: HashMap<String, FieldValues>,
}

impl InMemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, field: &str, value: &str) -> Self {
        self.fields
            .insert(field.to_string(), FieldValues::Text(vec![value.to_string()]));
        self
    }

    pub fn with_date(mut self, field: &str, millis: Timestamp) -> Self {
        self.fields
            .insert(field.to_string(), FieldValues::Date(vec![millis]));
        self
    }

    pub fn with_values(mut self, field: &str, values: FieldValues) -> Self {
        self.fields.insert(field.to_string(), values);
        self
    }
}

impl DocumentFields for InMemoryDocument {
    fn string_value(&self, field: &str) -> Result<Option<String>, FieldAccessError> {
        match self.fields.get(field) {
            None => Ok(None),
            Some(FieldValues::Text(values)) => values
                .first()
                .cloned()
                .map(Some)
                .ok_or_else(|| FieldAccessError::NoValue(field.to_string())),
            Some(FieldValues::Date(_)) => Err(FieldAccessError::WrongType {
                field: field.to_string(),
                expected: "string",
            }),
        }
    }

    fn date_millis(&self, field: &str) -> Result<Option<Timestamp>, FieldAccessError> {
        match self.fields.get(field) {
            None => Ok(None),
            Some(FieldValues::Date(values)) => values
                .first()
                .copied()
                .map(Some)
                .ok_or_else(|| FieldAccessError::NoValue(field.to_string())),
            Some(FieldValues::Text(_)) => Err(FieldAccessError::WrongType {
                field: field.to_string(),
                expected: "date",
            }),
        }
    }
}
