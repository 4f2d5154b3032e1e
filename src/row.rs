use std::path::Path;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::error::Error;

/// One unit of input for a single resource creation: an ordered mapping from
/// field name to string value, built from CLI flags or one CSV line.
///
/// Order is preserved so reports echo fields in the order the operator wrote
/// them. Columns the schema does not know about are carried through to the API
/// untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sets `key` to `value`, replacing an existing entry in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    /// True when the field is absent or empty after trimming whitespace.
    pub fn is_blank(&self, key: &str) -> bool {
        self.get(key).map_or(true, |v| v.trim().is_empty())
    }

    /// Fills blank fields from `defaults`. Values already present in the row
    /// always win, including values that came from CSV cells.
    pub fn merge_defaults(&mut self, defaults: &Row) {
        for (key, value) in &defaults.fields {
            if self.is_blank(key) {
                self.set(key.clone(), value.clone());
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// JSON object with the row's fields, as submitted to the API.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).expect("rows are string maps")
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.set(k, v);
        }
        row
    }
}

/// Decodes a CSV batch file into rows.
///
/// The first line names the fields; names are matched case-sensitively against
/// the per-kind schema. Cells are trimmed. Lines whose cells are all empty are
/// skipped. Any structural decode failure (ragged record, invalid UTF-8) aborts
/// the whole batch: no rows from a malformed file can be trusted.
pub fn read_csv(path: &Path) -> Result<Vec<Row>, Error> {
    let csv_err = |source| Error::Csv {
        path: path.display().to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let headers = reader.headers().map_err(csv_err)?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        rows.push(
            headers
                .iter()
                .zip(record.iter())
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
    }
    Ok(rows)
}
