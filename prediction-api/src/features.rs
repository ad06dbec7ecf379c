//! Feature Mapping - wire fields to training columns
//!
//! **This is where correctness can silently break.**
//!
//! Each service declares ONE table of [`FieldMapping`]s, in the exact column
//! order the model was fit with. The table is the single source of truth for:
//! - which wire field feeds which training column
//! - the order of columns in the row handed to the model
//!
//! At startup the table is checked against the loaded model's input columns
//! (see [`FeatureMapper::verify`]); a mismatch aborts startup.

use serde::ser::{Serialize, SerializeMap, Serializer};

// ============================================================================
// VALUES
// ============================================================================

/// One cell of a feature row
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl FeatureValue {
    /// Type name used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            FeatureValue::Int(_) => "integer",
            FeatureValue::Float(_) => "float",
            FeatureValue::Text(_) => "text",
        }
    }

    /// Numeric view (integers widen to f64)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Int(v) => Some(*v as f64),
            FeatureValue::Float(v) => Some(*v),
            FeatureValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for FeatureValue {
    fn from(v: i64) -> Self {
        FeatureValue::Int(v)
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        FeatureValue::Float(v)
    }
}

impl From<&str> for FeatureValue {
    fn from(v: &str) -> Self {
        FeatureValue::Text(v.to_string())
    }
}

// ============================================================================
// FEATURE ROW
// ============================================================================

/// Single-row table in training column order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureRow {
    cells: Vec<(&'static str, FeatureValue)>,
}

impl FeatureRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: &'static str, value: FeatureValue) {
        self.cells.push((column, value));
    }

    /// Lookup by training column name (O(n), rows are small)
    pub fn get(&self, column: &str) -> Option<&FeatureValue> {
        self.cells
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.cells.iter().map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Serializes as a flat JSON object that keeps column order
impl Serialize for FeatureRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// ============================================================================
// MAPPING TABLE
// ============================================================================

/// Wire field name → training column name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    pub wire: &'static str,
    pub column: &'static str,
}

impl FieldMapping {
    /// Wire name and training column are identical
    pub const fn same(name: &'static str) -> Self {
        Self { wire: name, column: name }
    }

    pub const fn renamed(wire: &'static str, column: &'static str) -> Self {
        Self { wire, column }
    }
}

/// A validated request that can hand out values by wire field name
pub trait FeatureSource {
    fn feature(&self, wire: &str) -> Option<FeatureValue>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    #[error("no value for wire field '{0}'")]
    MissingField(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("model expects columns with no mapping: {}", .0.join(", "))]
    Unmapped(Vec<String>),

    #[error("mapping produces columns unknown to the model: {}", .0.join(", "))]
    UnknownToModel(Vec<String>),

    #[error("column '{0}' is mapped more than once")]
    Duplicate(String),
}

/// Applies a mapping table to validated requests
#[derive(Debug, Clone, Copy)]
pub struct FeatureMapper {
    table: &'static [FieldMapping],
}

impl FeatureMapper {
    pub fn new(table: &'static [FieldMapping]) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'static [FieldMapping] {
        self.table
    }

    /// Training column names, in row order
    pub fn columns(&self) -> Vec<&'static str> {
        self.table.iter().map(|m| m.column).collect()
    }

    /// Build the model row. Pure: same input, same row.
    pub fn map<S: FeatureSource>(&self, source: &S) -> Result<FeatureRow, MappingError> {
        let mut row = FeatureRow::new();
        for mapping in self.table {
            let value = source
                .feature(mapping.wire)
                .ok_or(MappingError::MissingField(mapping.wire))?;
            row.push(mapping.column, value);
        }
        Ok(row)
    }

    /// Startup completeness check against the model's expected columns
    pub fn verify(&self, model_columns: &[String]) -> Result<(), SchemaError> {
        let mapped = self.columns();

        for (i, column) in mapped.iter().enumerate() {
            if mapped[..i].contains(column) {
                return Err(SchemaError::Duplicate(column.to_string()));
            }
        }

        let unmapped: Vec<String> = model_columns
            .iter()
            .filter(|c| !mapped.contains(&c.as_str()))
            .cloned()
            .collect();
        if !unmapped.is_empty() {
            return Err(SchemaError::Unmapped(unmapped));
        }

        let unknown: Vec<String> = mapped
            .iter()
            .filter(|c| !model_columns.iter().any(|m| m == *c))
            .map(|c| c.to_string())
            .collect();
        if !unknown.is_empty() {
            return Err(SchemaError::UnknownToModel(unknown));
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
