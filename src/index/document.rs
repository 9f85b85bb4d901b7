use serde::{Deserialize, Serialize};

/// How a field value is indexed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Stored, indexed as a single exact term, never analyzed
    Keyword,
    /// Stored, analyzed with the index analyzer
    Text,
}

/// A named field of an [`IndexDocument`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexField {
    pub name: String,
    pub value: String,
    pub kind: FieldKind,
}

impl IndexField {
    pub fn keyword(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            kind: FieldKind::Keyword,
        }
    }

    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            kind: FieldKind::Text,
        }
    }
}

/// Structured record handed to an index writer
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDocument {
    fields: Vec<IndexField>,
}

impl IndexDocument {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn add(&mut self, field: IndexField) {
        self.fields.push(field);
    }

    pub fn with_field(mut self, field: IndexField) -> Self {
        self.add(field);
        self
    }

    pub fn fields(&self) -> &[IndexField] {
        &self.fields
    }

    /// Value of the first field with this name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
