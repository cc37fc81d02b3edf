//! Index definitions for the medicines collection.

use bson::{Bson, Document};

/// Name MongoDB gives the default text index on the three search fields.
pub const TEXT_INDEX_NAME: &str = "name_text_description_text_composition_text";

/// Key type of one indexed field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Text,
    Ascending,
}

impl IndexKind {
    fn key_value(self) -> Bson {
        match self {
            IndexKind::Text => Bson::String("text".to_string()),
            IndexKind::Ascending => Bson::Int32(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    pub name: String,
    pub keys: Vec<(String, IndexKind)>,
}

impl IndexSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keys: Vec::new(),
        }
    }

    pub fn key(mut self, field: impl Into<String>, kind: IndexKind) -> Self {
        self.keys.push((field.into(), kind));
        self
    }

    /// Key document in field order
    pub fn keys_document(&self) -> Document {
        self.keys
            .iter()
            .map(|(field, kind)| (field.clone(), kind.key_value()))
            .collect()
    }
}

/// Indexes the application queries rely on.
///
/// The text index backs full-text search over name, description and
/// composition. `name_1` backs exact name lookups.
pub fn medicine_indexes() -> Vec<IndexSpec> {
    vec![
        IndexSpec::new(TEXT_INDEX_NAME)
            .key("name", IndexKind::Text)
            .key("description", IndexKind::Text)
            .key("composition", IndexKind::Text),
        IndexSpec::new("name_1").key("name", IndexKind::Ascending),
    ]
}
