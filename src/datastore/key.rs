/// Entity keys
///
/// A key names one entity: the kind it is stored under plus the integer id
/// the store assigned when the entity was first written.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    pub kind: String,
    pub id: i64,
}

impl Key {
    /// Build a complete key for an existing entity
    pub fn id_key(kind: impl Into<String>, id: i64) -> Self {
        Self {
            kind: kind.into(),
            id,
        }
    }

    /// Decimal encoding of the id, as exposed over the API
    pub fn encoded_id(&self) -> String {
        self.id.to_string()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.id)
    }
}
