use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaybeBatch<T> {
    Batch(Vec<T>),
    Single(T),
}

impl<T> MaybeBatch<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Batch(items) => items,
            Self::Single(item) => vec![item],
        }
    }
}
