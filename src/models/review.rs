use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub booking: i64,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}
