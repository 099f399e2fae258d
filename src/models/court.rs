use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Court {
    #[serde(rename = "_id")]
    pub id: String,
    pub venue_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}
