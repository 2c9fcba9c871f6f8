use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    #[serde(alias = "writer", alias = "username")]
    pub author: Option<String>,
    #[serde(rename = "createdAt", alias = "createdDate")]
    /// Server timestamp as sent; render with `utils::format_timestamp`
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentDraft {
    pub content: String,
}
