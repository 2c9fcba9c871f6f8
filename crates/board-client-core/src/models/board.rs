use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(alias = "writer", alias = "username")]
    pub author: Option<String>,
    #[serde(rename = "createdAt", alias = "createdDate")]
    /// Server timestamp as sent; render with `utils::format_timestamp`
    pub created_at: Option<String>,
}

impl Post {
    pub fn author_display(&self) -> &str {
        self.author.as_deref().unwrap_or("(unknown)")
    }
}

/// Body for creating or updating a post
#[derive(Debug, Clone, Serialize)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
}

/// One page of results, in the server's paging shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    /// Zero-based page index
    #[serde(default)]
    pub number: u32,
    #[serde(rename = "totalPages", default)]
    pub total_pages: u32,
    #[serde(rename = "totalElements", default)]
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number + 1 < self.total_pages
    }

    /// "page X of Y", one-based for display
    pub fn position_display(&self) -> String {
        format!("page {} of {}", self.number + 1, self.total_pages.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_of_posts() {
        let json = r#"{"content":[{"id":3,"title":"Hello","content":"First post","author":"alice","createdAt":"2025-10-31T16:32:05"}],"number":0,"totalPages":2,"totalElements":11,"size":10}"#;
        let page: Page<Post> = serde_json::from_str(json).expect("Failed to parse page JSON");
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].author_display(), "alice");
        assert!(page.content[0].created_at.is_some());
        assert!(page.has_next());
        assert_eq!(page.position_display(), "page 1 of 2");
    }

    #[test]
    fn test_post_missing_optional_fields() {
        let post: Post = serde_json::from_str(r#"{"id":1,"title":"t"}"#).expect("parse");
        assert_eq!(post.author_display(), "(unknown)");
        assert_eq!(post.content, "");
        assert!(post.created_at.is_none());
    }
}
