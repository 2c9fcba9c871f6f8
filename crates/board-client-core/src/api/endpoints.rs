/// Default base URL when nothing is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";
/// Identity probe
pub const ME_PATH: &str = "/api/auth/me";

const BOARD_PATH: &str = "/api/board";
const COMMENTS_PATH: &str = "/api/comments";

/// URL templates for every API call, rooted at one base URL
#[derive(Debug, Clone)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn login(&self) -> String {
        format!("{}{}", self.base_url, LOGIN_PATH)
    }

    pub fn register(&self) -> String {
        format!("{}{}", self.base_url, REGISTER_PATH)
    }

    pub fn me(&self) -> String {
        format!("{}{}", self.base_url, ME_PATH)
    }

    pub fn board_list(&self, page: u32) -> String {
        format!("{}{}?page={}", self.base_url, BOARD_PATH, page)
    }

    /// Collection URL, used to create posts
    pub fn board(&self) -> String {
        format!("{}{}", self.base_url, BOARD_PATH)
    }

    /// Detail, update and delete all share this URL
    pub fn post(&self, id: i64) -> String {
        format!("{}{}/{}", self.base_url, BOARD_PATH, id)
    }

    /// List and create comments of a post
    pub fn post_comments(&self, post_id: i64) -> String {
        format!("{}{}/{}/comments", self.base_url, BOARD_PATH, post_id)
    }

    pub fn comment(&self, comment_id: i64) -> String {
        format!("{}{}/{}", self.base_url, COMMENTS_PATH, comment_id)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}
