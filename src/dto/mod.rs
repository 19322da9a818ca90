pub mod auth;
pub mod cart;
pub mod dashboard;
pub mod items;
pub mod merchants;
pub mod messages;
pub mod orders;
pub mod owner;
pub mod search;
pub mod stock;

/// A file pulled out of a multipart request, not yet persisted.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}
