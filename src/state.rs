use crate::db::{DbPool, OrmConn};
use crate::images::ImageStore;

/// Process-wide handles, built once at startup and passed into every
/// handler and service explicitly.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub images: ImageStore,
    pub jwt_secret: String,
}
