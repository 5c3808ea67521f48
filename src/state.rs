use crate::auth::Keys;
use crate::database::Database;

/// Shared handler state: the connection pool plus the JWT signing keys.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub keys: Keys,
}

impl AppState {
    pub fn new(db: Database, jwt_secret: &str) -> Self {
        Self {
            db,
            keys: Keys::from_secret(jwt_secret.as_bytes()),
        }
    }
}
