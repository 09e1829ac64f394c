// db/db.rs
use sqlx::{Pool, Postgres};

#[derive(Clone)]
pub struct DBClient {
    pub pool: Pool<Postgres>,
}

impl std::fmt::Debug for DBClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DBClient")
            .field("pool", &"Pool<Postgres>")
            .finish()
    }
}

impl DBClient {
    /// Create a new DBClient from an already-connected pool. The pool is
    /// constructed by the process entry point; nothing here reads the
    /// environment.
    pub fn new(pool: Pool<Postgres>) -> Self {
        DBClient { pool }
    }
}
