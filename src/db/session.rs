use sqlx::{Any, AnyConnection, Transaction};

/// One unit of work against the database.
///
/// Nothing commits implicitly: writes become durable only through
/// [`Session::commit`]. Dropping the session on any other exit path
/// (early return, `?`, panic) rolls the transaction back and returns the
/// connection to the pool. A session is scoped to exactly one unit of
/// work and must not be shared across concurrent operations.
pub struct Session {
    tx: Transaction<'static, Any>,
}

impl Session {
    pub(crate) fn new(tx: Transaction<'static, Any>) -> Self {
        Self { tx }
    }

    /// Executor for queries running inside this unit of work.
    pub fn conn(&mut self) -> &mut AnyConnection {
        &mut self.tx
    }

    pub async fn commit(self) -> Result<(), sqlx::Error> {
        self.tx.commit().await
    }
}
