use sqlx::PgPool;
use thiserror::Error;

/// Postgres SQLSTATE for a unique-constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

pub async fn init_db(database_url: &str) -> PgPool {
    PgPool::connect(database_url)
        .await
        .expect("Failed to connect to database")
}

/// Creates the payslips table if it does not exist yet. Idempotent, runs on
/// every startup. A failure here is logged by the caller and does not halt
/// the process; subsequent queries will fail until the schema exists.
pub async fn init_schema(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS payslips (
            id SERIAL PRIMARY KEY,
            employee_name VARCHAR(50) NOT NULL,
            employee_id VARCHAR(7) NOT NULL,
            department VARCHAR(30) NOT NULL,
            employment_type VARCHAR(20) NOT NULL,
            working_days INTEGER NOT NULL CHECK (working_days BETWEEN 1 AND 31),
            date_of_joining DATE NOT NULL,
            bank_details JSONB NOT NULL,
            government_ids JSONB NOT NULL,
            earnings JSONB NOT NULL,
            deductions JSONB NOT NULL,
            totals JSONB NOT NULL,
            timestamp TIMESTAMPTZ NOT NULL,
            CONSTRAINT unique_employee_month UNIQUE (employee_id, timestamp)
        );
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Classified storage failures, so handlers can tell a duplicate submission
/// apart from a constraint breach or an unreachable store. The `Display`
/// strings are what callers see; the underlying driver error stays
/// server-side.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Unique violation on (employee_id, timestamp).
    #[error("A payslip already exists for this employee and timestamp")]
    Duplicate,

    /// Some other integrity constraint rejected the row, e.g. the working
    /// days CHECK or a column length limit.
    #[error("Payslip violates a storage constraint")]
    Constraint,

    /// The store could not be reached.
    #[error("Internal server error")]
    Unavailable,

    /// Anything else from the driver.
    #[error("Internal server error")]
    Other(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => return StorageError::Duplicate,
                // SQLSTATE class 23 covers all integrity constraint violations.
                Some(code) if code.starts_with("23") => return StorageError::Constraint,
                _ => {}
            }
        }

        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => StorageError::Unavailable,
            other => StorageError::Other(other),
        }
    }
}
