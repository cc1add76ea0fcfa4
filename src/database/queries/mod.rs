pub mod announcements;
pub mod attendance;
pub mod feedback;
pub mod leave;
pub mod payroll;
pub mod profiles;
pub mod users;

/// True when the error is a UNIQUE constraint violation.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}
