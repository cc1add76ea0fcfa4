pub mod access;
pub mod announcements;
pub mod attendance;
pub mod credentials;
pub mod employees;
pub mod feedback;
pub mod leave;
pub mod payroll;
pub mod profile;

#[cfg(test)]
pub(crate) mod testing;
