//! Core business logic - framework-agnostic operations over a SeaORM connection.
//!
//! The HTTP layer in [`crate::api`] only translates requests into calls to these
//! functions and their results into responses.

/// Administrator accounts and login
pub mod admin;
/// Check-ins and daily statistics
pub mod attendance;
/// Coach records
pub mod coach;
/// Bulk member import from spreadsheet rows
pub mod import;
/// Member registration and maintenance
pub mod member;
/// Membership products
pub mod product;
/// Spreadsheet parsing and rendering
pub mod spreadsheet;
/// Membership end-date computation
pub mod term;
