//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod admin;
pub mod attendance;
pub mod coach;
pub mod member;
pub mod product;

// Re-export specific types to avoid conflicts
pub use admin::{Column as AdminColumn, Entity as Admin, Model as AdminModel};
pub use attendance::{Column as AttendanceColumn, Entity as Attendance, Model as AttendanceModel};
pub use coach::{Column as CoachColumn, Entity as Coach, Model as CoachModel};
pub use member::{Column as MemberColumn, Entity as Member, Model as MemberModel};
pub use product::{Column as ProductColumn, DurationUnit, Entity as Product, Model as ProductModel};
