//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` request DTOs for the operations that write it

pub mod booking;
pub mod collaborator;
pub mod day_worker;
pub mod movement;
pub mod post;
pub mod vacancy_mark;
pub mod work_day;
