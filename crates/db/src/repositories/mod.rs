//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Reads
//! that stand alone take `&PgPool`; anything that must share a transaction
//! with other writes takes `&mut PgConnection`.

pub mod booking_repo;
pub mod collaborator_repo;
pub mod day_worker_repo;
pub mod movement_repo;
pub mod post_repo;
pub mod vacancy_mark_repo;
pub mod work_day_repo;

pub use booking_repo::BookingRepo;
pub use collaborator_repo::CollaboratorRepo;
pub use day_worker_repo::DayWorkerRepo;
pub use movement_repo::MovementRepo;
pub use post_repo::PostRepo;
pub use vacancy_mark_repo::VacancyMarkRepo;
pub use work_day_repo::WorkDayRepo;
