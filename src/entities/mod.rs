pub mod prelude;

pub mod admins;
pub mod faculty;
pub mod project_events;
pub mod students;
