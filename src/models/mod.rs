pub mod account;
pub mod role;

pub use account::{AdminProfile, EventRecord, FacultyProfile, StudentProfile};
pub use role::Role;
