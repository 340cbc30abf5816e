pub use super::admins::Entity as Admins;
pub use super::faculty::Entity as Faculty;
pub use super::project_events::Entity as ProjectEvents;
pub use super::students::Entity as Students;
