pub mod token;
pub use token::{Claims, TokenError, TokenService};

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, Login};
pub use auth_service_impl::SeaOrmAuthService;

pub mod account_service;
pub mod account_service_impl;
pub use account_service::{AccountError, AccountService};
pub use account_service_impl::SeaOrmAccountService;

pub mod import_service;
pub mod import_service_impl;
pub use import_service::{ImportError, ImportReport, ImportRowError, ImportService};
pub use import_service_impl::DefaultImportService;

pub mod event_service;
pub mod event_service_impl;
pub use event_service::{EventError, EventService};
pub use event_service_impl::SeaOrmEventService;
