pub mod auth;

pub mod submissions;

pub mod marks;

pub mod extensions;

pub mod reports;

pub mod feed;

pub mod system;

pub use auth::configure_auth_routes;
pub use extensions::configure_extension_routes;
pub use feed::configure_feed_routes;
pub use marks::configure_mark_routes;
pub use reports::configure_report_routes;
pub use submissions::configure_submissions_routes;
pub use system::configure_system_routes;
