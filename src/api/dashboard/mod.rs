pub mod dto;
pub mod handlers;
pub mod service;

// Re-export commonly used types
pub use handlers::dashboard_config;
pub use service::DashboardService;
