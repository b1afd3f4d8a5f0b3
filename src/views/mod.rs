pub mod dashboard;

pub use dashboard::DashboardView;
