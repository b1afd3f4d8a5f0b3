//! Data client for the dashboard server.
//!
//! Three endpoints are consumed: connection status, connection stats, and
//! chat. Status fetches degrade to `None` on any failure because they run
//! unconditionally at page load; the chat call is user-triggered and its
//! failure surfaces as an error the caller must render.

mod client;

pub use client::{ApiError, DashboardApi, HttpDashboard, DEFAULT_SERVER_URL};
