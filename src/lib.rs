//! Payroll record-keeping HTTP service.
//!
//! Stores monthly payslip records per employee and exposes filtered views
//! for compliance reporting (provident fund, ESIC and tax withholding).

pub mod api;
pub mod config;
pub mod db;
pub mod docs;
pub mod model;
pub mod routes;
pub mod utils;
