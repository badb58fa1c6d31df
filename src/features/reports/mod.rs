pub mod dtos;
pub mod handlers;
pub mod models;
pub mod ordering;
pub mod routes;
pub mod services;

pub use services::{GeocodingService, ReportRouter, ReportService};
