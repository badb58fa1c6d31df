mod geocoding_service;
mod report_router;
mod report_service;

pub use geocoding_service::GeocodingService;
pub use report_router::{ProviderDirectory, ReportRouter};
pub use report_service::ReportService;
