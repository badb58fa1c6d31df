mod report;
mod report_category;

pub use report::{CreateReport, Report, ReportStatus, UpdateReportContent, VoteKind};
pub use report_category::IssueCategory;
