mod report_dto;

pub use report_dto::{
    AssignTeamDto, CreateReportDto, ReportResponseDto, UpdateReportDto, UpdateReportStatusDto,
};
