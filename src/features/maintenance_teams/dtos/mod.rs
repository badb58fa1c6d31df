mod maintenance_team_dto;

pub use maintenance_team_dto::{
    MaintenanceTeamResponseDto, RegisterMaintenanceTeamDto, UpdateTeamAccountStatusDto,
    UpdateWorkStatusDto,
};
