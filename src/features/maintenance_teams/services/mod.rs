mod maintenance_team_service;

pub use maintenance_team_service::MaintenanceTeamService;
