mod maintenance_team;

pub use maintenance_team::{CreateMaintenanceTeam, MaintenanceTeam, WorkStatus};
