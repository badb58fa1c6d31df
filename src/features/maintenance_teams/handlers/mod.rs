mod maintenance_team_handler;

pub use maintenance_team_handler::*;
