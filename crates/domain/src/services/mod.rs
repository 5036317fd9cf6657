pub mod team_distribution_service;

pub use team_distribution_service::{
    CreateTeamCommand, TeamDistributionDetails, TeamDistributionService, TeamDistributionView,
};
