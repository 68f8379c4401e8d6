// Job matching: skill normalization, weighted scoring, ranking.
// Storage is reached only through the MatchRepository seam.

pub mod handlers;
pub mod ranking;
pub mod repository;
pub mod scorer;
pub mod service;
pub mod skills;
