pub mod config;
pub mod domain;
pub mod error;
pub mod request;

use chrono::NaiveDate;

use domain::advisor::RepairAdvisor;
use domain::roster::RosterModel;
use domain::validator::LiveValidator;
use error::SchedulerError;
use request::{AdvisorRequest, AdvisorResponse, SolveRequest, SolveResponse, ValidateRequest, ValidateResponse};

/// Runs one end-to-end monthly solve: calendar resolution, history
/// projection, constraint-model build and solve, and statistics
/// extraction (spec §2, §4.4, §6).
pub fn solve(request: &SolveRequest, settings: &config::Settings) -> Result<SolveResponse, SchedulerError> {
    domain::solve::solve(request, settings)
}

/// Validates a full proposed month schedule against every invariant in
/// spec §3 plus the supplementary checks in §4.7.
pub fn validate(request: &ValidateRequest) -> Result<ValidateResponse, SchedulerError> {
    let roster = RosterModel::new(request.employees.clone(), request.avoidance_groups.clone())?;
    let violations = LiveValidator::new(&roster).validate(&request.schedule);
    Ok(ValidateResponse { violations })
}

/// Proposes a single head-count-preserving repair for one validator
/// conflict (spec §4.6). `today` bounds which cells the advisor is allowed
/// to touch.
pub fn advise(request: &AdvisorRequest, today: NaiveDate) -> Result<AdvisorResponse, SchedulerError> {
    let roster = RosterModel::new(request.employees.clone(), request.avoidance_groups.clone())?;
    let advisor = RepairAdvisor::new(&roster, &request.pinned, today);
    let suggestion = advisor.advise(&request.violation, &request.schedule);
    Ok(AdvisorResponse { suggestion })
}
