// AI readiness evaluation: rubric → prompt → model → schema validation → score audit.
// All policy (parameters, weights, penalties) lives in rubric.rs; prompts.rs only renders it.

pub mod audit;
pub mod evaluator;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod rubric;
pub mod schema;
