pub mod orchestrator;
pub mod processing;
