pub mod actions;
pub mod enrichment;
pub mod handlers;
pub mod prompts;
pub mod queries;
pub mod validation;
