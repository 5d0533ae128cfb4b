// Cold email generation.
// Implements: prompt assembly, the single-call orchestrator, and the
// message endpoint the popup and keyboard shortcut both talk to.

pub mod generator;
pub mod handlers;
pub mod hints;
pub mod prompt_builder;
pub mod prompts;
