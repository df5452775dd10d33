//! Data models for djset-ai
//!
//! - `brief`: request, validated brief, generation request
//! - `assembly`: run state machine, result and report

pub mod assembly;
pub mod brief;

pub use assembly::{AssemblyReport, AssemblyResult, AssemblyRun, AssemblyState, StateTransition};
pub use brief::{AssemblyRequest, BriefError, GenerationRequest, SetBrief};
