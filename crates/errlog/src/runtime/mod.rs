//! Runtime module — invocation lifecycle: boot, run.

pub mod boot;
pub mod run;
