//! Command handlers

pub mod run;
pub mod tables;
pub mod template;
