//! Command-line front end for the field synchronization engine.

pub mod commands;
