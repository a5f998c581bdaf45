// Module layout for stdout_json.

// Core
pub mod parser;

// Surroundings
pub mod conf;
pub mod cli;
pub mod runtime;
