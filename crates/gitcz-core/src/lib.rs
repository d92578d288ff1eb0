pub mod command_runner;
pub mod config;
pub mod git;
pub mod message;
pub mod stage;
#[cfg(test)]
pub(crate) mod test_support;
