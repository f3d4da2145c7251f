pub mod cli;
pub mod logging;
pub mod options;
pub mod webapp;
