pub mod command;
pub mod compare;
