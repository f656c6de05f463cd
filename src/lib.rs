pub mod cli;
pub mod commands;
pub mod context;
pub mod device;
pub mod error;
pub mod fs;
pub mod markup;
pub mod network;
pub mod parser;
pub mod repl;
pub mod save;
pub mod session;
pub mod theme;
pub mod websites;
