pub mod commands;
mod database;
mod email;
mod environment;
