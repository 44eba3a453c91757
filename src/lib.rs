pub mod cli;

mod config;
mod filter;
mod finder;
mod inventory;
mod pattern;
mod report;
mod services;
mod util;

#[macro_use]
extern crate prettytable;
