//! Command-line interface for blood donor matching.
//!
//! Reads a snapshot of donors, requests and stock and answers the questions a
//! coordinator asks: who can give, who may give today, who to call first and
//! which request to serve next.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
