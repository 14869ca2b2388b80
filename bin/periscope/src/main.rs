//! Passive inspector for an Ethereum beacon-chain gossip overlay.
//!
//! Joins the overlay through its own discovery and pub/sub transports,
//! subscribes to a configured topic set, and logs every message it sees.
//! A diagnostic tool: it never proposes, validates, or relays anything
//! beyond what the transport layer requires.
//!
//! ## Usage
//!
//! ```sh
//! periscope -b "enr:-Iu4QK..." --topics b --decode
//! ```

#![warn(unused_crate_dependencies)]

mod cli;

use clap::Parser;
use cli::InspectorCommand;

#[tokio::main]
async fn main() {
    if let Err(err) = InspectorCommand::parse().run().await {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
    // `run` terminates the process itself on interrupt; falling through here
    // means the wiring is broken, and exit code 0 is never correct.
    std::process::exit(1);
}
