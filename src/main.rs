//! `prismq_scaffold` (pq) - PrismQ module scaffold runtime.
//!
//! Resolves where a scaffolded module's runtime state lives, loads its
//! env-file configuration, and prints startup diagnostics. No daemons,
//! no background processes.

use prismq_scaffold::run;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
