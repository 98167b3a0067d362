use std::process;

use tracing_subscriber::EnvFilter;

use rawsh::repl::Repl;

fn main() {
    // Diagnostics go to stderr and stay quiet unless RUST_LOG asks for more;
    // stdout belongs to the prompt and command output.
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let mut repl = Repl::new();
    match repl.run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("rawsh: {err}");
            process::exit(1);
        }
    }
}
