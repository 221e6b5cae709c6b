//! Discover a device's prompt and run a command.
//!
//! Connects to a network device, prints the prompt and device type that
//! discovery settled on, then runs one command (default `show version`).
//!
//! # Usage
//!
//! ```bash
//! cargo run --example show_version -- --host 192.0.2.1 --user admin --password secret
//! ```
//!
//! With an externalized pattern file:
//! ```bash
//! cargo run --example show_version -- --host 192.0.2.1 --user admin --password secret \
//!     --patterns patterns.json --command "show clock"
//! ```

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use netprompt::{PatternRegistry, SessionBuilder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=debug shows each discovery attempt
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut builder = SessionBuilder::new(&args.host)
        .port(args.port)
        .username(&args.user)
        .timeout(Duration::from_secs(args.timeout));

    if let Some(password) = &args.password {
        builder = builder.password(password);
    } else if let Some(key_path) = &args.key {
        builder = builder.private_key(key_path);
    } else {
        eprintln!("Error: Must provide either --password or --key");
        std::process::exit(1);
    }

    if let Some(path) = &args.patterns {
        let registry = PatternRegistry::from_json_file(path)?;
        println!("Loaded {} prompt patterns from {}", registry.len(), path.display());
        builder = builder.patterns(registry);
    }

    let mut session = builder.build()?;

    println!("Connecting to {}:{}...", args.host, args.port);
    session.connect().await?;
    println!(
        "Prompt: {} ({})",
        session.prompt().unwrap_or("?"),
        session.device_type().unwrap_or("?")
    );

    println!("\nExecuting: {}", args.command);
    println!("{}", "-".repeat(50));

    let response = session.exec(&args.command).await?;
    println!("{}", response.body());

    println!("{}", "-".repeat(50));
    if response.is_complete() {
        println!("Completed in {:?} ({} reads)", response.elapsed, response.reads);
    } else {
        eprintln!(
            "Output may be truncated: prompt not seen after {} reads",
            response.reads
        );
    }

    session.disconnect().await?;
    println!("Done!");

    Ok(())
}

struct Args {
    host: String,
    port: u16,
    user: String,
    password: Option<String>,
    key: Option<PathBuf>,
    patterns: Option<PathBuf>,
    command: String,
    timeout: u64,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut parsed = Self {
            host: "localhost".to_string(),
            port: 22,
            user: env::var("USER").unwrap_or_else(|_| "admin".to_string()),
            password: None,
            key: None,
            patterns: None,
            command: "show version".to_string(),
            timeout: 5,
        };

        let mut i = 1;
        while i < args.len() {
            let value = args.get(i + 1).cloned();
            match args[i].as_str() {
                "--host" | "-h" => parsed.host = value.unwrap_or(parsed.host),
                "--port" | "-p" => {
                    parsed.port = value.and_then(|v| v.parse().ok()).unwrap_or(22)
                }
                "--user" | "-u" => parsed.user = value.unwrap_or(parsed.user),
                "--password" | "-P" => parsed.password = value,
                "--key" | "-k" => parsed.key = value.map(PathBuf::from),
                "--patterns" => parsed.patterns = value.map(PathBuf::from),
                "--command" | "-c" => parsed.command = value.unwrap_or(parsed.command),
                "--timeout" | "-t" => {
                    parsed.timeout = value.and_then(|v| v.parse().ok()).unwrap_or(5)
                }
                "--help" => {
                    Self::print_help();
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {}", other);
                    i += 1;
                    continue;
                }
            }
            i += 2;
        }

        parsed
    }

    fn print_help() {
        println!(
            r#"netprompt show_version example

USAGE:
    cargo run --example show_version -- [OPTIONS]

OPTIONS:
    -h, --host <HOST>        Target host [default: localhost]
    -p, --port <PORT>        SSH port [default: 22]
    -u, --user <USER>        Username [default: $USER]
    -P, --password <PASS>    Password for authentication
    -k, --key <PATH>         Path to SSH private key
    --patterns <PATH>        JSON prompt pattern file [default: built-in]
    -c, --command <CMD>      Command to run [default: show version]
    -t, --timeout <SECS>     Per-read timeout [default: 5]
    --help                   Print this help message
"#
        );
    }
}
