//! # RAMFS Host Daemon
//!
//! Main entry point for the RAMFS host runtime.

use ramfs::RamFsConfig;
use ramfsd::{HostRuntime, HostRuntimeConfig, StdoutConsole};
use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("ramfsd");

    let config = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_usage(program);
        process::exit(1);
    });

    let mut runtime = HostRuntime::new(config, StdoutConsole::new()).unwrap_or_else(|e| {
        eprintln!("Failed to create runtime: {}", e);
        process::exit(1);
    });

    if let Err(e) = runtime.run(io::stdin().lock()) {
        eprintln!("Runtime error: {}", e);
        process::exit(1);
    }

    println!();
    process::exit(runtime.exit_status().unwrap_or(0));
}

fn parse_args(args: &[String]) -> Result<HostRuntimeConfig, String> {
    let mut config = HostRuntimeConfig::default();
    let mut echo = None;
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --config".to_string());
                }
                config.store = HostRuntimeConfig::load_store_config(Path::new(&args[i]))
                    .map_err(|e| e.to_string())?;
            }
            "--script" | "-s" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --script".to_string());
                }
                let script_text = fs::read_to_string(&args[i])
                    .map_err(|e| format!("Failed to read script file: {}", e))?;
                config.script = Some(script_text);
            }
            "--echo" => echo = Some(true),
            "--no-echo" => echo = Some(false),
            "--print-config" => {
                let json = RamFsConfig::default()
                    .to_json()
                    .map_err(|e| e.to_string())?;
                println!("{}", String::from_utf8_lossy(&json));
                process::exit(0);
            }
            "--help" | "-h" => {
                print_usage(args.first().map(String::as_str).unwrap_or("ramfsd"));
                process::exit(0);
            }
            other => {
                return Err(format!("Unknown option: {}", other));
            }
        }
        i += 1;
    }

    // Scripts echo so the output reads as a transcript; a terminal echoes itself.
    config.echo = echo.unwrap_or(config.script.is_some());
    Ok(config)
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [OPTIONS]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --config <FILE>      Store limits as JSON");
    eprintln!("  -s, --script <FILE>      Run commands from a file instead of stdin");
    eprintln!("  --echo / --no-echo       Force echo of typed input on or off");
    eprintln!("  --print-config           Print the default store limits and exit");
    eprintln!("  -h, --help               Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} --script session.txt", program);
    eprintln!("  {} --config limits.json", program);
}
