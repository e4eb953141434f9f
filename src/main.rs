use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use colored::*;
use tcpsweep::{
    api,
    config::Settings,
    output::{self, ErrorReport, OutputFormat},
    utils::Logger,
    PortRange, PortSet, ScanConfig, ScanService,
};

fn cli() -> Command {
    Command::new("tcpsweep")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Bounded-concurrency TCP connect port scanner")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Settings file (defaults to ~/.tcpsweep.toml when present)")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("ulimit")
                .short('u')
                .long("ulimit")
                .value_name("LIMIT")
                .help("Automatically increase the open file limit to this value")
                .value_parser(clap::value_parser!(u64))
                .global(true),
        )
        .subcommand(
            Command::new("scan")
                .about("Scan a single target and print the open ports")
                .arg(
                    Arg::new("target")
                        .value_name("TARGET")
                        .help("IP address or hostname to scan")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("ports")
                        .short('p')
                        .long("ports")
                        .value_name("START-END")
                        .help("Port range to scan, e.g. 1-1024 or 22 (default: common ports)")
                        .value_parser(|s: &str| s.parse::<PortRange>().map_err(|e| e.to_string())),
                )
                .arg(
                    Arg::new("timeout")
                        .short('t')
                        .long("timeout")
                        .value_name("SECONDS")
                        .help("Connect timeout per port in seconds")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("threads")
                        .short('T')
                        .long("threads")
                        .value_name("COUNT")
                        .help("Maximum number of concurrent probes")
                        .value_parser(clap::value_parser!(u32).range(1..)),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the scan report as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("serve")
                .about("Serve the scan API and operator console over HTTP")
                .arg(
                    Arg::new("bind")
                        .short('b')
                        .long("bind")
                        .value_name("ADDR")
                        .help("Listen address (default from settings, 127.0.0.1:5000)"),
                ),
        )
}

#[cfg(unix)]
fn adjust_ulimit_size(ulimit: Option<u64>) -> Option<u64> {
    use rlimit::Resource;

    if let Some(limit) = ulimit {
        if Resource::NOFILE.set(limit, limit).is_ok() {
            println!(
                "{} {}",
                "[~] Automatically increasing ulimit value to".bright_blue(),
                limit.to_string().bright_cyan().bold()
            );
        } else {
            eprintln!("{}", "[!] ERROR: Failed to set ulimit value.".bright_red());
        }
    }

    match Resource::NOFILE.get() {
        Ok((soft, _)) => Some(soft),
        Err(e) => {
            log::warn!("Could not get file descriptor limit: {}", e);
            None
        }
    }
}

#[cfg(not(unix))]
fn adjust_ulimit_size(_ulimit: Option<u64>) -> Option<u64> {
    None
}

fn warn_if_fd_limit_low(fd_limit: Option<u64>, concurrency: usize) {
    if let Some(limit) = fd_limit {
        if (concurrency as u64) >= limit {
            eprintln!(
                "{} {} concurrent probes may exceed the open file limit ({}); consider --ulimit",
                "[!]".bright_yellow(),
                concurrency,
                limit
            );
        }
    }
}

fn scan_config(matches: &ArgMatches, settings: &Settings) -> anyhow::Result<ScanConfig> {
    let target = matches
        .get_one::<String>("target")
        .ok_or_else(|| anyhow::anyhow!("missing target"))?;

    let ports = matches
        .get_one::<PortRange>("ports")
        .map(|range| PortSet::Range(*range))
        .unwrap_or_default();

    let timeout = match matches.get_one::<f64>("timeout") {
        Some(&secs) if secs.is_finite() && secs > 0.0 => Duration::try_from_secs_f64(secs)?,
        Some(secs) => anyhow::bail!("timeout must be a positive number of seconds, got {}", secs),
        None => settings.timeout(),
    };

    let threads = matches
        .get_one::<u32>("threads")
        .map(|&threads| threads as usize)
        .unwrap_or(settings.threads);

    Ok(ScanConfig::new(target.as_str())
        .with_ports(ports)
        .with_timeout(timeout)
        .with_max_concurrency(threads))
}

async fn run_scan(matches: &ArgMatches, settings: &Settings, fd_limit: Option<u64>) -> anyhow::Result<()> {
    let config = scan_config(matches, settings)?;
    let format = if matches.get_flag("json") {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    warn_if_fd_limit_low(fd_limit, config.max_concurrency.min(config.ports.len()));

    if format == OutputFormat::Text {
        eprintln!(
            "{} Scanning {} ({}, timeout {:?}, {} concurrent)",
            "[~]".bright_blue(),
            config.target.bright_cyan(),
            config.ports,
            config.timeout,
            config.max_concurrency
        );
    }

    let service = ScanService::new(settings);
    match service.execute(config).await {
        Ok(result) => {
            println!("{}", output::render(&result, format)?);
            Ok(())
        }
        Err(e) if format == OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&ErrorReport::new(e.to_string()))?);
            process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

async fn run_serve(matches: &ArgMatches, settings: Settings) -> anyhow::Result<()> {
    let bind = matches
        .get_one::<String>("bind")
        .cloned()
        .unwrap_or_else(|| settings.bind.clone());

    let service = ScanService::new(&settings);
    api::serve(&bind, service).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    Logger::init(Logger::level_for_verbosity(matches.get_count("verbose")));

    let settings = Settings::load(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    let fd_limit = adjust_ulimit_size(matches.get_one::<u64>("ulimit").copied());

    match matches.subcommand() {
        Some(("scan", sub)) => run_scan(sub, &settings, fd_limit).await,
        Some(("serve", sub)) => {
            warn_if_fd_limit_low(fd_limit, settings.threads);
            run_serve(sub, settings).await
        }
        _ => unreachable!("subcommand_required guarantees a subcommand"),
    }
}
