//! wsdot: command-line front end for the built-in endpoint catalog
//!
//! Usage:
//!   wsdot list                                     List built-in endpoints
//!   wsdot describe <endpoint>                      Show template, schemas, sample
//!   wsdot call <endpoint> [key=value ...]          Call an endpoint and print JSON

use anyhow::{anyhow, Context};
use tracing_subscriber::EnvFilter;
use wsdot_client::protocol::request::placeholders;
use wsdot_client::{registry, ApiError, LogMode, Params, WsdotClient};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    match args[1].as_str() {
        "list" => cmd_list(),
        "describe" => cmd_describe(&args[2..]),
        "call" => {
            if let Err(e) = cmd_call(&args[2..]) {
                eprintln!("Error: {e:#}");
                std::process::exit(1);
            }
        }
        "version" | "--version" | "-V" => cmd_version(),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!(
        r#"wsdot — WSDOT ferries and highway conditions client

USAGE:
    wsdot <COMMAND> [OPTIONS]

COMMANDS:
    list                                List built-in endpoints
    describe <endpoint>                 Show an endpoint's template, schemas and sample
    call <endpoint> [key=value ...]     Call an endpoint and print the JSON result
        --sample                        Use the endpoint's sample parameters
        --quiet                         Silence pipeline logging
        --verbose                       Log every stage transition
    version                             Show version information
    help                                Show this help message

ENVIRONMENT:
    WSDOT_ACCESS_CODE                   Access code (the OS keyring is checked first)
    WSDOT_HTTP_TIMEOUT_SECS             Direct transport timeout
    WSDOT_PROXY_URL                     HTTP proxy
    WSDOT_BASE_URL_OVERRIDE             Route every endpoint to another origin
    WSDOT_LOG_MODE                      silent | info | debug
    RUST_LOG                            tracing filter"#
    );
}

fn cmd_version() {
    println!("wsdot {}", env!("CARGO_PKG_VERSION"));
}

fn cmd_list() {
    for family in [wsdot_client::ApiFamily::Ferries, wsdot_client::ApiFamily::HighwayConditions] {
        println!("=== {family} ===");
        for endpoint in registry::by_family(family) {
            let sample = if endpoint.sample_params().is_some() { " (sample)" } else { "" };
            println!("  {:<34} {}{sample}", endpoint.name(), endpoint.path_template());
        }
        println!();
    }
}

fn cmd_describe(args: &[String]) {
    let Some(name) = args.first() else {
        eprintln!("Usage: wsdot describe <endpoint>");
        std::process::exit(1);
    };
    let Some(endpoint) = registry::find(name) else {
        eprintln!("Unknown endpoint: {name} (see `wsdot list`)");
        std::process::exit(1);
    };

    println!("Endpoint:    {}", endpoint.name());
    println!("Family:      {}", endpoint.family());
    println!("Credential:  {}", endpoint.family().credential_param());
    println!("URL:         {}{}", endpoint.base_url(), endpoint.path_template());
    let params = placeholders(endpoint.path_template());
    if !params.is_empty() {
        println!("Parameters:  {}", params.join(", "));
    }
    if let Some(sample) = endpoint.sample_params() {
        println!("Sample:      {sample}");
    }
    for (label, schema) in [("Input", endpoint.input_schema()), ("Output", endpoint.output_schema())] {
        if let Some(schema) = schema {
            let pretty = serde_json::to_string_pretty(schema.source()).unwrap_or_default();
            println!("\n{label} schema:\n{pretty}");
        }
    }
}

fn cmd_call(args: &[String]) -> anyhow::Result<()> {
    let name = args
        .first()
        .ok_or_else(|| anyhow!("Usage: wsdot call <endpoint> [key=value ...]"))?;
    let endpoint =
        registry::find(name).ok_or_else(|| anyhow!("Unknown endpoint: {name} (see `wsdot list`)"))?;

    let mut use_sample = false;
    let mut log_mode = None;
    let mut pairs = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "--sample" => use_sample = true,
            "--quiet" => log_mode = Some(LogMode::Silent),
            "--verbose" => log_mode = Some(LogMode::Debug),
            other => pairs.push(other),
        }
    }

    let default_filter = match log_mode {
        Some(LogMode::Debug) => "wsdot_client=debug",
        _ => "wsdot_client=info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut params = if use_sample {
        endpoint.sample_params().unwrap_or_default()
    } else {
        Params::new()
    };
    for (key, value) in Params::from_pairs(pairs)?.iter() {
        params.insert(key, value.clone());
    }

    let mut builder = WsdotClient::builder();
    if let Some(mode) = log_mode {
        builder = builder.log_mode(mode);
    }
    let client = builder.build().context("failed to configure client")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    match runtime.block_on(client.execute(endpoint, params)) {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(err) => {
            for line in failure_report(&err, log_mode == Some(LogMode::Debug)) {
                eprintln!("{line}");
            }
            std::process::exit(1);
        }
    }
}

/// User message and hint; the internal error display only when verbose.
fn failure_report(err: &ApiError, verbose: bool) -> Vec<String> {
    let mut lines = vec![err.user_message().to_string()];
    if verbose {
        lines.push(format!("  {err}"));
    }
    lines.push(format!("  hint: {}", err.code().hint()));
    lines
}
