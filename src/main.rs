use anyhow::{Context, Result};
use circbuf::{check, config::Config, driver::Session, logging, script};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use serde_json::json;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;

#[derive(Parser, Debug)]
#[command(name = "circbuf", about = "Drive a fixed-capacity ring buffer from a command script", version)]
struct Cli {
    /// Script file with one command per line (push N, pop, peek, size, empty, full, capacity). "-" or absent reads stdin
    script: Option<PathBuf>,

    /// Buffer capacity (default: buffer.default_capacity from the config file)
    #[arg(short, long)]
    capacity: Option<usize>,

    /// Inline script instead of a file, e.g. "push 1; push 2; pop"
    #[arg(short, long, conflicts_with = "script")]
    exec: Option<String>,

    /// Print a single JSON document with every result and the final state
    #[arg(long)]
    json: bool,

    /// Run the built-in boundary checks: exit 0 = all passed, 1 = failures
    #[arg(long)]
    check: bool,

    /// Print config file path and current values, then exit
    #[arg(long)]
    show_config: bool,

    /// Use this config file instead of the per-user one
    #[arg(long, value_name = "PATH")]
    config_file: Option<PathBuf>,

    /// Log every push/pop to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("circbuf: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "circbuf", &mut io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    let (cfg, ignored) = match &cli.config_file {
        Some(path) => (Config::load_from(path)?, None),
        None       => Config::load(),
    };
    logging::init(if cli.verbose { "debug" } else { cfg.log.level.as_str() });
    if let Some(e) = ignored {
        warn!(error = %format!("{:#}", e), "ignoring config file, using defaults");
    }

    if cli.show_config {
        return run_print_config(&cfg, cli.config_file.as_deref());
    }
    if cli.check {
        return run_check(cli.capacity, cli.json);
    }

    let text = match (&cli.exec, &cli.script) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read script {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("cannot read stdin")?;
            buf
        }
    };
    let capacity = cli.capacity.unwrap_or(cfg.buffer.default_capacity);
    run_script(&text, capacity, &cfg, cli.json)
}

fn run_script(text: &str, capacity: usize, cfg: &Config, as_json: bool) -> Result<ExitCode> {
    let steps = script::parse(text)?;
    let mut session = Session::new(capacity, cfg.driver.stop_on_error)?;
    session.run(&steps);

    if as_json {
        let doc = json!({
            "circbuf_version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Local::now().to_rfc3339(),
            "capacity":  capacity,
            "stopped":   session.stopped(),
            "records":   session.records(),
            "final":     session.summary(),
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        for rec in session.records() {
            if cfg.driver.echo_commands {
                println!("{}: {}", rec.command, rec.outcome);
            } else {
                println!("{}", rec.outcome);
            }
        }
    }

    Ok(if session.stopped() { ExitCode::from(1) } else { ExitCode::SUCCESS })
}

fn run_check(capacity: Option<usize>, as_json: bool) -> Result<ExitCode> {
    let caps: Vec<usize> = match capacity {
        Some(c) => vec![c],
        None    => check::DEFAULT_CAPACITIES.to_vec(),
    };
    let results = check::run_all(&caps)?;
    let failed = results.iter().filter(|r| !r.passed).count();

    if as_json {
        let doc = json!({
            "passed":  results.len() - failed,
            "failed":  failed,
            "checks":  results,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        for r in &results {
            match &r.detail {
                None         => println!("[PASS] {}", r.name),
                Some(detail) => println!("[FAIL] {}: {}", r.name, detail),
            }
        }
        if failed == 0 {
            println!("OK: {} check(s) passed", results.len());
        } else {
            println!("FAILED: {} of {} check(s)", failed, results.len());
        }
    }

    Ok(if failed == 0 { ExitCode::SUCCESS } else { ExitCode::from(1) })
}

fn run_print_config(cfg: &Config, explicit: Option<&std::path::Path>) -> Result<ExitCode> {
    let path = explicit
        .map(|p| p.to_path_buf())
        .or_else(Config::config_path)
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(unknown)".to_string());
    println!("Config: {}", path);
    println!();
    println!("[buffer]");
    println!("  default_capacity = {}", cfg.buffer.default_capacity);
    println!();
    println!("[driver]");
    println!("  stop_on_error = {}", cfg.driver.stop_on_error);
    println!("  echo_commands = {}", cfg.driver.echo_commands);
    println!();
    println!("[log]");
    println!("  level = {:?}", cfg.log.level);
    Ok(ExitCode::SUCCESS)
}
