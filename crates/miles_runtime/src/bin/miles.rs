//! Miles CLI entry point.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use miles_runtime::demo::{self, DemoState};
use miles_runtime::{Registry, Repl};
use tracing_subscriber::EnvFilter;

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    files: Vec<PathBuf>,
    batch_mode: bool,
    show_help: bool,
    show_version: bool,
    verbose: bool,
    namespace: Option<String>,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "-b" | "--batch" => config.batch_mode = true,
            "-v" | "--verbose" => config.verbose = true,
            "-n" | "--namespace" => {
                i += 1;
                if i >= args.len() {
                    return Err("--namespace requires a value".into());
                }
                config.namespace = Some(args[i].clone());
            }
            arg if arg.starts_with('-') => {
                return Err(format!("unknown option: {arg}").into());
            }
            path => config.files.push(PathBuf::from(path)),
        }
        i += 1;
    }

    Ok(config)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_args(args)?;

    if config.show_help {
        print_help();
        return Ok(());
    }

    if config.show_version {
        println!("miles {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    init_logging(config.verbose);

    let mut registry = Registry::new();
    demo::register(&mut registry)?;
    let core = registry.build()?;

    let mut repl = Repl::new(core, DemoState::default())?.with_reporter(|state: &mut DemoState| {
        for line in state.drain() {
            println!("{line}");
        }
    });
    if let Some(namespace) = config.namespace {
        repl = repl.with_namespace(namespace);
    }

    for file in &config.files {
        repl.eval_file(file)?;
    }

    if config.batch_mode {
        return Ok(());
    }

    if !config.files.is_empty() {
        repl = repl.without_banner();
    }

    repl.run()?;
    Ok(())
}

fn print_help() {
    println!(
        "\x1b[1mMiles\x1b[0m - Grammar-driven command recognition

\x1b[1mUSAGE:\x1b[0m
    miles [OPTIONS] [FILES...]

\x1b[1mARGUMENTS:\x1b[0m
    [FILES...]    Command scripts to run before starting the REPL

\x1b[1mOPTIONS:\x1b[0m
    -h, --help            Print help information
    -V, --version         Print version information
    -b, --batch           Run scripts and exit (no REPL)
    -v, --verbose         Log recognition at debug level
    -n, --namespace NS    Recognize every line in namespace NS

Logging honors RUST_LOG, e.g. RUST_LOG=miles_recognizer=trace.

\x1b[1mEXAMPLES:\x1b[0m
    miles                         Start interactive REPL
    miles -b session.miles        Run session.miles and exit
    miles -n count                Type \"up by 3\" instead of \"count up by 3\"

\x1b[1mDEMO COMMANDS:\x1b[0m
    greet hi | greet hello NAME
    count up [by N] | count down [by N] | count to N | count reset
    calendar move to MONTH        (typos like \"mrach\" are accepted)

\x1b[1mREPL COMMANDS:\x1b[0m
    :namespaces    List namespaces and their prefixes
    :help          Show help
    :quit          Exit"
    );
}
