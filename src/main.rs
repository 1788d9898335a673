use std::path::Path;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sysgreet::{
    BootstrapEnv, BootstrapIo, BootstrapOptions, CancelToken, ConfigArgs, DemoFacts,
    FactsProvider, LoadOptions, SysgreetConfig, SysgreetError, SystemFacts, bootstrap,
    render_banner,
};

const LOG_VAR: &str = "SYSGREET_LOG";

#[derive(Parser, Debug)]
#[command(name = "sysgreet")]
#[command(version, about = "Login banner with a safe first-run config bootstrap", long_about = None)]
struct Cli {
    /// Config bootstrap policy: prompt, keep, or overwrite
    #[arg(long, value_name = "POLICY")]
    config_policy: Option<String>,

    /// Print nothing
    #[arg(long)]
    disable: bool,

    /// Render the banner from demo data and the default config
    #[arg(long)]
    demo: bool,

    /// Debug logging on stderr (overrides SYSGREET_LOG)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inspect the configuration
    Config(ConfigArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_user_cancel() => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("sysgreet: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<(), SysgreetError> {
    let env = BootstrapEnv::from_env();
    let options = LoadOptions::new().config_override(env.config_path.as_deref());

    if let Some(Command::Config(args)) = cli.command {
        let result = options.handle(&args.into_action())?;
        print!("{result}");
        return Ok(());
    }

    if cli.disable {
        return Ok(());
    }

    if cli.demo {
        let config = SysgreetConfig::defaults()?;
        println!("{}", render_banner(&DemoFacts.facts(), &config));
        return Ok(());
    }

    let flag_policy = cli.config_policy.unwrap_or_default();
    match options.write_path() {
        Ok(path) => {
            let policy_provided = !flag_policy.is_empty() || !env.policy.is_empty();
            if policy_provided || needs_file(&path) {
                run_bootstrap(&path, flag_policy, &env)?;
            }
        }
        Err(SysgreetError::NoConfigPath) => {
            tracing::warn!("no config directory available, skipping bootstrap");
        }
        Err(e) => return Err(e),
    }

    let (config, source) = options.load()?;
    tracing::debug!(source = ?source, "config loaded");
    println!("{}", render_banner(&SystemFacts.facts(), &config));
    Ok(())
}

/// Missing, or a directory sitting where the file should be. Other stat
/// failures surface when the config is loaded.
fn needs_file(path: &Path) -> bool {
    match std::fs::metadata(path) {
        Ok(meta) => meta.is_dir(),
        Err(e) => e.kind() == std::io::ErrorKind::NotFound,
    }
}

fn run_bootstrap(path: &Path, flag_policy: String, env: &BootstrapEnv) -> Result<(), SysgreetError> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut status = std::io::stderr();
    let mut io = BootstrapIo {
        input: &mut input,
        status: &mut status,
    };
    let options = BootstrapOptions {
        flag_policy,
        env_policy: env.policy.clone(),
        interactive: env.interactive(),
    };
    bootstrap(&CancelToken::new(), path, &mut io, &options)?;
    Ok(())
}
