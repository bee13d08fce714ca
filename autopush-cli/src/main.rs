use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

mod display;
mod run;

use run::RunOptions;

#[derive(Parser)]
#[command(name = "autopush")]
#[command(
    version,
    about = "Stage every change, commit it with a timestamped message and push",
    long_about = None
)]
struct Cli {
    /// Repository to work in (defaults to the directory holding this executable)
    #[arg(short, long)]
    repo: Option<PathBuf>,

    /// Remote to push to (defaults to the current branch's upstream)
    #[arg(long)]
    remote: Option<String>,

    /// Branch to push (needs --remote)
    #[arg(long)]
    branch: Option<String>,

    /// Text placed before the timestamp in the commit message
    #[arg(long)]
    prefix: Option<String>,

    /// Config file (defaults to autopush.toml in the repository)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Wait for Enter before exiting (also set by pause_on_exit in the config,
    /// which is not consulted when the config itself cannot be loaded)
    #[arg(long)]
    pause: bool,

    /// Fail when there is nothing to commit
    #[arg(long)]
    require_changes: bool,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_options(self) -> RunOptions {
        RunOptions {
            repo: self.repo,
            remote: self.remote,
            branch: self.branch,
            prefix: self.prefix,
            config: self.config,
            pause: self.pause,
            require_changes: self.require_changes,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let invocation = run::run(cli.into_options());

    let code = match &invocation.result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            display::error(e);
            let code = e
                .downcast_ref::<autopush_core::Error>()
                .map(|err| err.exit_code())
                .unwrap_or(1);
            ExitCode::from(code as u8)
        }
    };

    if invocation.pause {
        display::wait_for_enter();
    }

    code
}
