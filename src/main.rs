//! autocommit - CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error, info};

use autocommit::config::{lock_policy_from_env, log_file_path, notifications_enabled};
use autocommit::lock::PgrepProbe;
use autocommit::logging;
use autocommit::notify::{DesktopNotifier, Notifier, SilentNotifier};
use autocommit::{CommitOrchestrator, RepositoryHandle, RunError, RunOutcome, SystemGit};

/// Stage, commit and push every change in a git working tree.
#[derive(Parser, Debug)]
#[command(name = "autocommit")]
#[command(about = "Stage, commit and push every change in a git working tree")]
#[command(version)]
struct Cli {
    /// Working tree to operate on (defaults to the current directory)
    #[arg(value_name = "PATH", conflicts_with = "path_flag")]
    path: Option<PathBuf>,

    /// Working tree to operate on (flag form)
    #[arg(short = 'p', long = "path", id = "path_flag", value_name = "PATH")]
    path_flag: Option<PathBuf>,

    /// Custom commit message (derived from staged filenames when omitted)
    #[arg(short = 'm', long)]
    message: Option<String>,

    /// Do not raise desktop notifications on failure
    #[arg(long)]
    no_notify: bool,

    /// Append logs to this file instead of autocommit.log next to the executable
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Show debug output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn repository_path(&self) -> PathBuf {
        self.path
            .clone()
            .or_else(|| self.path_flag.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_file = log_file_path(cli.log_file.clone());
    if let Err(e) = logging::init(cli.verbose, log_file.as_deref()) {
        eprintln!("Error: {:#}", e);
        return ExitCode::FAILURE;
    }
    if let Some(ref path) = log_file {
        debug!("Logging to {}", path.display());
    }

    let notifier: Box<dyn Notifier> = if notifications_enabled(cli.no_notify) {
        Box::new(DesktopNotifier)
    } else {
        Box::new(SilentNotifier)
    };

    // Step 1: Resolve and enter the working tree
    let path = cli.repository_path();
    let repo = match RepositoryHandle::resolve(&path).and_then(|repo| repo.enter().map(|()| repo)) {
        Ok(repo) => repo,
        Err(e) => {
            let e = RunError::from(e);
            error!(path = %path.display(), "{}", e);
            notifier.notify(e.title(), &e.to_string()).await;
            return ExitCode::FAILURE;
        }
    };

    info!(
        repo = %repo.workdir().display(),
        root = %repo.root().display(),
        "Starting autocommit"
    );

    // Step 2: Run the pipeline
    let git = SystemGit::new(repo.workdir());
    let orchestrator = CommitOrchestrator {
        workdir: repo.workdir().to_path_buf(),
        lock_path: repo.lock_path(),
        lock_policy: lock_policy_from_env(),
        git: &git,
        probe: &PgrepProbe,
        notifier: notifier.as_ref(),
    };

    match orchestrator.run(cli.message.as_deref()).await {
        Ok(RunOutcome::NoChanges) => ExitCode::SUCCESS,
        Ok(RunOutcome::Pushed { message }) => {
            debug!(message = %message, "Pushed commit");
            ExitCode::SUCCESS
        }
        // Already logged and notified by the orchestrator
        Err(_) => ExitCode::FAILURE,
    }
}
