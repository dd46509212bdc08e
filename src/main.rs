use clap::error::ErrorKind as ClapErrorKind;
use clap::Parser;
use std::io;
use tokio_util::sync::CancellationToken;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use adowork::commands::{create_work_item, finish, CreateOptions, CreateOutcome};
use adowork::core::{load_config, AzureDevOpsClient, FailureHandler, TerminalReporter};
use adowork::{AppError, Result};

/// adowork - create Azure DevOps work items from the command line
#[derive(Parser)]
#[command(name = "adowork")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Work item type: Task, Bug, User Story, Feature, Epic or Issue
    #[arg(short = 't', long = "type")]
    work_item_type: String,

    /// Work item title
    #[arg(short = 'T', long)]
    title: String,

    /// Work item description
    #[arg(short, long)]
    description: Option<String>,

    /// User to assign the work item to
    #[arg(short, long)]
    assigned_to: Option<String>,

    /// Parent work item ID (0 = no parent)
    #[arg(short, long)]
    parent: Option<u64>,

    /// Print the JSON patch document instead of creating the work item
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Override the request timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let reporter = TerminalReporter::from_env();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => e.exit(),
            ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                e.print().ok();
                std::process::exit(0);
            }
            _ => std::process::exit(reporter.handle(&AppError::Usage(e))),
        },
    };

    // Set up logging; stdout is reserved for the result
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupt received, cancelling");
            on_interrupt.cancel();
        }
    });

    let code = finish(run(cli, &cancel).await, &reporter);
    std::process::exit(code);
}

async fn run(cli: Cli, cancel: &CancellationToken) -> Result<CreateOutcome> {
    let config = load_config(cli.timeout)?;
    let client = AzureDevOpsClient::new(&config)?;

    let options = CreateOptions {
        work_item_type: cli.work_item_type,
        title: cli.title,
        description: cli.description.unwrap_or_default(),
        assigned_to: cli.assigned_to.unwrap_or_default(),
        parent: cli.parent,
        dry_run: cli.dry_run,
    };

    let mut stdout = io::stdout();
    create_work_item(&client, options, cancel, &mut stdout).await
}
