use anyhow::Result;
use clap::{Parser, Subcommand};

use fintrack::backend::demo::{demo_backend, demo_session};
use fintrack::backend::{Backend, RestBackend, Session, StaticSession};
use fintrack::cli::{
    handle_account_command, handle_budget_command, handle_category_command,
    handle_config_command, handle_dashboard_command, handle_goal_command, handle_login_command,
    handle_logout_command, handle_profile_command, handle_report_command,
    handle_transaction_command, handle_transfer_command, today, AccountCommands, BudgetCommands,
    CategoryCommands, ConfigArgs, GoalCommands, LoginArgs, ProfileCommands, ReportCommands,
    TransactionCommands, TransferArgs,
};
use fintrack::config::logging::init_tracing;
use fintrack::config::{FintrackPaths, Settings};
use fintrack::storage::Storage;
use fintrack::FintrackResult;

#[derive(Parser)]
#[command(
    name = "fintrack",
    version,
    about = "Personal finance tracking from the terminal",
    long_about = "fintrack records accounts, income, expenses and transfers in a hosted \
                  database, tracks budgets and savings goals, and prints reports \
                  on where the money went."
)]
struct Cli {
    /// Use built-in sample data instead of the hosted backend
    #[arg(long, global = true)]
    demo: bool,

    /// Log backend requests to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Overview of balances, recent activity, budgets and goals
    #[command(alias = "dash")]
    Dashboard,

    /// Account management commands
    #[command(subcommand)]
    Account(AccountCommands),

    /// Income and expense commands
    #[command(subcommand, alias = "tx")]
    Transaction(TransactionCommands),

    /// Move money between two accounts
    Transfer(TransferArgs),

    /// Category management commands
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Budget commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Savings goal commands
    #[command(subcommand)]
    Goal(GoalCommands),

    /// Cash flow, monthly and category reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Profile commands
    #[command(subcommand)]
    Profile(ProfileCommands),

    /// Sign in to the hosted backend
    Login(LoginArgs),

    /// Forget the cached session
    Logout,

    /// Show or change settings
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let paths = FintrackPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    let Some(command) = cli.command else {
        println!("fintrack - personal finance tracking");
        println!();
        println!("Run 'fintrack --help' for usage information.");
        println!("Run 'fintrack --demo dashboard' to explore sample data.");
        return Ok(());
    };

    // Commands that never touch the data service
    match command {
        Commands::Login(args) => {
            handle_login_command(&paths, &settings, args).await?;
            return Ok(());
        }
        Commands::Logout => {
            handle_logout_command(&paths)?;
            return Ok(());
        }
        Commands::Config(args) => {
            handle_config_command(&paths, &mut settings, args)?;
            return Ok(());
        }
        command => {
            if cli.demo {
                let storage = Storage::new(demo_backend(today()).await?, demo_session());
                run(&storage, &settings, command).await?;
            } else {
                let (url, key) = settings.connection()?;
                let session = Session::load(&paths)?;
                let backend = RestBackend::new(url, key)?.with_session(session.as_ref());
                let storage = Storage::new(backend, StaticSession::new(session));
                run(&storage, &settings, command).await?;
            }
        }
    }

    Ok(())
}

async fn run<B: Backend>(
    storage: &Storage<B>,
    settings: &Settings,
    command: Commands,
) -> FintrackResult<()> {
    match command {
        Commands::Dashboard => handle_dashboard_command(storage, settings).await,
        Commands::Account(cmd) => handle_account_command(storage, settings, cmd).await,
        Commands::Transaction(cmd) => handle_transaction_command(storage, settings, cmd).await,
        Commands::Transfer(args) => handle_transfer_command(storage, settings, args).await,
        Commands::Category(cmd) => handle_category_command(storage, cmd).await,
        Commands::Budget(cmd) => handle_budget_command(storage, settings, cmd).await,
        Commands::Goal(cmd) => handle_goal_command(storage, settings, cmd).await,
        Commands::Report(cmd) => handle_report_command(storage, settings, cmd).await,
        Commands::Profile(cmd) => handle_profile_command(storage, cmd).await,
        Commands::Login(_) | Commands::Logout | Commands::Config(_) => Ok(()),
    }
}
