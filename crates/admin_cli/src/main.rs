use std::{error::Error, io::Write};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{
    Engine, EngineError, ExpenseFilter, FeedFilter, MAX_PAGE_LIMIT, NewUser, PageRequest,
    PeriodFilter, RecordFilter, Role, SalaryFilter, SaleFilter,
};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "farmbook_admin")]
#[command(about = "Admin utilities for Farmbook (bootstrap users, reports, CSV export)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./farmbook.db?mode=rwc"
    )]
    database_url: String,

    /// bcrypt work factor for new passwords.
    #[arg(long, env = "FARMBOOK_SECURITY__BCRYPT_COST")]
    bcrypt_cost: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Report(Report),
    /// Write every record of one kind as CSV to stdout.
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RoleArg {
    Admin,
    Staff,
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    #[arg(long, value_enum, default_value = "staff")]
    role: RoleArg,
}

#[derive(Args, Debug)]
struct Report {
    #[command(subcommand)]
    command: ReportCommand,
}

#[derive(Subcommand, Debug)]
enum ReportCommand {
    IncomeStatement(PeriodArgs),
}

#[derive(Args, Debug)]
struct PeriodArgs {
    /// Three-letter month token, e.g. `Dec`.
    #[arg(long, conflicts_with_all = ["start_date", "end_date"])]
    month: Option<String>,
    #[arg(long)]
    start_date: Option<NaiveDate>,
    #[arg(long)]
    end_date: Option<NaiveDate>,
    #[arg(long)]
    farm: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RecordKind {
    Expenses,
    Sales,
    Production,
    Feed,
    Salaries,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[arg(value_enum)]
    kind: RecordKind,
    #[arg(long)]
    farm: Option<String>,
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn prompt_password(prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                break;
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                    out.flush()?;
                }
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
                out.flush()?;
            }
            _ => {}
        }
    }

    Ok(buf)
}

fn prompt_password_twice() -> Result<String, Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    for _ in 0..3 {
        let p1 = prompt_password("Password: ")?;
        if p1.is_empty() {
            execute!(
                out,
                cursor::MoveToColumn(0),
                terminal::Clear(ClearType::CurrentLine),
                Print("Password must not be empty.\r\n")
            )?;
            continue;
        }

        let p2 = prompt_password("Confirm password: ")?;
        if p1 == p2 {
            return Ok(p1);
        }

        execute!(
            out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print("Passwords do not match. Try again.\r\n")
        )?;
    }

    Err("too many attempts".into())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Walks every page of a list operation and serializes each row.
macro_rules! export_pages {
    ($writer:expr, |$page:ident| $fetch:expr) => {{
        let mut $page = PageRequest::first(MAX_PAGE_LIMIT);
        let mut rows = 0usize;
        loop {
            let batch = $fetch.await?;
            for item in &batch.items {
                $writer.serialize(item)?;
                rows += 1;
            }
            match batch.next_cursor {
                Some(cursor) => $page = PageRequest::after(MAX_PAGE_LIMIT, cursor),
                None => break,
            }
        }
        rows
    }};
}

async fn export(
    engine: &Engine,
    args: ExportArgs,
) -> Result<usize, Box<dyn Error + Send + Sync>> {
    let record = RecordFilter::new(args.farm.as_deref(), PeriodFilter::AllTime);
    let mut writer = csv::Writer::from_writer(std::io::stdout());

    let rows = match args.kind {
        RecordKind::Expenses => {
            let filter = ExpenseFilter {
                record,
                head: None,
            };
            export_pages!(writer, |page| engine.list_expenses(&filter, &page))
        }
        RecordKind::Sales => {
            let filter = SaleFilter {
                record,
                customer: None,
            };
            export_pages!(writer, |page| engine.list_sales(&filter, &page))
        }
        RecordKind::Production => {
            export_pages!(writer, |page| engine.list_production(&record, &page))
        }
        RecordKind::Feed => {
            let filter = FeedFilter {
                record,
                feed_type: None,
            };
            export_pages!(writer, |page| engine.list_feed_purchases(&filter, &page))
        }
        RecordKind::Salaries => {
            let filter = SalaryFilter {
                record,
                staff_name: None,
            };
            export_pages!(writer, |page| engine.list_salaries(&filter, &page))
        }
    };

    writer.flush()?;
    Ok(rows)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let mut builder = Engine::builder().database(db);
    if let Some(cost) = cli.bcrypt_cost {
        builder = builder.password_cost(cost);
    }
    let engine = builder.build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = prompt_password_twice()?;
            let role = match args.role {
                RoleArg::Admin => Role::Admin,
                RoleArg::Staff => Role::Staff,
            };

            let result = engine
                .bootstrap_user(NewUser {
                    username: args.username.clone(),
                    password,
                    role,
                })
                .await;
            match result {
                Ok(user) => println!("created user: {} ({})", user.username, user.role.as_str()),
                Err(EngineError::ExistingKey(_)) => {
                    eprintln!("user already exists: {}", args.username);
                    std::process::exit(1);
                }
                Err(EngineError::Validation(msg)) => {
                    eprintln!("{msg}");
                    std::process::exit(2);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::Report(Report {
            command: ReportCommand::IncomeStatement(args),
        }) => {
            let period = match PeriodFilter::from_parts(
                args.month.as_deref(),
                args.start_date,
                args.end_date,
            ) {
                Ok(period) => period,
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(2);
                }
            };
            let filter = RecordFilter::new(args.farm.as_deref(), period);
            let envelope = engine.income_statement(&filter).await;
            println!("{}", serde_json::to_string_pretty(&envelope)?);
            if !envelope.is_ok() {
                std::process::exit(1);
            }
        }
        Command::Export(args) => {
            let rows = export(&engine, args).await?;
            eprintln!("exported {rows} rows");
        }
    }

    Ok(())
}
