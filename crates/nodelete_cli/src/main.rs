mod args;
mod profiles;

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    process::ExitCode,
    thread,
    time::Duration,
};

use args::{Args, Command};
use nodelete::{
    ActionResponse, ConfirmationRequest, DataPath, DataPathType, GateOutcome, Host,
    IgnoreSettingsAction, IgnoreSettingsView, OpenOutcome, Row, Section, SettingsHandler,
};
use profiles::{PrintNavigator, ProfileFile};
use tracing::{error, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: nodelete [--datapath <dir>] [--profiles <file>] [--yes] <command>

commands:
  show                   print the settings page
  list                   print the ignored users
  add <id>               ignore a user
  remove <id>            stop ignoring a user
  clear                  empty the ignore list (asks first unless --yes)
  set <flag> <on|off>    flip a switch
  open <id>              show a user's profile";

const FETCH_POLL_INTERVAL: Duration = Duration::from_millis(16);

fn setup_logging(path: &DataPath) -> WorkerGuard {
    use tracing_appender::{
        non_blocking,
        rolling::{RollingFileAppender, Rotation},
    };
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let file_appender = RollingFileAppender::new(
        Rotation::DAILY,
        path.path(DataPathType::Log),
        format!("nodelete-{}.log", env!("CARGO_PKG_VERSION")),
    );
    // need guard to live for lifetime of program
    let (non_blocking_writer, guard) = non_blocking(file_appender);

    // stdout is for command output
    let console_layer = fmt::layer().with_target(true).with_writer(io::stderr);

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(non_blocking_writer);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nodelete=warn"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(env_filter)
        .init();

    guard
}

fn print_sections(sections: &[Section]) {
    for section in sections {
        println!("== {} ==", section.title);
        for row in &section.rows {
            match row {
                Row::Switch { label, value, flag } => {
                    let mark = if *value { "x" } else { " " };
                    println!("[{mark}] {label} ({flag})");
                }
                Row::Info { label, subtitle } => println!("    {label}: {subtitle}"),
                Row::ClearUsers { label } => println!("    {label}"),
                Row::User { record, .. } => print_user(record),
            }
        }
        println!();
    }
}

fn print_user(record: &nodelete::DisplayRecord) {
    println!("  - {}  [{}]  {}", record.display_name, record.id, record.avatar_url);
}

fn prompt(request: &ConfirmationRequest) -> io::Result<bool> {
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", request.title)?;
    writeln!(stdout, "{}", request.body)?;
    write!(
        stdout,
        "{} / {} [y/N] ",
        request.confirm_label, request.cancel_label
    )?;
    stdout.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn report_update(resp: ActionResponse, changed: &str, unchanged: &str) {
    match resp {
        ActionResponse::Updated(true) => println!("{changed}"),
        _ => println!("{unchanged}"),
    }
}

fn run(command: Command, args: &Args, path: &DataPath) -> nodelete::Result<()> {
    let profiles = ProfileFile::open(args.profiles.as_ref().map(PathBuf::from));
    let mut settings = SettingsHandler::from_data_path(path).load();
    let mut view = IgnoreSettingsView::new(&mut settings);
    let mut navigator = PrintNavigator {
        profiles: &profiles,
        shown: 0,
    };
    let mut host = Host {
        cache: &profiles,
        fetcher: &profiles,
        navigator: &mut navigator,
    };

    match command {
        Command::Show => print_sections(&view.render(&settings, &profiles)),
        Command::List => {
            for section in view.render(&settings, &profiles) {
                for row in section.rows {
                    if let Row::User { record, .. } = row {
                        print_user(&record);
                    }
                }
            }
        }
        Command::Add(id) => {
            let msg = format!("now ignoring {id}");
            let resp = view.process(IgnoreSettingsAction::AddUser(id), &mut settings, &mut host)?;
            report_update(resp, &msg, "already ignored");
        }
        Command::Remove(id) => {
            let msg = format!("no longer ignoring {id}");
            let resp =
                view.process(IgnoreSettingsAction::RemoveUser(id), &mut settings, &mut host)?;
            report_update(resp, &msg, "was not ignored");
        }
        Command::Set(flag, value) => {
            let resp = view.process(
                IgnoreSettingsAction::Toggle(flag, value),
                &mut settings,
                &mut host,
            )?;
            report_update(
                resp,
                &format!("{flag} set to {value}"),
                &format!("{flag} already {value}"),
            );
        }
        Command::Clear => {
            let ActionResponse::Confirm(request) =
                view.process(IgnoreSettingsAction::PressClear, &mut settings, &mut host)?
            else {
                println!("the ignore list is already empty");
                return Ok(());
            };

            let confirmed = args.yes || prompt(&request)?;
            let resp = view.process(
                IgnoreSettingsAction::AnswerClear(confirmed),
                &mut settings,
                &mut host,
            )?;
            match resp {
                ActionResponse::Gate(GateOutcome::Cleared) => println!("ignore list cleared"),
                _ => println!("nothing was cleared"),
            }
        }
        Command::Open(id) => {
            let resp = view.process(IgnoreSettingsAction::OpenUser(id), &mut settings, &mut host)?;
            if let ActionResponse::Opened(OpenOutcome::Fetching) = resp {
                while view.opener().in_flight() > 0 {
                    view.poll(&mut navigator);
                    thread::sleep(FETCH_POLL_INTERVAL);
                }

                if navigator.shown == 0 {
                    println!("could not find that user");
                }
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let (args, unrecognized) = Args::parse(&argv);

    let path = args
        .datapath
        .as_ref()
        .map(DataPath::new)
        .unwrap_or_default();
    let _guard = setup_logging(&path);

    if !unrecognized.is_empty() {
        warn!("unrecognized args: {:?}", unrecognized);
    }

    let Some(command) = args.command.clone() else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    match run(command, &args, &path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
