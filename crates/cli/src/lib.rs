pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use commands::advise::AdviseArgs;
use commands::feedback::{EngageArgs, FeedbackArgs};
use commands::progress::ProgressArgs;
use commands::stress::ScalpArgs;
use commands::users::RegisterArgs;
use commands::womens::{CheckInArgs, MenstrualArgs, PregnancyArgs};

#[derive(Debug, Parser)]
#[command(
    name = "wellora",
    about = "Wellora wellness advice CLI",
    long_about = "Match skincare and hair routines, give stress and women's health guidance, record feedback, and inspect progress history.",
    after_help = "Examples:\n  wellora register --username ana --email ana@example.com\n  wellora advise --user ana --issue whiteheads --gender male --type oily\n  wellora feedback --user ana --issue pimples --satisfaction satisfied --rating 8 --solved\n  wellora overview --user ana\n  wellora doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, catalog sources, and DB connectivity")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Register a user; every data command takes a registered username or id")]
    Register(RegisterArgs),
    #[command(about = "Match a routine for a skincare or hair query and record the analysis")]
    Advise(AdviseArgs),
    #[command(about = "Record skincare feedback and print the updated progress history")]
    Feedback(FeedbackArgs),
    #[command(about = "Record hair or stress engagement feedback")]
    Engage(EngageArgs),
    #[command(about = "Print progress history for one issue or engagement topic")]
    Progress(ProgressArgs),
    #[command(about = "Print average progress for every known skin issue")]
    Overview {
        #[arg(long)]
        user: String,
    },
    #[command(about = "Print tips for a stress type (work|relationship|academic)")]
    Stress {
        #[arg(long = "type")]
        stress_type: String,
    },
    #[command(about = "Record a hairfall or dandruff check-in and print the improvement history")]
    Scalp(ScalpArgs),
    #[command(about = "Print menstrual guidance for reported pain, symptoms, exercise and sleep")]
    Menstrual(MenstrualArgs),
    #[command(about = "Print pregnancy guidance for a month, conditions and sleep quality")]
    Pregnancy(PregnancyArgs),
    #[command(name = "checkin", about = "Record a menstrual-cycle check-in")]
    CheckIn(CheckInArgs),
    #[command(about = "Print cycle check-in history and trend series")]
    CycleProgress {
        #[arg(long)]
        user: String,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Register(args) => commands::users::run_register(args),
        Command::Advise(args) => commands::advise::run(args),
        Command::Feedback(args) => commands::feedback::run(args),
        Command::Engage(args) => commands::feedback::run_engagement(args),
        Command::Progress(args) => commands::progress::run(args),
        Command::Overview { user } => commands::progress::run_overview(&user),
        Command::Stress { stress_type } => commands::stress::run(&stress_type),
        Command::Scalp(args) => commands::stress::run_scalp(args),
        Command::Menstrual(args) => commands::womens::run_menstrual(args),
        Command::Pregnancy(args) => commands::womens::run_pregnancy(args),
        Command::CheckIn(args) => commands::womens::run_check_in(args),
        Command::CycleProgress { user } => commands::womens::run_cycle_progress(&user),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
