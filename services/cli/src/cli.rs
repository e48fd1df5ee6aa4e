use crate::commands::{self, ExportArgs, ShowArgs};
use crate::infra::{parse_date, parse_employee, parse_month, parse_slot, parse_week};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use duty_roster::calendar::{WeekKey, YearMonth};
use duty_roster::error::AppError;
use duty_roster::roster::EmployeeId;
use duty_roster::schedule::Slot;

#[derive(Parser, Debug)]
#[command(
    name = "duty-roster",
    about = "Plan, adjust and export the weekly on-call duty schedule",
    version
)]
struct Cli {
    /// Reference date used when no month has been selected yet (YYYY-MM-DD)
    #[arg(long, global = true, value_parser = parse_date)]
    today: Option<NaiveDate>,
    /// Switch the selected month before running the command (YYYY-MM)
    #[arg(long, global = true, value_parser = parse_month)]
    month: Option<YearMonth>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the selected month's weeks and occupants (default command)
    Show(ShowArgs),
    /// Assign a group to a week, rotating the remaining weeks of the month
    Assign(AssignArgs),
    /// Rotate groups forward from a week, optionally in multi-week cycles
    Rotate(RotateArgs),
    /// Print the per-employee duty tally for the selected month
    Report(ReportArgs),
    /// Exchange two employees between (or within) weeks
    Swap {
        /// First slot as WEEK:EMPLOYEE, e.g. 2025-W45:e1
        #[arg(value_parser = parse_slot)]
        first: Slot,
        /// Second slot as WEEK:EMPLOYEE
        #[arg(value_parser = parse_slot)]
        second: Slot,
    },
    /// Let one employee cover another employee's week
    Replace {
        /// Slot of the employee being covered
        #[arg(value_parser = parse_slot)]
        target: Slot,
        /// Slot of the covering employee
        #[arg(value_parser = parse_slot)]
        coverer: Slot,
    },
    /// Toggle the reporting flag of an occupant
    Reporting {
        #[arg(value_parser = parse_slot)]
        slot: Slot,
    },
    /// Substitute a catalog employee for an occupant without changing the assignment
    Override(OverrideArgs),
    /// Clear the selected month, or the whole schedule with --all
    Clear {
        #[arg(long)]
        all: bool,
    },
    /// Select the month the other commands work on
    Select {
        /// Month as YYYY-MM
        #[arg(value_parser = parse_month)]
        month: YearMonth,
    },
    /// Write printable documents for the selected month
    Export {
        #[command(subcommand)]
        command: ExportCommand,
    },
}

#[derive(Args, Debug)]
pub(crate) struct AssignArgs {
    /// ISO week as YYYY-Www
    #[arg(value_parser = parse_week)]
    pub(crate) week: WeekKey,
    /// Group name from the roster configuration
    pub(crate) group: String,
    /// Only assign this week, even when auto-rotation is enabled
    #[arg(long)]
    pub(crate) no_rotate: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RotateArgs {
    /// First week of the rotation as YYYY-Www
    #[arg(value_parser = parse_week)]
    pub(crate) start: WeekKey,
    /// Group on duty in the first week
    pub(crate) group: String,
    /// Hand over every N weeks across the selected year instead of weekly within the month
    #[arg(long)]
    pub(crate) every: Option<u32>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ReportArgs {
    /// Emit the derived month as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct OverrideArgs {
    #[arg(value_parser = parse_week)]
    pub(crate) week: WeekKey,
    /// Employee as assigned
    #[arg(value_parser = parse_employee)]
    pub(crate) original: EmployeeId,
    /// Employee standing in
    #[arg(value_parser = parse_employee, required_unless_present = "clear")]
    pub(crate) substitute: Option<EmployeeId>,
    /// Remove the override instead of recording one
    #[arg(long)]
    pub(crate) clear: bool,
}

#[derive(Subcommand, Debug)]
enum ExportCommand {
    /// Schedule table as CSV
    Table(ExportArgs),
    /// Monthly duty report rendered from the text template
    Template(ExportArgs),
    /// Duty report placeholders as JSON
    Data(ExportArgs),
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut context = commands::open(cli.today)?;

    if let Some(month) = cli.month {
        commands::announce(context.session.select_period(month))?;
    }

    match cli.command.unwrap_or(Command::Show(ShowArgs::default())) {
        Command::Show(args) => commands::show(&context, args),
        Command::Assign(args) => commands::assign(&mut context, args),
        Command::Rotate(args) => commands::rotate(&mut context, args),
        Command::Report(args) => commands::report(&context, args),
        Command::Swap { first, second } => commands::swap(&mut context, first, second),
        Command::Replace { target, coverer } => commands::replace(&mut context, target, coverer),
        Command::Reporting { slot } => {
            let notice = context.session.toggle_reporting(slot);
            commands::announce(notice)
        }
        Command::Override(args) => commands::set_override(&mut context, args),
        Command::Clear { all } => {
            let notice = if all {
                context.session.clear_all()
            } else {
                context.session.clear_month()
            };
            commands::announce(notice)
        }
        Command::Select { month } => {
            let notice = context.session.select_period(month);
            commands::announce(notice)
        }
        Command::Export { command } => match command {
            ExportCommand::Table(args) => commands::export_table(&context, args).await,
            ExportCommand::Template(args) => commands::export_template(&context, args).await,
            ExportCommand::Data(args) => commands::export_data(&context, args).await,
        },
    }
}
