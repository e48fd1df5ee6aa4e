use crate::cli::{AssignArgs, OverrideArgs, ReportArgs, RotateArgs};
use crate::render;
use chrono::{Local, NaiveDate};
use clap::Args;
use duty_roster::config::AppConfig;
use duty_roster::error::AppError;
use duty_roster::export::{self, ExportError, ExportSnapshot};
use duty_roster::persistence::FileSnapshotStore;
use duty_roster::roster::RosterCatalog;
use duty_roster::schedule::Slot;
use duty_roster::session::{Notice, Session};
use duty_roster::telemetry;
use std::path::PathBuf;
use tracing::info;

pub(crate) struct Context {
    pub(crate) config: AppConfig,
    pub(crate) session: Session<FileSnapshotStore>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ShowArgs {
    /// Also list who is on call each day
    #[arg(long)]
    pub(crate) days: bool,
    /// Print the printable table layout instead of the week overview
    #[arg(long)]
    pub(crate) table: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ExportArgs {
    /// Output directory (defaults to ROSTER_EXPORT_DIR)
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
    /// Report template (defaults to ROSTER_TEMPLATE_PATH)
    #[arg(long)]
    pub(crate) template: Option<PathBuf>,
}

pub(crate) fn open(today: Option<NaiveDate>) -> Result<Context, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let catalog = RosterCatalog::from_path(&config.paths.roster);
    let store = FileSnapshotStore::open(&config.paths.state);
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let mut session = Session::open(catalog, store, config.schedule, today);

    if let Some(notice) = session.take_startup_notice().filter(Notice::is_error) {
        eprintln!("{notice}");
    }
    info!(?config.environment, period = %session.period(), "duty roster ready");

    Ok(Context { config, session })
}

/// Prints a notice, turning rejections into a failing exit.
pub(crate) fn announce(notice: Notice) -> Result<(), AppError> {
    if notice.is_error() {
        return Err(AppError::Rejected(notice.message));
    }
    println!("{notice}");
    Ok(())
}

pub(crate) fn show(context: &Context, args: ShowArgs) -> Result<(), AppError> {
    let session = &context.session;
    if args.table {
        let snapshot = snapshot(context)?;
        print!("{}", snapshot.table().render_text());
    } else {
        render::print_weeks(session);
    }

    if args.days {
        if let Some(month) = session.derive() {
            render::print_days(&month);
        }
    }
    Ok(())
}

pub(crate) fn assign(context: &mut Context, args: AssignArgs) -> Result<(), AppError> {
    let AssignArgs {
        week,
        group,
        no_rotate,
    } = args;

    let configured = context.session.settings().auto_rotation;
    if no_rotate {
        context.session.set_auto_rotation(false);
    }
    let notice = context.session.drop_group(week, &group);
    context.session.set_auto_rotation(configured);
    announce(notice)
}

pub(crate) fn rotate(context: &mut Context, args: RotateArgs) -> Result<(), AppError> {
    let RotateArgs {
        start,
        group,
        every,
    } = args;

    let notice = match every {
        Some(cadence) => context.session.rotate_every(start, &group, cadence),
        None => {
            let configured = context.session.settings().auto_rotation;
            context.session.set_auto_rotation(true);
            let notice = context.session.drop_group(start, &group);
            context.session.set_auto_rotation(configured);
            notice
        }
    };
    announce(notice)
}

pub(crate) fn report(context: &Context, args: ReportArgs) -> Result<(), AppError> {
    let month = snapshot(context)?.month();
    if args.json {
        let encoded = serde_json::to_string_pretty(&month).map_err(ExportError::from)?;
        println!("{encoded}");
    } else {
        render::print_tallies(&month);
    }
    Ok(())
}

pub(crate) fn swap(context: &mut Context, first: Slot, second: Slot) -> Result<(), AppError> {
    announce(context.session.swap(first))?;
    announce(context.session.swap(second))
}

pub(crate) fn replace(context: &mut Context, target: Slot, coverer: Slot) -> Result<(), AppError> {
    announce(context.session.begin_replacement(target))?;
    announce(context.session.complete_replacement(coverer))
}

pub(crate) fn set_override(context: &mut Context, args: OverrideArgs) -> Result<(), AppError> {
    let OverrideArgs {
        week,
        original,
        substitute,
        clear,
    } = args;

    let notice = match substitute {
        Some(substitute) if !clear => context.session.set_override(week, &original, &substitute),
        _ => context.session.clear_override(week, &original),
    };
    announce(notice)
}

pub(crate) async fn export_table(context: &Context, args: ExportArgs) -> Result<(), AppError> {
    let snapshot = snapshot(context)?;
    let path = export::write_table(&snapshot, &output_dir(context, &args)).await?;
    println!("{}", Notice::success(format!("Table written to {}", path.display())));
    Ok(())
}

pub(crate) async fn export_template(context: &Context, args: ExportArgs) -> Result<(), AppError> {
    let snapshot = snapshot(context)?;
    let template = args
        .template
        .clone()
        .unwrap_or_else(|| context.config.paths.template.clone());
    let path = export::write_report(&snapshot, &template, &output_dir(context, &args)).await?;
    println!("{}", Notice::success(format!("Report written to {}", path.display())));
    Ok(())
}

pub(crate) async fn export_data(context: &Context, args: ExportArgs) -> Result<(), AppError> {
    let snapshot = snapshot(context)?;
    let path = export::write_report_data(&snapshot, &output_dir(context, &args)).await?;
    println!(
        "{}",
        Notice::success(format!("Report data written to {}", path.display()))
    );
    Ok(())
}

fn snapshot(context: &Context) -> Result<ExportSnapshot, AppError> {
    context.session.export_snapshot().ok_or_else(|| {
        AppError::Rejected("roster configuration is not loaded; nothing to derive".to_string())
    })
}

fn output_dir(context: &Context, args: &ExportArgs) -> PathBuf {
    args.out
        .clone()
        .unwrap_or_else(|| context.config.paths.export_dir.clone())
}
