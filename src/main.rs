mod client;
mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use roomsched_core::config::RoomschedConfig;
use roomsched_core::week::parse_date;
use roomsched_core::{Orientation, ScheduleStatus, WeekShift};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use client::{RoomQuery, ScheduleQuery};
use commands::timetable::TimetableArgs;
use commands::{ScheduleFields, Source};

#[derive(Parser)]
#[command(name = "roomsched")]
#[command(about = "Browse rooms, schedules and weekly timetables from the room-scheduling API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the scheduling API (overrides config and ROOMSCHED_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct SourceArgs {
    /// Read schedules from a JSON snapshot instead of the API
    #[arg(short, long)]
    file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the weekly timetable
    Timetable {
        /// Any date in the week to show (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Show the week before
        #[arg(long, conflicts_with = "next")]
        prev: bool,

        /// Show the week after
        #[arg(long)]
        next: bool,

        /// Only this room ("all" for every room)
        #[arg(short, long)]
        room: Option<String>,

        /// Columns are days ("week") or rooms ("room")
        #[arg(long)]
        view: Option<Orientation>,

        /// Comma-separated row times, e.g. "08:00,08:30,09:00"
        #[arg(long)]
        slots: Option<String>,

        /// Also list every booking in the week
        #[arg(short, long)]
        list: bool,

        #[command(flatten)]
        source: SourceArgs,
    },
    /// List schedules
    Schedules {
        /// Only this room (by id)
        #[arg(long)]
        room_id: Option<u64>,

        /// Only this date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,

        /// Only this status (scheduled, in_progress, completed, cancelled)
        #[arg(short, long)]
        status: Option<String>,

        #[command(flatten)]
        source: SourceArgs,
    },
    /// Today's bookings across all rooms
    Today {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// List rooms
    Rooms {
        /// Match name, number or equipment
        #[arg(short, long)]
        search: Option<String>,

        /// Room type (classroom, laboratory, auditorium, conference, office, other)
        #[arg(short = 't', long = "type")]
        room_type: Option<String>,

        /// Department id
        #[arg(long)]
        department: Option<u64>,

        #[command(flatten)]
        source: SourceArgs,
    },
    /// One room's week and current availability
    Room {
        /// Room id
        id: u64,

        /// Any date in the week to show (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Show one booking
    Show {
        /// Schedule id
        id: u64,

        #[command(flatten)]
        source: SourceArgs,
    },
    /// Book a room
    Create {
        #[command(flatten)]
        fields: ScheduleFields,
    },
    /// Change fields of a booking
    Edit {
        /// Schedule id
        id: u64,

        #[command(flatten)]
        fields: ScheduleFields,
    },
    /// Delete a booking
    Delete {
        /// Schedule id
        id: u64,

        /// Delete without asking again
        #[arg(long)]
        yes: bool,
    },
    /// Change a booking's status
    Status {
        /// Schedule id
        id: u64,

        /// scheduled, in_progress, completed or cancelled
        status: String,
    },
    /// Write a default config file
    InitConfig {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Runs before loading config so a broken config file can be replaced
    if let Commands::InitConfig { force } = cli.command {
        return commands::init_config::run(force);
    }

    let config = RoomschedConfig::load()?.with_api_url_override(cli.api_url);
    debug!(api_url = %config.api_url, "loaded config");

    match cli.command {
        Commands::Timetable {
            date,
            prev,
            next,
            room,
            view,
            slots,
            list,
            source,
        } => {
            let shift = match (prev, next) {
                (true, _) => Some(WeekShift::Previous),
                (_, true) => Some(WeekShift::Next),
                _ => None,
            };
            let args = TimetableArgs {
                date,
                shift,
                room,
                view,
                slots,
                list,
            };
            let params = commands::timetable::view_parameters(
                &args,
                config.default_view,
                &config.time_slots,
                commands::today(),
            )?;
            let source = Source::new(source.file, &config)?;
            commands::timetable::run(&source, params, args.list).await
        }
        Commands::Schedules {
            room_id,
            date,
            status,
            source,
        } => {
            let query = ScheduleQuery {
                room: room_id,
                date: date.as_deref().map(parse_date).transpose()?,
                status: status.as_deref().map(ScheduleStatus::parse_known).transpose()?,
            };
            let source = Source::new(source.file, &config)?;
            commands::schedules::run(&source, query).await
        }
        Commands::Today { source } => {
            let source = Source::new(source.file, &config)?;
            commands::today::run(&source).await
        }
        Commands::Rooms {
            search,
            room_type,
            department,
            source,
        } => {
            let query = RoomQuery {
                search,
                room_type,
                department,
            };
            let source = Source::new(source.file, &config)?;
            commands::rooms::run(&source, query).await
        }
        Commands::Room { id, date } => {
            let reference = commands::date_or_today(date.as_deref())?;
            let source = Source::new(None, &config)?;
            commands::room::run(&source, id, reference).await
        }
        Commands::Show { id, source } => {
            let source = Source::new(source.file, &config)?;
            commands::show::run(&source, id).await
        }
        Commands::Create { fields } => {
            let source = Source::new(None, &config)?;
            commands::create::run(&source, fields).await
        }
        Commands::Edit { id, fields } => {
            let source = Source::new(None, &config)?;
            commands::edit::run(&source, id, fields).await
        }
        Commands::Delete { id, yes } => {
            let source = Source::new(None, &config)?;
            commands::delete::run(&source, id, yes).await
        }
        Commands::Status { id, status } => {
            let source = Source::new(None, &config)?;
            commands::status::run(&source, id, &status).await
        }
        Commands::InitConfig { force } => commands::init_config::run(force),
    }
}

/// Logs go to stderr so tables on stdout stay clean. RUST_LOG wins over --verbose.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
