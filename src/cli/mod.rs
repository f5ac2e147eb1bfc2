pub mod report;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use report::render_session_report;
use tracing::level_filters::LevelFilter;

use crate::{
    store::{
        entities::EMPTY_PLACEHOLDER,
        slot::JsonFileSlot,
    },
    timing::start_timing,
    tracker::Tracker,
    utils::{
        clock::DefaultClock,
        dir::create_application_default_path,
        logging::{enable_logging, CLI_PREFIX},
        time::format_clock,
    },
};

#[derive(Parser, Debug)]
#[command(name = "Worklog", version, long_about = None)]
#[command(about = "Track time spent on personal projects", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Create a new project and select it")]
    New {
        name: String,
        #[arg(
            long,
            help = "Application directory. By default tries to save into the platform state directory"
        )]
        dir: Option<PathBuf>,
    },
    #[command(about = "Select the project other commands act on")]
    Select {
        name: String,
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    #[command(about = "List projects and their recorded totals")]
    Projects {
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    #[command(about = "Time a project until Ctrl-C. Every counted second is saved immediately")]
    Start {
        #[arg(help = "Project to time. Defaults to the last open project")]
        project: Option<String>,
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    #[command(about = "Show the selected project and its total time")]
    Status {
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    #[command(about = "Show recorded work sessions for a project")]
    Log {
        #[arg(help = "Project to report on. Defaults to the last open project")]
        project: Option<String>,
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };

    match args.commands {
        Commands::New { name, dir } => {
            let dir = resolve_dir(dir, logging_level, args.log)?;
            let mut tracker = load_tracker(&dir).await?;
            tracker.create_project(&name).await?;
            println!("Created and selected \"{name}\"");
            Ok(())
        }
        Commands::Select { name, dir } => {
            let dir = resolve_dir(dir, logging_level, args.log)?;
            let mut tracker = load_tracker(&dir).await?;
            tracker.select_project(&name).await?;
            println!("Selected \"{name}\"");
            Ok(())
        }
        Commands::Projects { dir } => {
            let dir = resolve_dir(dir, logging_level, args.log)?;
            let tracker = load_tracker(&dir).await?;
            let store = tracker.store();
            if store.projects.is_empty() {
                println!("{EMPTY_PLACEHOLDER}");
                return Ok(());
            }
            for project in &store.projects {
                let marker = if store.last_open_project.as_deref() == Some(&*project.name) {
                    "*"
                } else {
                    " "
                };
                println!("{marker} {}\t{}", project.name, format_clock(project.time));
            }
            Ok(())
        }
        Commands::Start { project, dir } => {
            let dir = resolve_dir(dir, logging_level, args.log)?;
            start_timing(dir, project).await
        }
        Commands::Status { dir } => {
            let dir = resolve_dir(dir, logging_level, args.log)?;
            let tracker = load_tracker(&dir).await?;
            match tracker.current_project() {
                Some(project) => {
                    println!("{}\t{}", project.name, format_clock(project.time))
                }
                None => println!("No project selected."),
            }
            Ok(())
        }
        Commands::Log { project, dir } => {
            let dir = resolve_dir(dir, logging_level, args.log)?;
            let tracker = load_tracker(&dir).await?;
            let report = render_session_report(tracker.store(), project.as_deref())?;
            print!("{report}");
            Ok(())
        }
    }
}

fn resolve_dir(
    dir: Option<PathBuf>,
    logging_level: Option<LevelFilter>,
    show_std: bool,
) -> Result<PathBuf> {
    let dir = dir.map_or_else(create_application_default_path, Ok)?;
    enable_logging(CLI_PREFIX, &dir, logging_level, show_std)?;
    Ok(dir)
}

async fn load_tracker(dir: &std::path::Path) -> Result<Tracker<JsonFileSlot>> {
    let slot = JsonFileSlot::new(dir)?;
    Ok(Tracker::load(slot, Box::new(DefaultClock)).await)
}
