mod cli;
mod prompts;
mod render;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use colored::Colorize;
use std::path::Path;

use trline_core::ingest::write_template;
use trline_core::{
    export, get_config_path, load_or_sample, normalize, tick_label, Dataset, ExportFormat,
    Milestone, TimelineConfig, TimelineSnapshot, ViewRequest,
};

use crate::cli::{Cli, Command, ConfigCommand};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = get_config_path(cli.config.as_deref())?;

    match &cli.command {
        Command::Show {
            projects,
            from,
            to,
            width,
            interactive,
        } => {
            let snapshot = load_snapshot(&cli, &config_path)?;
            show_timeline(&snapshot, projects, from, to, *width, *interactive)?;
        }
        Command::Projects => {
            list_projects(&load_snapshot(&cli, &config_path)?);
        }
        Command::Delays => {
            list_delays(&load_snapshot(&cli, &config_path)?);
        }
        Command::Ticks => {
            list_ticks(&load_snapshot(&cli, &config_path)?);
        }
        Command::Export { format, output } => {
            let snapshot = load_snapshot(&cli, &config_path)?;
            handle_export_command(&snapshot, format, output.as_deref())?;
        }
        Command::Template { output } => {
            write_template(output)?;
            println!("{} {}", "Template written:".green(), output.display());
        }
        Command::Config(config_cmd) => {
            handle_config_command(config_cmd, &config_path, cli.data.as_deref())?;
        }
    }

    Ok(())
}

/// Loads config and data, then derives the snapshot the commands read from
fn load_snapshot(cli: &Cli, config_path: &Path) -> Result<TimelineSnapshot> {
    let mut config = TimelineConfig::load(config_path)?;
    if let Some(policy) = cli.span_policy {
        config.span_policy = policy;
    }

    let data_path = config.resolve_data_file(cli.data.as_deref());
    let dataset = load_or_sample(data_path.as_deref());
    report_source(&dataset);

    let today = Local::now().date_naive();
    Ok(TimelineSnapshot::build(&dataset.records, &config, today))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn report_source(dataset: &Dataset) {
    if dataset.is_sample() {
        eprintln!("{} {}", "Data:".yellow(), dataset.source);
    } else {
        eprintln!(
            "{} {} ({} projects)",
            "Data:".green(),
            dataset.source,
            dataset.records.len()
        );
    }
}

/// Parses a user-supplied window bound with the same rules as data cells
fn parse_window_date(value: &str, flag: &str) -> Result<NaiveDate> {
    normalize(value).with_context(|| format!("Invalid date for {}: '{}'", flag, value))
}

fn show_timeline(
    snapshot: &TimelineSnapshot,
    projects: &[String],
    from: &Option<String>,
    to: &Option<String>,
    width: usize,
    interactive: bool,
) -> Result<()> {
    let selected = if interactive {
        crate::prompts::prompt_select_projects(&snapshot.project_names())?
    } else {
        projects.to_vec()
    };

    let mut request = ViewRequest::all().with_projects(selected);
    if from.is_some() || to.is_some() {
        let global = snapshot.global();
        let from = match from {
            Some(f) => parse_window_date(f, "--from")?,
            None => global.min_date,
        };
        let to = match to {
            Some(t) => parse_window_date(t, "--to")?,
            None => global.max_date,
        };
        request = request.with_window(from, to);
    }

    let view = snapshot.view(&request);
    println!(
        "{} {} to {}",
        "Window:".bold(),
        view.window.start,
        view.window.end
    );
    println!();
    for line in render::render_gantt(&view, width) {
        println!("{}", line);
    }

    Ok(())
}

fn list_projects(snapshot: &TimelineSnapshot) {
    println!(
        "{:<20} {:<12} {:<12} {:>5} {:>7}",
        "Project".bold(),
        "Start".bold(),
        "End".bold(),
        "Gates".bold(),
        "Delay".bold()
    );
    for project in snapshot.projects() {
        let delay = project.total_delay_days();
        let delay_text = format!("{:>6}d", delay);
        println!(
            "{:<20} {:<12} {:<12} {:>5} {}",
            project.name,
            project.start_date.to_string(),
            project.end_date.to_string(),
            project.observations.len(),
            if delay > 0 {
                delay_text.red()
            } else {
                delay_text.green()
            }
        );
    }
    println!();
    let global = snapshot.global();
    println!(
        "Range: {} to {} ({} projects)",
        global.min_date,
        global.max_date,
        snapshot.projects().len()
    );
}

fn list_delays(snapshot: &TimelineSnapshot) {
    let mut delays: Vec<(usize, &str, Milestone, NaiveDate, i64)> = snapshot
        .projects()
        .iter()
        .enumerate()
        .flat_map(|(index, project)| {
            project
                .delayed()
                .map(move |(milestone, obs)| {
                    (index, project.name.as_str(), milestone, obs.date, obs.delay_days)
                })
        })
        .collect();

    if delays.is_empty() {
        println!("{}", "No delayed milestones.".green());
        return;
    }

    delays.sort_by(|a, b| b.4.cmp(&a.4).then(a.0.cmp(&b.0)).then(a.2.cmp(&b.2)));

    for (_, name, milestone, date, days) in &delays {
        let moved_to = date
            .checked_add_signed(chrono::Duration::days(*days))
            .map(|d| d.to_string())
            .unwrap_or_else(|| "?".to_string());
        println!(
            "{:<20} {:<5} {} -> {}  {}",
            name,
            milestone.to_string(),
            date,
            moved_to,
            format!("+{} days", days).red()
        );
    }
    println!();
    println!("Total delayed milestones: {}", delays.len());
}

fn list_ticks(snapshot: &TimelineSnapshot) {
    for tick in &snapshot.global().monthly_ticks {
        let (year, month_day) = tick_label(*tick);
        println!("{} {}", year, month_day);
    }
}

fn handle_export_command(
    snapshot: &TimelineSnapshot,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let format = ExportFormat::from_str(format).with_context(|| {
        format!(
            "Unknown export format '{}'. Use json, yaml or markdown.",
            format
        )
    })?;

    match output {
        Some(path) => {
            let written = export::export(snapshot, format, path)?;
            println!("Exported {} to {}", format, written.display());
            println!("  Total projects: {}", snapshot.projects().len());
        }
        None => {
            print!("{}", export::render(snapshot, format)?);
        }
    }

    Ok(())
}

fn handle_config_command(
    cmd: &ConfigCommand,
    config_path: &Path,
    data_flag: Option<&Path>,
) -> Result<()> {
    match cmd {
        ConfigCommand::Path => {
            println!("{}", config_path.display());
        }
        ConfigCommand::Show => {
            let config = TimelineConfig::load(config_path)?;
            if !config_path.exists() {
                println!("# {} does not exist; showing defaults", config_path.display());
            }
            print!("{}", config.to_yaml()?);
            if let Some(data) = config.resolve_data_file(data_flag) {
                println!("# effective data file: {}", data.display());
            }
        }
        ConfigCommand::Init { force } => {
            if config_path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    config_path.display()
                );
            }
            TimelineConfig::default().save(config_path)?;
            println!("{} {}", "Config written:".green(), config_path.display());
        }
    }
    Ok(())
}
