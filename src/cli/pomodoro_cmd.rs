//! Pomodoro CLI commands: a foreground timer over the phase machine.

use std::io::Write;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use clap::Subcommand;

use super::output::Output;
use crate::domain::{Phase, PomodoroTimer};
use crate::storage::Project;

#[derive(Subcommand)]
pub enum PomodoroCommands {
    /// Show timer settings and session counts
    Status,

    /// Run the timer in the foreground
    Run {
        /// Stop after this many completed work sessions
        #[arg(long, default_value_t = 1)]
        sessions: u32,
    },

    /// View or change timer settings
    Config {
        /// Work phase length in seconds
        #[arg(long)]
        work: Option<u32>,

        /// Short break length in seconds
        #[arg(long)]
        short_break: Option<u32>,

        /// Long break length in seconds
        #[arg(long)]
        long_break: Option<u32>,

        /// Work sessions between long breaks
        #[arg(long)]
        interval: Option<u32>,

        /// Start breaks automatically
        #[arg(long)]
        auto_start_breaks: Option<bool>,

        /// Start work automatically after breaks
        #[arg(long)]
        auto_start_work: Option<bool>,
    },
}

pub fn run(cmd: PomodoroCommands, output: &Output) -> Result<()> {
    match cmd {
        PomodoroCommands::Status => status(output),
        PomodoroCommands::Run { sessions } => run_timer(output, sessions),
        PomodoroCommands::Config {
            work,
            short_break,
            long_break,
            interval,
            auto_start_breaks,
            auto_start_work,
        } => configure(
            output,
            work,
            short_break,
            long_break,
            interval,
            auto_start_breaks,
            auto_start_work,
        ),
    }
}

fn fmt_mmss(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

fn status(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let settings = &project.config().project.pomodoro;

    let today = Local::now().date_naive();
    let history = project.history_store();
    let sessions_today = history.count_on(today)?;
    let sessions_total = history.total_sessions()?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "settings": settings,
            "sessions_today": sessions_today,
            "sessions_total": sessions_total,
        }));
    } else {
        println!("Work:        {}", fmt_mmss(settings.work_duration));
        println!("Short break: {}", fmt_mmss(settings.short_break_duration));
        println!("Long break:  {}", fmt_mmss(settings.long_break_duration));
        println!("Interval:    every {} sessions", settings.long_break_interval);
        println!("Auto-start breaks: {}", settings.auto_start_breaks);
        println!("Auto-start work:   {}", settings.auto_start_work);
        println!();
        println!(
            "Sessions: {} today, {} all time",
            sessions_today, sessions_total
        );
    }

    Ok(())
}

fn run_timer(output: &Output, sessions: u32) -> Result<()> {
    if sessions == 0 {
        anyhow::bail!("--sessions must be at least 1");
    }

    let project = Project::open_current()?;
    let settings = &project.config().project.pomodoro;
    let history = project.history_store();

    let mut timer = PomodoroTimer::new(settings.to_timer_config())?;
    timer.start();

    announce_phase(output, timer.phase(), timer.seconds_remaining());

    let mut completed = 0u32;

    loop {
        thread::sleep(Duration::from_secs(1));

        let event = match timer.tick() {
            Some(event) => event,
            None => {
                if !output.is_json() {
                    print!(
                        "\r{} {} remaining  ",
                        timer.phase().label(),
                        fmt_mmss(timer.seconds_remaining())
                    );
                    let _ = std::io::stdout().flush();
                }
                continue;
            }
        };

        if !output.is_json() {
            // Clear the countdown line before reporting the transition.
            print!("\r{}\r", " ".repeat(40));
        }

        if event.work_session_completed {
            completed += 1;
            let today = Local::now().date_naive();
            let today_count = history.record_session(today)?;

            if output.is_json() {
                output.data(&serde_json::json!({
                    "event": "work_session_completed",
                    "next_phase": event.to.label(),
                    "sessions_today": today_count,
                }));
            } else {
                output.success(&format!(
                    "Work session complete ({} today)",
                    today_count
                ));
            }

            if completed >= sessions {
                break;
            }
        } else if output.is_json() {
            output.data(&serde_json::json!({
                "event": "break_finished",
                "next_phase": event.to.label(),
            }));
        } else {
            output.success(&format!("{} finished", event.from.label()));
        }

        if !timer.is_running() {
            if !output.is_json() {
                output.notice(&format!(
                    "Next phase ({}) not auto-started, stopping",
                    event.to.label()
                ));
            }
            break;
        }

        announce_phase(output, timer.phase(), timer.seconds_remaining());
    }

    Ok(())
}

fn announce_phase(output: &Output, phase: Phase, seconds: u32) {
    if output.is_json() {
        output.data(&serde_json::json!({
            "event": "phase_started",
            "phase": phase.label(),
            "duration_secs": seconds,
        }));
    } else {
        println!("Starting {} ({})", phase.label(), fmt_mmss(seconds));
    }
}

#[allow(clippy::too_many_arguments)]
fn configure(
    output: &Output,
    work: Option<u32>,
    short_break: Option<u32>,
    long_break: Option<u32>,
    interval: Option<u32>,
    auto_start_breaks: Option<bool>,
    auto_start_work: Option<bool>,
) -> Result<()> {
    let project = Project::open_current()?;
    let mut config = project.config().clone();

    let changed = work.is_some()
        || short_break.is_some()
        || long_break.is_some()
        || interval.is_some()
        || auto_start_breaks.is_some()
        || auto_start_work.is_some();

    if !changed {
        if output.is_json() {
            output.data(&config.project.pomodoro);
        } else {
            let settings = &config.project.pomodoro;
            println!("work_duration = {}", settings.work_duration);
            println!("short_break_duration = {}", settings.short_break_duration);
            println!("long_break_duration = {}", settings.long_break_duration);
            println!("long_break_interval = {}", settings.long_break_interval);
            println!("auto_start_breaks = {}", settings.auto_start_breaks);
            println!("auto_start_work = {}", settings.auto_start_work);
        }
        return Ok(());
    }

    {
        let settings = &mut config.project.pomodoro;
        if let Some(value) = work {
            settings.work_duration = value;
        }
        if let Some(value) = short_break {
            settings.short_break_duration = value;
        }
        if let Some(value) = long_break {
            settings.long_break_duration = value;
        }
        if let Some(value) = interval {
            settings.long_break_interval = value;
        }
        if let Some(value) = auto_start_breaks {
            settings.auto_start_breaks = value;
        }
        if let Some(value) = auto_start_work {
            settings.auto_start_work = value;
        }
    }

    // Reject invalid values before touching the config file.
    config.project.pomodoro.to_timer_config().validate()?;
    config.save_project()?;

    if output.is_json() {
        output.data(&config.project.pomodoro);
    } else {
        output.success("Updated pomodoro settings");
    }

    Ok(())
}
