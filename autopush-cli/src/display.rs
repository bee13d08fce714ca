use autopush_core::{RunReport, RunnerConfig, Step, StepReport, StepStatus};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub fn header(config: &RunnerConfig) {
    println!("{}", "autopush".bold().cyan());
    println!(
        "  {}: {}",
        "Repository".bold(),
        config.repository_path.display()
    );
    println!("  {}: {}", "Target".bold(), config.push_target());
    println!();
}

pub fn step_label(step: Step) -> &'static str {
    match step {
        Step::Stage => "Staging changes...",
        Step::Commit => "Creating commit...",
        Step::Push => "Pushing...",
    }
}

pub fn spinner(first: Step) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message(step_label(first));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// One status line per finished step.
pub fn step(report: &StepReport) {
    match report.status {
        StepStatus::Succeeded => println!("{} {}", "✓".green(), report.detail),
        StepStatus::Skipped => println!("{} {}", "⚠".yellow(), report.detail.yellow()),
        StepStatus::Failed => println!(
            "{} {} {}",
            "✗".red(),
            format!("{} failed", report.step).red().bold(),
            "(see error below)".dimmed()
        ),
    }
}

pub fn summary(report: &RunReport) {
    println!();
    if report.committed() {
        println!("{}", "✓ Changes committed and pushed".green().bold());
        println!("  {}: {}", "Message".bold(), report.message);
    } else {
        println!("{}", "✓ Nothing new to commit, branch pushed".green().bold());
    }
}

pub fn error(err: &anyhow::Error) {
    eprintln!();
    eprintln!("{} {:#}", "Error:".red().bold(), err);
}

/// Block until the user presses Enter.
pub fn wait_for_enter() {
    let result = dialoguer::Input::<String>::new()
        .with_prompt("Press Enter to exit")
        .allow_empty(true)
        .report(false)
        .interact_text();

    if let Err(e) = result {
        tracing::debug!("Pause prompt unavailable: {}", e);
    }
}
