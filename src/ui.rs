// UI layer: an interactive menu built on `dialoguer`. Each action runs one
// relay operation behind a spinner and prints the outcome.

use crate::api::Webhook;
use crate::models::{ReadingType, MAX_GLUCOSE, MIN_GLUCOSE};
use crate::relay::{AnalysisOutcome, Relay, RelayError};
use anyhow::Result;
use crossterm::style::{style, Stylize};
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Main interactive menu. Runs until the user picks "Exit".
///
/// `Select::interact()` is keyboard-driven: arrow keys and Enter.
pub fn main_menu<W: Webhook>(mut relay: Relay<W>) -> Result<()> {
    println!("{}", style("AI Medical Monitoring Portal").bold());
    loop {
        let items = vec![
            "Submit glucose readings",
            "Check doctor availability",
            "Book an appointment",
            "Exit",
        ];
        let selection = Select::new().items(&items).default(0).interact()?;
        match selection {
            0 => handle_readings(&mut relay)?,
            1 => handle_fetch_slots(&mut relay)?,
            2 => handle_booking(&mut relay)?,
            3 => break,
            _ => {}
        }
    }
    Ok(())
}

fn spinner(message: String) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

fn print_error(err: &RelayError) {
    println!("{}", style(err.to_string()).red());
}

fn glucose_prompt(kind: ReadingType, default: u16) -> Result<u16> {
    let value = Input::<u16>::new()
        .with_prompt(format!("{} Glucose (mg/dL)", kind.label()))
        .default(default)
        .validate_with(|v: &u16| -> Result<(), String> {
            if (MIN_GLUCOSE..=MAX_GLUCOSE).contains(v) {
                Ok(())
            } else {
                Err(format!("enter a value between {MIN_GLUCOSE} and {MAX_GLUCOSE}"))
            }
        })
        .interact_text()?;
    Ok(value)
}

/// Collect the readings form and send it to the analysis workflow.
fn handle_readings<W: Webhook>(relay: &mut Relay<W>) -> Result<()> {
    println!("Enter your glucose readings for analysis.");
    let patient: String = Input::new()
        .with_prompt("Patient Name")
        .default(relay.patient_name().to_string())
        .interact_text()?;
    let pre_meal = glucose_prompt(ReadingType::PreMeal, 100)?;
    let post_meal = glucose_prompt(ReadingType::PostMeal, 140)?;
    let notes: String = Input::new()
        .with_prompt("Notes")
        .allow_empty(true)
        .interact_text()?;

    let spinner = spinner("Agent checking trends...".into())?;
    let result = relay.submit_readings(&patient, pre_meal, post_meal, &notes);
    spinner.finish_and_clear();

    match result {
        Ok(AnalysisOutcome::RiskDetected) => println!(
            "{}",
            style("RISK DETECTED: The agent flagged a dangerous trend.")
                .red()
                .bold()
        ),
        Ok(AnalysisOutcome::Info(text)) => println!("{}", style(text).cyan()),
        Err(err) => print_error(&err),
    }
    Ok(())
}

fn handle_fetch_slots<W: Webhook>(relay: &mut Relay<W>) -> Result<()> {
    let spinner = spinner("Fetching slots...".into())?;
    let result = relay.fetch_slots().map(|slots| slots.to_vec());
    spinner.finish_and_clear();

    match result {
        Ok(slots) if slots.is_empty() => println!("No slots are available right now."),
        Ok(slots) => {
            println!("Doctor's schedule:");
            for slot in &slots {
                println!("  - {}", slot.label);
            }
            println!("Choose \"Book an appointment\" to confirm one.");
        }
        Err(err) => print_error(&err),
    }
    Ok(())
}

fn handle_booking<W: Webhook>(relay: &mut Relay<W>) -> Result<()> {
    if relay.slots().is_empty() {
        println!("Check doctor availability first to load open slots.");
        return Ok(());
    }

    let labels: Vec<String> = relay.slots().iter().map(|s| s.label.clone()).collect();
    let index = Select::new()
        .with_prompt("Click a slot to confirm")
        .items(&labels)
        .default(0)
        .interact()?;

    let spinner = spinner(format!("Booking {}...", labels[index]))?;
    let result = relay.confirm_fetched(index);
    spinner.finish_and_clear();

    match result {
        Some(Ok(text)) => {
            println!("{}", style(text).green().bold());
            println!("{}", style("Appointment booked!").green());
        }
        Some(Err(err)) => print_error(&err),
        None => println!("That slot is no longer listed."),
    }
    Ok(())
}
