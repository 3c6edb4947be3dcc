//! Terminal rendering for the CLI
//!
//! Colored tables for the snapshot and rule-engine output, plus the refresh
//! spinner.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::prediction::WaitTimePrediction;
use crate::store::Snapshot;
use crate::triage::TriageAssessment;
use crate::types::{BedStatus, Patient, RouteRecommendation, TriageDistribution, Urgency};

/// Color an urgency label the way the dashboard badges do
pub fn urgency_label(urgency: Urgency) -> ColoredString {
    match urgency {
        Urgency::Urgent => urgency.as_str().red().bold(),
        Urgency::High => urgency.as_str().yellow().bold(),
        Urgency::Medium => urgency.as_str().blue(),
        Urgency::Low => urgency.as_str().green(),
    }
}

fn bed_label(status: BedStatus) -> ColoredString {
    match status {
        BedStatus::Available => status.as_str().green(),
        BedStatus::Occupied => status.as_str().red(),
        BedStatus::Cleaning => status.as_str().yellow(),
        BedStatus::Reserved => status.as_str().purple(),
    }
}

/// Spinner shown while a refresh sleeps on its simulated latency
pub fn refresh_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message("Refreshing hospital data...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn print_header(title: &str) {
    let width = 64;
    println!("\n{}", "=".repeat(width).cyan());
    println!("  {}", title.bold().cyan());
    println!("{}", "=".repeat(width).cyan());
}

/// Stats, departments and the head of the patient list
pub fn print_dashboard(snapshot: &Snapshot) {
    print_header("MedFlow Hospital Dashboard");
    println!(
        "{} {}{}",
        "Last updated:".dimmed(),
        snapshot.last_updated.format("%H:%M:%S"),
        if snapshot.loading { " (refreshing)".yellow().to_string() } else { String::new() }
    );

    let stats = &snapshot.stats;
    println!();
    println!("Total patients:    {}", stats.total_patients.to_string().bold());
    println!("Available beds:    {}", stats.available_beds.to_string().green());
    println!("Occupied beds:     {}", stats.occupied_beds.to_string().red());
    println!("Avg wait:          {} min", stats.average_wait_time);
    println!("Triage:            {}", triage_line(&stats.triage_distribution));

    println!("\n{}", "Departments".bold());
    for dept in &snapshot.departments {
        let load = format!("{}/{}", dept.current_patients, dept.capacity);
        let load = if dept.occupancy() >= 0.9 { load.red() } else { load.normal() };
        println!("  {:<12} {:>7}  wait {:>3} min", dept.name, load, dept.wait_time);
    }

    println!("\n{}", "Patients".bold());
    let patients: Vec<&Patient> = snapshot.patients.iter().take(5).collect();
    print_patients(&patients);
    if snapshot.patients.len() > patients.len() {
        println!("  {}", format!("... {} more", snapshot.patients.len() - patients.len()).dimmed());
    }
}

/// Per-level counts, most urgent first, with the total
fn triage_line(dist: &TriageDistribution) -> String {
    let levels: Vec<String> = Urgency::ALL
        .iter()
        .map(|&u| format!("{} {}", urgency_label(u), dist.count(u)))
        .collect();
    format!("{} ({} total)", levels.join(" / "), dist.total())
}

pub fn print_patients(patients: &[&Patient]) {
    if patients.is_empty() {
        println!("  {}", "No patients match".dimmed());
        return;
    }
    for p in patients {
        println!(
            "  {:<5} {:<18} {:>3}  {:<8} {:>3} min  {:<11} {}",
            p.id,
            p.name,
            p.age,
            urgency_label(p.urgency),
            p.wait_time,
            p.department,
            p.status
        );
    }
}

pub fn print_beds(snapshot: &Snapshot) {
    println!("\n{}", "Beds".bold());
    for (dept, beds) in snapshot.beds_by_department() {
        let cells: Vec<String> = beds
            .iter()
            .map(|b| {
                let marker = if b.recommended == Some(true) { "*" } else { "" };
                format!("{}{}:{}", b.id, marker, bed_label(b.status))
            })
            .collect();
        println!("  {:<12} {}", dept.name, cells.join("  "));
    }
}

pub fn print_recommendation(rec: &RouteRecommendation) {
    println!(
        "  {} {} -> {} [{}]: {}",
        rec.patient_id.bold(),
        rec.current_dept,
        rec.recommended_dept.cyan(),
        urgency_label(rec.urgency),
        rec.reason
    );
}

pub fn print_triage(text: &str, assessment: &TriageAssessment) {
    print_header("Keyword Triage");
    println!("{}", text.dimmed());
    println!();
    println!("Urgency:      {}", urgency_label(assessment.urgency));
    println!("Confidence:   {:.0}%", assessment.confidence * 100.0);
    println!("Department:   {}", assessment.recommended_department.cyan());
    if !assessment.indicators.is_empty() {
        println!("Indicators:   {}", assessment.indicators.join(", "));
    }
}

pub fn print_predictions(predictions: &[WaitTimePrediction]) {
    print_header("Wait Time Predictor");
    for p in predictions {
        let predicted = format!("{} min", p.predicted);
        let predicted = if p.elevated { predicted.yellow() } else { predicted.green() };
        println!("  {:<12} current {:>3} min   predicted {}", p.name, p.current, predicted);
    }
}
