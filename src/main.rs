//! MedFlow - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

use medflow::cli::{display, Args, Commands, Verbosity};
use medflow::config::Config;
use medflow::events::Change;
use medflow::prediction::WaitTimePredictor;
use medflow::store::SortDirection;
use medflow::telemetry::TelemetryDisplay;
use medflow::triage::KeywordTriage;
use medflow::types::NewPatient;
use medflow::HospitalStore;

fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = Config::load(args.config.clone()).context("Failed to load configuration")?;
    if let Some(seed) = &args.seed {
        config.store.seed_path = Some(seed.display().to_string());
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbosity());

    let mut config = load_config(&args)?;

    match &args.command {
        Commands::Config => {
            show_config(&config, args.verbosity())?;
        }

        Commands::Watch { duration, interval } => {
            if let Some(secs) = interval {
                config.store.refresh_interval_secs = *secs;
            }
            let store = HospitalStore::from_config(&config).context("Failed to build hospital store")?;
            run_watch(&store, Duration::from_secs(*duration)).await?;
        }

        Commands::Refresh => {
            let store = HospitalStore::from_config(&config).context("Failed to build hospital store")?;
            let pb = display::refresh_spinner();
            store.refresh().await;
            pb.finish_and_clear();
            let snapshot = store.snapshot();
            display::print_dashboard(&snapshot);
            display::print_beds(&snapshot);
        }

        Commands::Snapshot { search, sort, desc, json } => {
            let store = HospitalStore::from_config(&config).context("Failed to build hospital store")?;
            let snapshot = store.snapshot();

            if *json {
                let out = serde_json::to_string_pretty(&*snapshot).context("Failed to serialize snapshot")?;
                println!("{}", out);
                return Ok(());
            }

            display::print_dashboard(&snapshot);
            display::print_beds(&snapshot);

            if search.is_some() || sort.is_some() {
                let direction = if *desc { SortDirection::Descending } else { SortDirection::Ascending };
                let mut patients = match sort {
                    Some(field) => snapshot.sorted_patients(*field, direction),
                    None => snapshot.patients.iter().collect(),
                };
                if let Some(query) = search {
                    let matching: Vec<&str> = snapshot.search_patients(query).iter().map(|p| p.id.as_str()).collect();
                    patients.retain(|p| matching.contains(&p.id.as_str()));
                }
                println!("\n{}", "Patient list".bold());
                display::print_patients(&patients);
            }

            println!("\n{}", "Route recommendations".bold());
            for rec in &snapshot.recommendations {
                display::print_recommendation(rec);
            }
        }

        Commands::Admit { name, age, urgency, department } => {
            let store = HospitalStore::from_config(&config).context("Failed to build hospital store")?;
            let patient_id = store
                .add_patient(NewPatient::new(name.clone(), *age, *urgency, department.clone()))
                .context("Admission rejected")?;

            println!("{} Admitted {} as {}", "✓".green(), name, patient_id.bold());
            let snapshot = store.snapshot();
            for rec in snapshot.recommendations_for(&patient_id) {
                display::print_recommendation(rec);
            }
        }

        Commands::Triage { text, sample } => {
            let text = match (text, sample) {
                (Some(text), _) => text.clone(),
                (None, Some(index)) => {
                    let store = HospitalStore::from_config(&config).context("Failed to build hospital store")?;
                    let snapshot = store.snapshot();
                    snapshot
                        .triage_sample(*index)
                        .map(str::to_string)
                        .with_context(|| format!("No triage sample #{}", index))?
                }
                (None, None) => anyhow::bail!("Provide presentation text or --sample"),
            };
            let assessment = KeywordTriage::new().analyze(&text);
            display::print_triage(&text, &assessment);
        }

        Commands::Predict => {
            let store = HospitalStore::from_config(&config).context("Failed to build hospital store")?;
            let snapshot = store.snapshot();
            let mut rng = rand::thread_rng();
            let predictions = WaitTimePredictor::new().predict_all(&snapshot.departments, &mut rng);
            display::print_predictions(&predictions);
        }
    }

    Ok(())
}

/// Run auto-refresh for `duration`, redrawing on every applied change
async fn run_watch(store: &HospitalStore, duration: Duration) -> Result<()> {
    let mut events = store.subscribe();
    let handle = store.start_auto_refresh();

    display::print_dashboard(&store.snapshot());
    println!(
        "\n{}",
        format!(
            "Refreshing every {}s for {}s. Ctrl-C to stop.",
            handle.period().as_secs(),
            duration.as_secs()
        )
        .dimmed()
    );

    let deadline = tokio::time::sleep(duration);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            _ = tokio::signal::ctrl_c() => break,
            received = events.recv() => match received {
                Ok(event) => match event.change {
                    Change::RefreshStarted => println!("{}", "Refreshing...".dimmed()),
                    _ => display::print_dashboard(&event.snapshot),
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Dashboard fell behind store events");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    handle.stop().await;
    TelemetryDisplay::new(store.telemetry_collector()).display_summary();
    Ok(())
}

fn show_config(config: &Config, verbosity: Verbosity) -> Result<()> {
    display::print_header("MedFlow Configuration");
    match Config::config_path() {
        Some(path) => println!("{} {}", "Config file:".dimmed(), path.display()),
        None => println!("{} {}", "Config file:".dimmed(), "unavailable (no home dir)"),
    }
    println!("{} {}", "Verbosity:".dimmed(), verbosity.as_str());
    println!();
    let text = toml::to_string_pretty(config).context("Failed to serialize config")?;
    println!("{}", text);
    Ok(())
}
