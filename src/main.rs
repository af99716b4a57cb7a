// =============================================================================
// LUNGOWL — Point d'entrée : conversion CSV → ontologie TNM
// =============================================================================
//
// Ce main.rs enchaîne :
//   1. Charger la configuration (fichier TOML optionnel + options CLI)
//   2. Lancer le pipeline (lecture, rendu, deux insertions, écriture)
//   3. Afficher le bilan
//
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lungowl::config::{load_config, read_config, DEFAULT_CONFIG};
use lungowl::pipeline;

#[derive(Parser)]
#[command(name = "lungowl")]
#[command(about = "Insère des patients d'évaluation (CSV) dans une ontologie TNM poumon")]
#[command(version)]
struct Args {
    /// Fichier de configuration TOML (sinon lungowl.toml s'il existe)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Jeu de données CSV
    #[arg(long)]
    input: Option<PathBuf>,

    /// Ontologie de base (Turtle)
    #[arg(long)]
    ontology: Option<PathBuf>,

    /// Ontologie produite
    #[arg(long)]
    output: Option<PathBuf>,

    /// Une localisation non traduisible interrompt la conversion
    #[arg(long)]
    strict_locations: bool,

    /// Tout exécuter sauf l'écriture du résultat
    #[arg(long)]
    dry_run: bool,

    /// Journalisation détaillée
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Un --config explicite doit exister ; seul le fichier implicite est optionnel
    let mut config = match &args.config {
        Some(path) => read_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => load_config(Path::new(DEFAULT_CONFIG))
            .with_context(|| format!("Failed to load config from {}", DEFAULT_CONFIG))?,
    };

    // Les options CLI l'emportent sur le fichier
    if let Some(input) = args.input {
        config.paths.input = input;
    }
    if let Some(ontology) = args.ontology {
        config.paths.ontology = ontology;
    }
    if let Some(output) = args.output {
        config.paths.output = output;
    }
    if args.strict_locations {
        config.mapping.strict_locations = true;
    }

    let report = pipeline::run(&config, args.dry_run).context("Conversion failed")?;

    println!("═══════════════════════════════════════════════════");
    println!("Conversion terminée !");
    println!("  {} dossiers convertis", report.records);
    if report.unmapped_locations > 0 {
        println!(
            "  {} localisations non traduites (jeton '{}')",
            report.unmapped_locations, config.mapping.unmapped_sentinel
        );
    }
    println!(
        "  ancres : classes ligne {}, individus ligne {}",
        report.class_anchor_line + 1,
        report.individual_anchor_line + 1
    );
    if report.written {
        println!(
            "  {} lignes écrites dans {}",
            report.output_lines,
            config.paths.output.display()
        );
    } else {
        println!("  simulation : {} lignes, rien n'a été écrit", report.output_lines);
    }
    println!("═══════════════════════════════════════════════════");

    Ok(())
}
