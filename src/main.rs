// src/main.rs
//
// Calculatrice multiprécision — point d’entrée console
// ----------------------------------------------------
// - sans argument : boucle interactive (app::lancer)
// - avec des expressions : évaluation en lot, une ligne de sortie par expression
// - journal : env_logger (RUST_LOG), --verbose force debug
// - couleurs : colored, coupées par --no-color ou NO_COLOR

use std::process::ExitCode;

use clap::Parser;

mod app;
mod noyau;

use noyau::constantes;

#[derive(Parser, Debug)]
#[command(
    name = "calculatrice",
    version,
    about = "Calculatrice multiprécision (999 chiffres significatifs)"
)]
struct Args {
    /// Expressions à évaluer (sans expression : mode interactif)
    expressions: Vec<String>,

    /// Journal détaillé (niveau debug)
    #[arg(short, long)]
    verbose: bool,

    /// Sortie sans couleurs
    #[arg(long)]
    no_color: bool,
}

fn init_journal(verbose: bool) {
    let defaut = if verbose { "debug" } else { "warn" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(defaut));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

/// Mode lot : chaque expression dans l’ordre, échec si l’une échoue.
fn evaluer_lot(expressions: &[String]) -> ExitCode {
    let mut echecs = 0usize;

    for ligne in expressions {
        let resultat = noyau::tokenize(ligne)
            .map_err(noyau::CoreError::from)
            .and_then(|jetons| noyau::parse_and_evaluate(&jetons));
        match resultat {
            Ok(v) => println!("{}", app::vue::rendu_resultat(&v)),
            Err(e) => {
                log::debug!("échec ({}) : {ligne:?}", e.etape());
                eprintln!("{}", app::vue::rendu_erreur(&e));
                echecs += 1;
            }
        }
    }

    if echecs == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    init_journal(args.verbose);
    if args.no_color {
        colored::control::set_override(false);
    }

    // π d’abord : e, φ et les fonctions en degrés en dépendent
    constantes::initialiser();

    if !args.expressions.is_empty() {
        return evaluer_lot(&args.expressions);
    }

    match app::lancer() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("console : {e}");
            ExitCode::FAILURE
        }
    }
}
