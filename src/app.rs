// src/app.rs
//
// Calculatrice multiprécision — module App (racine)
// -------------------------------------------------
// Rôle:
// - Déclarer les sous-modules (etat.rs + vue.rs)
// - Fournir la boucle interactive (rustyline) : lire, classer, évaluer, afficher
//
// Important:
// - Aucun calcul ici : tout passe par noyau::eval_expression.
// - Une erreur du noyau n’arrête jamais la boucle.

pub mod etat;
pub mod vue;

use std::io::{self, Write};

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::noyau;
use etat::Commande;

const INVITE: &str = "> ";

/// Boucle interactive jusqu’à `exit`, Ctrl-C ou Ctrl-D.
pub fn lancer() -> rustyline::Result<()> {
    let mut rl = DefaultEditor::new()?;
    println!("{}", vue::banniere());

    loop {
        let ligne = match rl.readline(INVITE) {
            Ok(l) => l,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e),
        };

        let commande = Commande::lire(&ligne);
        if commande != Commande::Vide {
            // historique en mémoire seulement (pas de fichier)
            let _ = rl.add_history_entry(ligne.as_str());
        }

        match commande {
            Commande::Quitter => break,
            Commande::Vide => {}
            Commande::Liste => println!("{}", vue::liste_fonctions()),
            Commande::Effacer => rl.clear_screen()?,
            Commande::Expression(expr) => {
                repondre(expr, &mut io::stdout(), &mut io::stderr())?;
            }
        }
    }

    log::debug!("fin de session");
    Ok(())
}

/// Une expression : résultat sur `sortie`, erreur sur `erreurs` (stderr en console).
fn repondre(expr: &str, sortie: &mut impl Write, erreurs: &mut impl Write) -> io::Result<()> {
    match noyau::eval_expression(expr) {
        Ok(v) => writeln!(sortie, "{}", vue::rendu_resultat(&v)),
        Err(e) => {
            log::debug!("échec ({}) : {expr:?}", e.etape());
            writeln!(erreurs, "{}", vue::rendu_erreur(&e))
        }
    }
}
