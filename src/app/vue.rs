// src/app/vue.rs
//
// Vue (console) — textes affichés par la boucle
// ---------------------------------------------
// - bannière de démarrage (nom, précision, commandes)
// - table `list` construite depuis les tables du noyau
// - rendu d’un résultat ("  " + valeur) et d’une erreur ("Error: " + message, en rouge)
//
// Les couleurs passent par `colored` : NO_COLOR / --no-color les coupent globalement.

use colored::Colorize;

use crate::noyau::eval::{CONSTANTES, FONCTIONS};
use crate::noyau::{CoreError, Decimal, PRECISION};

const TITRE_APP: &str = "Calculatrice multiprécision";

/// Fonctions "maison" (degrés, factorielle, efficace / crête).
const PERSONNALISEES: &[&str] = &["sind", "cosd", "tand", "fact", "rms", "peak"];

pub fn banniere() -> String {
    format!(
        "{} {}{}{}\n{}",
        TITRE_APP.magenta(),
        "Précision <".green(),
        PRECISION.to_string().red(),
        "> chiffres significatifs.".green(),
        "Entrer 'cls' pour effacer l’écran, 'list' pour les fonctions et 'exit' pour quitter."
    )
}

fn appels(noms: &[&str]) -> String {
    noms.iter().map(|n| format!("{n}()")).collect::<Vec<_>>().join(" ")
}

/// Texte de la commande `list`.
pub fn liste_fonctions() -> String {
    let (perso, base): (Vec<&str>, Vec<&str>) = FONCTIONS
        .iter()
        .copied()
        .partition(|n| PERSONNALISEES.contains(n));

    format!(
        "\nBasic operators: + - * / % ^ ( )\nFunctions: {}\nCustomized functions: {}\nConstants: {}\n",
        appels(&base),
        appels(&perso),
        CONSTANTES.join(" ")
    )
}

/// Deux espaces puis la valeur à pleine précision.
pub fn rendu_resultat(v: &Decimal) -> String {
    format!("  {v}")
}

pub fn rendu_erreur(e: &CoreError) -> String {
    format!("Error: {e}").red().to_string()
}
