//! src/app/etat.rs
//!
//! Classement d’une ligne saisie (sans vue, sans noyau).
//!
//! Contrats :
//! - Aucune évaluation ici (pas de noyau, pas de parsing).
//! - Les mots-clés sont comparés après retrait des blancs de bord.

/// Ce que la boucle doit faire d’une ligne.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Commande<'a> {
    /// `exit`
    Quitter,
    /// `list` : opérateurs, fonctions, constantes
    Liste,
    /// `cls` : effacer l’écran
    Effacer,
    /// ligne blanche : ignorée
    Vide,
    /// tout le reste part au noyau, tel quel
    Expression(&'a str),
}

impl<'a> Commande<'a> {
    pub fn lire(ligne: &'a str) -> Self {
        match ligne.trim() {
            "" => Commande::Vide,
            "exit" => Commande::Quitter,
            "list" => Commande::Liste,
            "cls" => Commande::Effacer,
            expr => Commande::Expression(expr),
        }
    }
}
