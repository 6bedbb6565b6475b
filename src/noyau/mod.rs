//! Noyau multiprécision
//!
//! Organisation interne :
//! - jetons.rs         : tokenisation (règles d’adjacence, parenthèses fermantes)
//! - parseur.rs        : descente récursive -> Expr
//! - expr.rs           : AST (Box, pas de partage)
//! - eval.rs           : évaluation + pipeline complet
//! - erreur.rs         : erreurs par étape (thiserror)
//! - decimal.rs        : flottant décimal PRECISION chiffres, nan / ±inf
//! - pointfixe.rs      : séries en entiers scalés (arctan, atanh, exp, ln, sin/cos)
//! - transcendantes.rs : exp, ln, trig, hyperboliques, racine, puissance, reste, gamma
//! - constantes.rs     : π, ln 10 (cache), table pi / e / phi
//! - format.rs         : rendu "%g" des résultats

pub mod constantes;
pub mod decimal;
pub mod erreur;
pub mod eval;
pub mod expr;
pub mod format;
pub mod jetons;
pub mod parseur;
pub mod pointfixe;
pub mod transcendantes;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use decimal::{Decimal, PRECISION};
pub use erreur::CoreError;
pub use eval::{eval_expression, parse_and_evaluate};
pub use jetons::tokenize;
