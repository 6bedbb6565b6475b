// src/noyau/format.rs
//
// Rendu des résultats, façon "%g" :
// - P chiffres significatifs (P = précision du formateur, PRECISION par défaut)
// - décimal simple si l’exposant X vérifie -4 <= X < P, scientifique sinon (1.5e+1000, 1e-05)
// - zéros de queue retirés ; nan, inf, -inf pour les spéciaux

use std::fmt;

use num_traits::Signed;

use super::decimal::{Decimal, PRECISION};

/// Rendu général à `chiffres` chiffres significatifs.
pub fn format_general(v: &Decimal, chiffres: usize) -> String {
    let chiffres = chiffres.max(1);

    let (mantisse, exposant) = match v.arrondir(chiffres) {
        Decimal::Nan => return "nan".to_string(),
        Decimal::Infini { negatif: true } => return "-inf".to_string(),
        Decimal::Infini { negatif: false } => return "inf".to_string(),
        Decimal::Fini { mantisse, exposant } => (mantisse, exposant),
    };

    let signe = if mantisse.is_negative() { "-" } else { "" };
    let s = mantisse.magnitude().to_str_radix(10);
    if s == "0" {
        return "0".to_string();
    }

    let n = s.len() as i64;
    let x = n - 1 + exposant;

    let corps = if x < -4 || x >= chiffres as i64 {
        scientifique(&s, x)
    } else {
        simple(&s, exposant)
    };
    format!("{signe}{corps}")
}

/// d.ddd e±XX (au moins deux chiffres d’exposant)
fn scientifique(s: &str, x: i64) -> String {
    let (tete, reste) = s.split_at(1);
    let signe = if x < 0 { '-' } else { '+' };
    if reste.is_empty() {
        format!("{tete}e{signe}{:02}", x.unsigned_abs())
    } else {
        format!("{tete}.{reste}e{signe}{:02}", x.unsigned_abs())
    }
}

/// Chiffres s × 10^e en écriture positionnelle (s sans zéro de queue).
fn simple(s: &str, e: i64) -> String {
    if e >= 0 {
        return format!("{s}{}", "0".repeat(e as usize));
    }

    let n = s.len() as i64;
    let entiers = n + e;
    if entiers > 0 {
        let (a, b) = s.split_at(entiers as usize);
        format!("{a}.{b}")
    } else {
        format!("0.{}{s}", "0".repeat((-entiers) as usize))
    }
}

/// `{}` : PRECISION chiffres ; `{:.N}` : N chiffres significatifs.
impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chiffres = f.precision().unwrap_or(PRECISION);
        f.write_str(&format_general(self, chiffres))
    }
}
