//! Tests scientifiques (campagne) : propriétés du pipeline + justesse du backend.
//!
//! But : vérifier les chiffres sans faire chauffer la machine.
//! - budget temps global par test
//! - comparaisons à 990 chiffres (les 999 affichés moins une marge d’arrondi)
//! - valeurs de référence calculées indépendamment (mpmath, 1100 chiffres)
//!
//! Notes :
//! - ^ est associatif à GAUCHE et moins prioritaire que * dans un terme : 2^3^2 = 64, 2*3^2 = 36.
//! - les domaines ne lèvent pas d’erreur : nan / inf, comme le backend d’origine.
//! - Stress : imbrication sous PROFONDEUR_MAX (un niveau par parenthèse, appel ou signe).

use std::time::{Duration, Instant};

use super::decimal::Decimal;
use super::eval_expression;

fn eval_ok(expr: &str) -> Decimal {
    eval_expression(expr).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
}

fn eval_err(expr: &str) -> String {
    match eval_expression(expr) {
        Ok(v) => panic!("expr={expr:?} devait échouer, a rendu {v:.20}"),
        Err(e) => e.to_string(),
    }
}

/// Rendu à `chiffres` chiffres significatifs.
fn rendu(expr: &str, chiffres: usize) -> String {
    format!("{:.*}", chiffres, eval_ok(expr))
}

fn assert_rendu(expr: &str, attendu: &str) {
    assert_eq!(rendu(expr, 990), attendu, "expr={expr:?}");
}

/// |v| < 10^-990 (zéro à la précision près)
fn assert_quasi_nul(expr: &str) {
    let v = eval_ok(expr);
    let ok = v.est_zero() || v.magnitude().is_some_and(|g| g < -990);
    assert!(ok, "expr={expr:?} non nul : {v:.20}");
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Précédence et associativité ------------------------ */

#[test]
fn sci_precedence() {
    assert_rendu("2+3*4", "14");
    assert_rendu("(2+3)*4", "20");
    assert_rendu("2^3^2", "64");
    assert_rendu("2*3^2", "36");
    assert_rendu("10-4-3", "3");
    assert_rendu("2^3+1", "9");
}

#[test]
fn sci_unaires() {
    assert_rendu("--5", "5");
    assert_rendu("+-3", "-3");
    assert_rendu("-(2+3)", "-5");
    assert_rendu("-2^2", "4");
}

#[test]
fn sci_modulo_signe_du_dividende() {
    assert_rendu("-7 % 3", "-1");
    assert_rendu("7 % -3", "1");
    assert_rendu("7.5 % 2", "1.5");
    assert_rendu("10^50 % 7", "2");
}

/* ------------------------ Erreurs (messages) ------------------------ */

#[test]
fn sci_erreurs_messages() {
    assert_eq!(eval_err("5/0"), "Division by zero.");
    assert_eq!(eval_err("foo(1)"), "Unknown function: foo");
    assert_eq!(eval_err("(1+2"), "Mismatched parentheses.");
    assert_eq!(eval_err("1+2)"), "Mismatched parentheses.");
    assert_eq!(eval_err("2(3)"), "Missing operator.");
    assert_eq!(eval_err("2pi"), "Missing operator.");
    assert_eq!(eval_err("sin 2"), "Missing function argument.");
    assert_eq!(eval_err("2^3*4"), "Input Invalid.");
    assert_eq!(eval_err("3 # 4"), "Unknown character: #");
    assert_eq!(eval_err("1.2.3"), "Invalid number: 1.2.3");
}

/* ------------------------ Fonctions ------------------------ */

#[test]
fn sci_fonctions_valeurs_exactes() {
    assert_rendu("sin(0)", "0");
    assert_rendu("fact(5)", "120");
    assert_rendu("fact(0)", "1");
    assert_rendu("sind(90)", "1");
    assert_rendu("cosd(180)", "-1");
    assert_rendu("sqrt(9)", "3");
    assert_rendu("log(10^-3)", "-3");
    assert_rendu("2^10", "1024");
}

#[test]
fn sci_constantes_999_chiffres() {
    let pi = rendu("pi", 999);
    assert_eq!(pi.len(), 1000);
    assert!(pi.starts_with("3.14159265358979323846264338327950288419716939937510"));
    assert!(pi.ends_with("590921642020"));

    let e = rendu("e", 999);
    assert!(e.starts_with("2.71828182845904523536028747135266249775724709369995"));
    assert!(e.ends_with("468895703504"));

    let phi = rendu("phi", 999);
    assert!(phi.starts_with("1.61803398874989484820458683436563811772030917980576"));
    assert!(phi.ends_with("752035361394"));

    let r2 = rendu("sqrt(2)", 999);
    assert!(r2.ends_with("282295184885"));
}

#[test]
fn sci_identites() {
    let t0 = Instant::now();
    let max = Duration::from_secs(30);

    assert_rendu("sin(0.7)^2 + cos(0.7)^2", "1");
    budget(t0, max);
    assert_rendu("exp(ln(7.25))", "7.25");
    budget(t0, max);
    assert_rendu("sqrt(2)^2", "2");
    assert_rendu("10^log(3)", "3");
    budget(t0, max);
    assert_rendu("cosh(1.5)^2 - sinh(1.5)^2", "1");
    assert_rendu("tan(0.3) * cos(0.3) / sin(0.3)", "1");
    budget(t0, max);
    assert_quasi_nul("phi^2 - phi - 1");
    assert_quasi_nul("sin(pi)");
    assert_quasi_nul("ln(e) - 1");
    budget(t0, max);
}

#[test]
fn sci_gamma_demi_entiers() {
    let t0 = Instant::now();
    let max = Duration::from_secs(30);

    // fact(-0.5) = Γ(1/2) = √π
    assert_rendu("fact(-0.5)^2 / pi", "1");
    budget(t0, max);
    // fact(0.5) = Γ(3/2) = √π / 2
    assert_rendu("2*fact(0.5) / sqrt(pi)", "1");
    budget(t0, max);
}

#[test]
fn sci_domaines() {
    assert_eq!(rendu("sqrt(-1)", 20), "nan");
    assert_eq!(rendu("ln(0)", 20), "-inf");
    assert_eq!(rendu("ln(-1)", 20), "nan");
    assert_eq!(rendu("exp(10^16)", 20), "inf");
    assert_eq!(rendu("exp(-10^16)", 20), "0");
    assert_eq!(rendu("(-8)^(1/3)", 20), "nan");
    assert_eq!(rendu("tanh(10^7)", 20), "1");
}

#[test]
fn sci_grands_et_petits() {
    assert_eq!(rendu("10^1000", 20), "1e+1000");
    assert_eq!(rendu("10^-5", 20), "1e-05");
    assert_eq!(rendu("2^-1", 20), "0.5");
    assert_eq!(rendu("exp(1000)", 15), "1.97007111401705e+434");
}

/* ------------------------ Déterminisme ------------------------ */

#[test]
fn sci_idempotence() {
    let t0 = Instant::now();
    let max = Duration::from_secs(30);

    for expr in [
        "1/3",
        "sin(1)",
        "2^0.5",
        "ln(2)*log(3)",
        "tand(45)",
        "rms(3) + peak(3)",
        "sqrt(-2)",
    ] {
        let a = eval_ok(expr).to_string();
        let b = eval_ok(expr).to_string();
        assert_eq!(a, b, "expr={expr:?}");
        budget(t0, max);
    }
}

/* ------------------------ Stress contrôlé (sans brûler) ------------------------ */

#[test]
fn sci_stress_profondeur_parentheses_safe() {
    let t0 = Instant::now();
    let max = Duration::from_secs(10);

    // PROFONDEUR_MAX parenthèses : la limite elle-même passe
    let n = super::parseur::PROFONDEUR_MAX;
    let expr = format!("{}1{}", "(".repeat(n), ")".repeat(n));
    assert_rendu(&expr, "1");
    budget(t0, max);

    let mut signes = "-".repeat(120);
    signes.push('3');
    assert_rendu(&signes, "3");
    budget(t0, max);
}

#[test]
fn sci_stress_grands_entiers_safe() {
    let t0 = Instant::now();
    let max = Duration::from_secs(10);

    // 999 chiffres exacts, puis arrondi au-delà
    let big = "9".repeat(999);
    assert_eq!(rendu(&format!("{big} - {big}"), 20), "0");
    assert_eq!(rendu(&format!("{big}9 + 1"), 20), "1e+1000");
    budget(t0, max);
}
