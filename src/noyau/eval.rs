//! Noyau — évaluation (pipeline réel)
//!
//! tokenize -> Parser (descente récursive) -> Expr -> evaluate (Decimal, PRECISION chiffres)
//!
//! Remarque : les domaines (sqrt(-1), ln(0), fact(-2)…) ne lèvent pas d’erreur,
//! le backend rend nan / ±inf. Seules la division par zéro et les noms inconnus échouent.

use super::constantes;
use super::decimal::Decimal;
use super::erreur::{CoreError, EvalError};
use super::expr::{BinaryOp, Expr, UnaryOp};
use super::jetons::{format_tokens, tokenize, Token};
use super::parseur::Parser;
use super::transcendantes as tr;

/// Fonctions reconnues, dans l’ordre de la commande `list`.
pub const FONCTIONS: &[&str] = &[
    "sin", "cos", "tan", "sinh", "cosh", "tanh", "ln", "log", "exp", "sqrt", "sind", "cosd",
    "tand", "fact", "rms", "peak",
];

pub const CONSTANTES: &[&str] = &["pi", "e", "phi"];

/// Évalue un arbre. Pur : aucune E/S, pas d’état hors des constantes.
pub fn evaluate(expr: &Expr) -> Result<Decimal, EvalError> {
    match expr {
        Expr::Number(v) => Ok(v.clone()),

        Expr::Constant(nom) => constantes::constante(nom)
            .cloned()
            .ok_or_else(|| EvalError::UnknownConstant(nom.clone())),

        Expr::Unary(op, x) => {
            let v = evaluate(x)?;
            Ok(match op {
                UnaryOp::Negate => -v,
                UnaryOp::Identity => v,
            })
        }

        Expr::Binary(..) => binaire(expr),

        // argument d’abord, nom ensuite
        Expr::Call(nom, x) => {
            let v = evaluate(x)?;
            appeler(nom, &v)
        }
    }
}

/// Chaîne binaire parcourue le long de son épine gauche, sans récursion.
/// Ordre identique à la descente récursive : à chaque niveau `/`, le diviseur passe
/// avant tout ce qui est à sa gauche ; les autres opérandes droits viennent après.
fn binaire(expr: &Expr) -> Result<Decimal, EvalError> {
    let (noeuds, feuille) = expr.epine();

    // diviseurs d’abord, du sommet vers la feuille : un zéro arrête tout
    let mut diviseurs = Vec::with_capacity(noeuds.len());
    for (op, b) in &noeuds {
        if *op == BinaryOp::Divide {
            let d = evaluate(b)?;
            if d.est_zero() {
                return Err(EvalError::DivisionByZero);
            }
            diviseurs.push(Some(d));
        } else {
            diviseurs.push(None);
        }
    }

    let mut g = evaluate(feuille)?;
    for ((op, b), d) in noeuds.iter().zip(diviseurs).rev() {
        let d = match d {
            Some(d) => d,
            None => evaluate(b)?,
        };
        g = appliquer(*op, &g, &d);
    }
    Ok(g)
}

fn appliquer(op: BinaryOp, g: &Decimal, d: &Decimal) -> Decimal {
    match op {
        BinaryOp::Add => g + d,
        BinaryOp::Subtract => g - d,
        BinaryOp::Multiply => g * d,
        BinaryOp::Divide => g / d,
        BinaryOp::Power => tr::pow(g, d),
        BinaryOp::Modulus => tr::fmod(g, d),
    }
}

/// x × π / 180 (arrondis successifs, comme une saisie "x*pi/180")
fn en_radians(x: &Decimal) -> Decimal {
    let pi = &constantes::initialiser().pi;
    &(x * pi) / &Decimal::from(180i64)
}

fn appeler(nom: &str, x: &Decimal) -> Result<Decimal, EvalError> {
    let deux = Decimal::from(2i64);

    let v = match nom {
        "sin" => tr::sin(x),
        "cos" => tr::cos(x),
        "tan" => tr::tan(x),
        "sinh" => tr::sinh(x),
        "cosh" => tr::cosh(x),
        "tanh" => tr::tanh(x),
        "ln" => tr::ln(x),
        "log" => tr::log10(x),
        "exp" => tr::exp(x),
        "sqrt" => tr::sqrt(x),

        // degrés
        "sind" => tr::sin(&en_radians(x)),
        "cosd" => tr::cos(&en_radians(x)),
        "tand" => tr::tan(&en_radians(x)),

        // fact(x) = Γ(x + 1)
        "fact" => tr::gamma(&(x + &Decimal::un())),
        "rms" => x / &tr::sqrt(&deux),
        "peak" => x * &tr::sqrt(&deux),

        _ => return Err(EvalError::UnknownFunction(nom.to_string())),
    };
    Ok(v)
}

/// Analyse + évaluation d’une séquence de jetons (terminée par End).
pub fn parse_and_evaluate(tokens: &[Token]) -> Result<Decimal, CoreError> {
    let expr = Parser::new(tokens).parse()?;
    log::debug!("arbre : {expr}");

    let v = evaluate(&expr)?;
    Ok(v)
}

/// API publique : une ligne de texte -> un résultat à PRECISION chiffres.
pub fn eval_expression(ligne: &str) -> Result<Decimal, CoreError> {
    // 1) Jetons
    let jetons = tokenize(ligne)?;
    log::debug!("jetons : {}", format_tokens(&jetons));

    // 2) Arbre + valeur
    let v = parse_and_evaluate(&jetons)?;
    log::debug!("résultat : {v:.20}");
    Ok(v)
}
