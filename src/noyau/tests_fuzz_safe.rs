//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - on accepte une seule erreur attendue sur les expressions bien formées : la division par zéro
//! - invariant clé : deux évaluations d’une même ligne rendent le même texte

use std::time::{Duration, Instant};

use super::erreur::{CoreError, ParseError};
use super::eval_expression;
use super::parseur::PROFONDEUR_MAX;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Helpers fuzz ------------------------ */

fn is_erreur_attendue(msg: &str) -> bool {
    // Liste blanche : les domaines rendent nan / inf, seul le zéro au dénominateur échoue.
    msg == "Division by zero."
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_nombre(rng: &mut Rng) -> String {
    // petits nombres, incluant 0 et un zéro "calculé"
    match rng.pick(8) {
        0 => "0".to_string(),
        1 => "(1-1)".to_string(),
        2 => format!("{}", rng.pick(10)),
        3 => format!("{}.{}", rng.pick(10), rng.pick(100)),
        4 => format!(".{}", 1 + rng.pick(9)),
        5 => format!("{}", 10 + rng.pick(990)),
        6 => "0.001".to_string(),
        _ => format!("{}", 1 + rng.pick(7)),
    }
}

fn gen_atom(rng: &mut Rng) -> String {
    match rng.pick(6) {
        0 => "pi".to_string(),
        1 => "e".to_string(),
        2 => "phi".to_string(),
        _ => gen_nombre(rng),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atom(rng);
    }

    match rng.pick(13) {
        0 => gen_atom(rng),
        1 => format!(
            "({}+{})",
            gen_expr(rng, depth - 1),
            gen_expr(rng, depth - 1)
        ),
        2 => format!(
            "({}-{})",
            gen_expr(rng, depth - 1),
            gen_expr(rng, depth - 1)
        ),
        3 => format!(
            "({}*{})",
            gen_expr(rng, depth - 1),
            gen_expr(rng, depth - 1)
        ),
        4 => {
            // un diviseur sur quatre est un zéro calculé
            let d = if rng.pick(4) == 0 {
                "(1-1)".to_string()
            } else {
                gen_expr(rng, depth - 1)
            };
            format!("({}/{d})", gen_expr(rng, depth - 1))
        }
        5 => format!(
            "({}%{})",
            gen_expr(rng, depth - 1),
            gen_expr(rng, depth - 1)
        ),
        6 => {
            // exposant borné : entier court ou demi
            let n = if rng.coin() {
                format!("{}", rng.pick(5))
            } else {
                "0.5".to_string()
            };
            format!("({}^{n})", gen_expr(rng, depth - 1))
        }
        7 => format!("-{}", gen_expr(rng, depth - 1)),
        8 => format!("sin({})", gen_expr(rng, depth - 1)),
        9 => format!("cos({})", gen_expr(rng, depth - 1)),
        10 => format!("exp({})", gen_expr(rng, depth - 1)),
        11 => {
            if rng.coin() {
                format!("sqrt({})", gen_expr(rng, depth - 1))
            } else {
                format!("ln({})", gen_expr(rng, depth - 1))
            }
        }
        _ => {
            // fact borné : seulement sur des entiers simples
            format!("fact({})", rng.pick(20))
        }
    }
}

/// Soupe de caractères : syntaxe quelconque, aucun panic toléré.
fn gen_soupe(rng: &mut Rng) -> String {
    const ALPHABET: &[char] = &[
        '0', '1', '2', '9', '.', '.', '+', '-', '*', '/', '^', '%', '(', '(', ')', ')', ' ', 'e',
        'p', 'i', 's', 'n', 'x', 'h', '#', 'é',
    ];
    let n = 1 + rng.pick(16) as usize;
    (0..n)
        .map(|_| ALPHABET[rng.pick(ALPHABET.len() as u32) as usize])
        .collect()
}

/* ------------------------ Helper somme balancée anti pile ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut items: Vec<String> = (0..n).map(|_| terme.to_string()).collect();
    while items.len() > 1 {
        let mut next = Vec::new();
        let mut i = 0;
        while i < items.len() {
            if i + 1 < items.len() {
                next.push(format!("({}+{})", items[i], items[i + 1]));
                i += 2;
            } else {
                next.push(items[i].clone());
                i += 1;
            }
        }
        items = next;
    }
    items.pop().unwrap_or_else(|| "0".to_string())
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_determinisme() {
    let t0 = Instant::now();
    let max = Duration::from_secs(120);

    // Même seed => mêmes expressions => mêmes sorties (déterminisme)
    let mut rng = Rng::new(0xC0FFEE_u64);

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..80 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 4);

        match eval_expression(&expr) {
            Ok(v) => {
                let again = eval_expression(&expr)
                    .unwrap_or_else(|e| panic!("expr={expr:?} : ok puis err={e}"));
                assert_eq!(v.to_string(), again.to_string(), "expr={expr:?}");
                seen_ok += 1;
            }
            Err(e) => {
                let msg = e.to_string();
                assert!(
                    is_erreur_attendue(&msg),
                    "erreur non attendue: expr={expr:?} err={msg}"
                );
                assert_eq!(eval_expression(&expr), Err(e), "expr={expr:?}");
                seen_err += 1;
            }
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 10, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune erreur vue: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_soupe_de_caracteres() {
    let t0 = Instant::now();
    let max = Duration::from_secs(60);

    let mut rng = Rng::new(0xBADC0DE_u64);
    let mut rejets = 0usize;

    for _ in 0..400 {
        budget(t0, max);

        let ligne = gen_soupe(&mut rng);
        if let Err(e) = eval_expression(&ligne) {
            assert!(!e.to_string().is_empty(), "message vide: {ligne:?}");
            assert!(!e.etape().is_empty());
            rejets += 1;
        }
    }

    // la soupe est presque toujours mal formée
    assert!(rejets > 100, "trop peu de rejets: {rejets}");
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_secs(10);

    let expr = somme_balancee("1/2", 800);
    budget(t0, max);

    let v = eval_expression(&expr).unwrap_or_else(|e| panic!("err: {e}"));
    budget(t0, max);

    // 800*(1/2) = 400
    assert_eq!(v.to_string(), "400");
}

#[test]
fn fuzz_safe_limites_de_profondeur() {
    let t0 = Instant::now();
    let max = Duration::from_secs(10);
    let trop_profond = Err(CoreError::Parse(ParseError::TooDeep));

    // chaîne gauche plate : aucune imbrication, aucune limite
    let chaine = vec!["1"; 20_000].join("-");
    let v = eval_expression(&chaine).unwrap_or_else(|e| panic!("err: {e}"));
    assert_eq!(v.to_string(), "-19998");
    budget(t0, max);

    // parenthèses et signes : refusés avant de creuser la pile
    let n = PROFONDEUR_MAX * 4;
    let parentheses = format!("{}1{}", "(".repeat(n), ")".repeat(n));
    assert_eq!(eval_expression(&parentheses), trop_profond);

    let signes = format!("{}1", "-".repeat(50_000));
    assert_eq!(eval_expression(&signes), trop_profond);

    let appels = format!("{}1{}", "sin(".repeat(n), ")".repeat(n));
    assert_eq!(eval_expression(&appels), trop_profond);
    budget(t0, max);
}
