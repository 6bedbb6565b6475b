// src/noyau/constantes.rs
//
// Constantes du backend
// ---------------------
// - π, ln 10 en virgule fixe, à la demande, mises en cache par nombre de chiffres
// - table process-wide (π, e, φ) à PRECISION, construite une fois par `initialiser()`
//
// Le cache est derrière OnceLock<Mutex<…>> : les suites de tests tournent en parallèle.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use num_bigint::BigInt;

use super::decimal::{Decimal, GARDE, PRECISION};
use super::pointfixe::{arctan_inv, atanh_inv, pow10, Echelle};
use super::transcendantes;

/// Chiffres calculés en plus puis retirés (troncatures des séries).
const MARGE: usize = 10;

type Cache = OnceLock<Mutex<HashMap<usize, BigInt>>>;

static PI_CACHE: Cache = OnceLock::new();
static LN10_CACHE: Cache = OnceLock::new();

/// Machin : π = 16 atan(1/5) - 4 atan(1/239)
fn pi_calcul(e: &Echelle) -> BigInt {
    arctan_inv(5, e) * 16 - arctan_inv(239, e) * 4
}

/// ln 2 = 2 atanh(1/3)
fn ln2_calcul(e: &Echelle) -> BigInt {
    atanh_inv(3, e) * 2
}

/// ln 10 = 3 ln 2 + ln(5/4), ln(5/4) = 2 atanh(1/9)
fn ln10_calcul(e: &Echelle) -> BigInt {
    ln2_calcul(e) * 3 + atanh_inv(9, e) * 2
}

fn fixe_cache(cache: &Cache, nom: &str, chiffres: usize, calcul: fn(&Echelle) -> BigInt) -> BigInt {
    let m = cache.get_or_init(|| Mutex::new(HashMap::new()));
    let mut guard = m.lock().expect("mutex constantes");

    if let Some(v) = guard.get(&chiffres) {
        return v.clone();
    }

    // une valeur plus longue suffit : troncature
    if let Some((&n, v)) = guard.iter().filter(|(n, _)| **n > chiffres).min_by_key(|(n, _)| **n) {
        return v / pow10(n - chiffres);
    }

    log::trace!("{nom} : calcul à {chiffres} chiffres");
    let v = calcul(&Echelle::new(chiffres + MARGE)) / pow10(MARGE);
    guard.insert(chiffres, v.clone());
    v
}

/// ⌊π × 10^w⌋ (w = chiffres de l’échelle)
pub fn pi_fixe(e: &Echelle) -> BigInt {
    fixe_cache(&PI_CACHE, "π", e.chiffres(), pi_calcul)
}

pub fn ln10_fixe(e: &Echelle) -> BigInt {
    fixe_cache(&LN10_CACHE, "ln 10", e.chiffres(), ln10_calcul)
}

/// π à `chiffres` décimales.
pub fn pi(chiffres: usize) -> Decimal {
    Decimal::depuis_fixe(pi_fixe(&Echelle::new(chiffres)), chiffres)
}

/// ln 10 à `chiffres` décimales.
pub fn ln10(chiffres: usize) -> Decimal {
    Decimal::depuis_fixe(ln10_fixe(&Echelle::new(chiffres)), chiffres)
}

/* ------------------------ Table des constantes nommées ------------------------ */

#[derive(Debug)]
pub struct Constantes {
    pub pi: Decimal,
    pub e: Decimal,
    pub phi: Decimal,
}

static TABLE: OnceLock<Constantes> = OnceLock::new();

/// Construit la table (π d’abord : e et φ passent par le backend). Idempotent.
pub fn initialiser() -> &'static Constantes {
    TABLE.get_or_init(|| {
        let w = PRECISION + GARDE;
        let pi = pi(w).arrondir(PRECISION);
        let e = transcendantes::exp(&Decimal::un());

        // φ = (1 + √5) / 2, un seul arrondi
        let f = Echelle::new(w);
        let racine5 = (f.un() * f.un() * 5u32).sqrt();
        let phi = Decimal::depuis_fixe((racine5 + f.un()) / 2u32, w).arrondir(PRECISION);
        log::debug!("constantes initialisées ({PRECISION} chiffres)");
        Constantes { pi, e, phi }
    })
}

/// Constante nommée (pi, e, phi).
pub fn constante(nom: &str) -> Option<&'static Decimal> {
    let t = initialiser();
    match nom {
        "pi" => Some(&t.pi),
        "e" => Some(&t.e),
        "phi" => Some(&t.phi),
        _ => None,
    }
}
