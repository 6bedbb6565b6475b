// src/noyau/pointfixe.rs
//
// Virgule fixe décimale (entiers “scalés”)
// ----------------------------------------
// Un réel x est porté par l’entier ⌊x × 10^w⌋ (w = chiffres après la virgule).
// Séries (arctan, atanh, exp, sin/cos) et Newton (ln) travaillent ici, sur des BigInt,
// sans autre arrondi que la troncature de chaque produit.
//
// Précision : erreur absolue de quelques unités de 10^-w. Les appelants (transcendantes.rs)
// prévoient leurs chiffres de garde en conséquence.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};

/// exp : nombre de moitiés avant Taylor (puis autant d’élévations au carré).
const MOITIES: usize = 40;

/// exp : chiffres supplémentaires absorbant l’amplification 2^MOITIES des carrés.
const CHIFFRES_EXP: usize = 16;

/// ln : itérations de Newton maximales (convergence cubique, 4 suffisent à 1000 chiffres).
const NEWTON_MAX: usize = 12;

pub fn pow10(n: usize) -> BigInt {
    BigInt::from(10u32).pow(n as u32)
}

/// Échelle 10^w (w chiffres après la virgule) + opérations scalées.
#[derive(Clone, Debug)]
pub struct Echelle {
    chiffres: usize,
    un: BigInt,
}

impl Echelle {
    pub fn new(chiffres: usize) -> Self {
        Self {
            chiffres,
            un: pow10(chiffres),
        }
    }

    pub fn chiffres(&self) -> usize {
        self.chiffres
    }

    /// 1.0 scalé (= 10^w).
    pub fn un(&self) -> &BigInt {
        &self.un
    }

    /// a × b (tronqué)
    pub fn mul(&self, a: &BigInt, b: &BigInt) -> BigInt {
        (a * b) / &self.un
    }

    /// a / b (tronqué) ; b ≠ 0
    pub fn div(&self, a: &BigInt, b: &BigInt) -> BigInt {
        (a * &self.un) / b
    }

    /// Lecture approchée (graines de Newton, estimations).
    pub fn vers_f64(&self, x: &BigInt) -> f64 {
        format!("{x}e-{}", self.chiffres).parse().unwrap_or(0.0)
    }

    /// Graine f64 -> scalé (15 chiffres significatifs environ).
    pub fn depuis_f64(&self, v: f64) -> BigInt {
        let graine = BigInt::from((v * 1e15).round() as i64);
        if self.chiffres >= 15 {
            graine * pow10(self.chiffres - 15)
        } else {
            graine / pow10(15 - self.chiffres)
        }
    }
}

/* ------------------------ Séries en 1/q ------------------------ */

/// arctan(1/q) scalé : z - z^3/3 + z^5/5 - ...
pub fn arctan_inv(q: u32, e: &Echelle) -> BigInt {
    serie_inv(q, e, true)
}

/// atanh(1/q) scalé : z + z^3/3 + z^5/5 + ...
pub fn atanh_inv(q: u32, e: &Echelle) -> BigInt {
    serie_inv(q, e, false)
}

fn serie_inv(q: u32, e: &Echelle, alterne: bool) -> BigInt {
    let q2 = BigInt::from(q) * q;

    // z^(2k+1) scalé
    let mut puissance = e.un() / q;
    let mut somme = BigInt::zero();
    let mut k: u64 = 0;

    while !puissance.is_zero() {
        let terme = &puissance / (2 * k + 1);
        if alterne && k % 2 == 1 {
            somme -= terme;
        } else {
            somme += terme;
        }
        puissance /= &q2;
        k += 1;
    }

    somme
}

/* ------------------------ exp / ln ------------------------ */

/// exp(x) scalé, pour |x| de l’ordre de l’unité (après réduction par ln 10).
/// Taylor sur x / 2^MOITIES, puis MOITIES carrés.
pub fn exp_fixe(x: &BigInt, e: &Echelle) -> BigInt {
    let fine = Echelle::new(e.chiffres + CHIFFRES_EXP);
    let extra = pow10(CHIFFRES_EXP);

    let r = (x * &extra) >> MOITIES;

    let mut somme = fine.un().clone();
    let mut terme = fine.un().clone();
    let mut n: u32 = 1;
    loop {
        terme = fine.mul(&terme, &r) / n;
        if terme.is_zero() {
            break;
        }
        somme += &terme;
        n += 1;
    }

    for _ in 0..MOITIES {
        somme = fine.mul(&somme, &somme);
    }

    somme / extra
}

/// ln(x) scalé pour x ∈ [1, 10) : Newton sur exp, y ← y + 2(x - e^y)/(x + e^y).
pub fn ln_fixe(x: &BigInt, e: &Echelle) -> BigInt {
    let mut y = e.depuis_f64(e.vers_f64(x).ln());

    // |δ| < 10^-(w/3) => l’itération suivante serait déjà exacte à w chiffres
    let tolerance = pow10(e.chiffres * 2 / 3);

    for _ in 0..NEWTON_MAX {
        let ey = exp_fixe(&y, e);
        let delta = e.div(&((x - &ey) * 2u32), &(x + &ey));
        y += &delta;
        if delta.abs() < tolerance {
            break;
        }
    }

    y
}

/* ------------------------ sin / cos ------------------------ */

/// (sin r, cos r) scalés par Taylor, pour |r| <= π/4 (après réduction).
pub fn sin_cos_fixe(r: &BigInt, e: &Echelle) -> (BigInt, BigInt) {
    let r2 = e.mul(r, r);

    let mut terme = r.clone();
    let mut sin = r.clone();
    let mut n: u64 = 1;
    loop {
        terme = -e.mul(&terme, &r2) / ((n + 1) * (n + 2));
        if terme.is_zero() {
            break;
        }
        sin += &terme;
        n += 2;
    }

    let mut terme = e.un().clone();
    let mut cos = terme.clone();
    let mut n: u64 = 0;
    loop {
        terme = -e.mul(&terme, &r2) / ((n + 1) * (n + 2));
        if terme.is_zero() {
            break;
        }
        cos += &terme;
        n += 2;
    }

    (sin, cos)
}
