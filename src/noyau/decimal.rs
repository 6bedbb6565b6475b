// src/noyau/decimal.rs
//
// Décimal multiprécision (flottant base 10)
// -----------------------------------------
// valeur = mantisse × 10^exposant
// - mantisse sans zéro de queue : une seule écriture par valeur (zéro = 0 × 10^0)
// - PRECISION chiffres significatifs après chaque opération publique (arrondi pair)
// - valeurs spéciales Nan / ±Infini : l’évaluation reste totale (sqrt(-1) => nan, ln(0) => -inf)
//
// Les opérateurs (+ - * /) arrondissent à PRECISION. Les fonctions internes passent
// par les variantes explicites (ajouter, multiplier, diviser…) avec leur propre précision.

use std::cmp::Ordering;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use thiserror::Error;

use super::pointfixe::{pow10, Echelle};

/// Chiffres significatifs du backend (fixes pour tout le processus).
pub const PRECISION: usize = 999;

/// Chiffres de garde des calculs internes.
pub const GARDE: usize = 24;

#[derive(Clone, Debug)]
pub enum Decimal {
    Fini { mantisse: BigInt, exposant: i64 },
    Infini { negatif: bool },
    Nan,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid number literal: {0}")]
pub struct LitteralInvalide(pub String);

/// Nombre de chiffres décimaux de |m| (1 pour zéro).
pub fn nb_chiffres(m: &BigInt) -> usize {
    if m.is_zero() {
        1
    } else {
        m.magnitude().to_str_radix(10).len()
    }
}

impl Decimal {
    /* ------------------------ Construction ------------------------ */

    /// Forme normale : retire les zéros de queue.
    pub fn fini(mantisse: BigInt, exposant: i64) -> Decimal {
        if mantisse.is_zero() {
            return Decimal::Fini {
                mantisse,
                exposant: 0,
            };
        }

        let mut m = mantisse;
        let mut e = exposant;

        // par paquets de 16 puis chiffre à chiffre
        let paquet = pow10(16);
        loop {
            let (q, r) = m.div_rem(&paquet);
            if !r.is_zero() {
                break;
            }
            m = q;
            e += 16;
        }
        let dix = BigInt::from(10u32);
        loop {
            let (q, r) = m.div_rem(&dix);
            if !r.is_zero() {
                break;
            }
            m = q;
            e += 1;
        }

        Decimal::Fini {
            mantisse: m,
            exposant: e,
        }
    }

    pub fn zero() -> Decimal {
        Decimal::fini(BigInt::zero(), 0)
    }

    pub fn un() -> Decimal {
        Decimal::fini(BigInt::one(), 0)
    }

    pub fn infini(negatif: bool) -> Decimal {
        Decimal::Infini { negatif }
    }

    /// Valeur scalée (virgule fixe) -> décimal.
    pub fn depuis_fixe(v: BigInt, chiffres: usize) -> Decimal {
        Decimal::fini(v, -(chiffres as i64))
    }

    /* ------------------------ Observations ------------------------ */

    pub fn est_fini(&self) -> bool {
        matches!(self, Decimal::Fini { .. })
    }

    pub fn est_nan(&self) -> bool {
        matches!(self, Decimal::Nan)
    }

    pub fn est_zero(&self) -> bool {
        matches!(self, Decimal::Fini { mantisse, .. } if mantisse.is_zero())
    }

    /// Strictement négatif (y compris -inf).
    pub fn est_negatif(&self) -> bool {
        match self {
            Decimal::Fini { mantisse, .. } => mantisse.is_negative(),
            Decimal::Infini { negatif } => *negatif,
            Decimal::Nan => false,
        }
    }

    pub fn est_entier(&self) -> bool {
        matches!(self, Decimal::Fini { mantisse, exposant } if mantisse.is_zero() || *exposant >= 0)
    }

    /// Parité (sens seulement pour un entier).
    pub fn est_pair(&self) -> bool {
        match self {
            Decimal::Fini { mantisse, exposant } => *exposant > 0 || mantisse.is_even(),
            _ => false,
        }
    }

    /// Exposant décimal du premier chiffre : x ∈ [10^g, 10^(g+1)). None pour 0 et les spéciaux.
    pub fn magnitude(&self) -> Option<i64> {
        match self {
            Decimal::Fini { mantisse, exposant } if !mantisse.is_zero() => {
                Some(nb_chiffres(mantisse) as i64 - 1 + exposant)
            }
            _ => None,
        }
    }

    /// Valeur entière exacte (None si non entier, spécial, ou exposant démesuré).
    pub fn vers_entier(&self) -> Option<BigInt> {
        match self {
            Decimal::Fini { mantisse, exposant } if *exposant >= 0 && *exposant <= 100_000 => {
                Some(mantisse * pow10(*exposant as usize))
            }
            Decimal::Fini { mantisse, .. } if mantisse.is_zero() => Some(BigInt::zero()),
            _ => None,
        }
    }

    /// Lecture approchée en f64 (estimations de grandeur, graines).
    pub fn vers_f64(&self) -> f64 {
        match self {
            Decimal::Fini { mantisse, exposant } => format!("{mantisse}e{exposant}")
                .parse()
                .unwrap_or(f64::NAN),
            Decimal::Infini { negatif: true } => f64::NEG_INFINITY,
            Decimal::Infini { negatif: false } => f64::INFINITY,
            Decimal::Nan => f64::NAN,
        }
    }

    /// Valeur scalée ⌊x × 10^w⌋ (tronquée). Les spéciaux donnent 0 : l’appelant les a déjà traités.
    pub fn vers_fixe(&self, e: &Echelle) -> BigInt {
        let Decimal::Fini { mantisse, exposant } = self else {
            return BigInt::zero();
        };
        let decalage = exposant + e.chiffres() as i64;
        if decalage >= 0 {
            mantisse * pow10(decalage as usize)
        } else if (-decalage) as usize > nb_chiffres(mantisse) {
            BigInt::zero()
        } else {
            mantisse / pow10((-decalage) as usize)
        }
    }

    /* ------------------------ Arrondi ------------------------ */

    /// Arrondi au plus proche, égalité vers le pair, à `prec` chiffres significatifs.
    pub fn arrondir(&self, prec: usize) -> Decimal {
        let Decimal::Fini { mantisse, exposant } = self else {
            return self.clone();
        };
        let prec = prec.max(1);
        let d = nb_chiffres(mantisse);
        if d <= prec {
            return self.clone();
        }

        let coupe = d - prec;
        let p = pow10(coupe).magnitude().clone();
        let (mut q, r): (BigUint, BigUint) = mantisse.magnitude().div_rem(&p);
        let double = r * 2u32;
        if double > p || (double == p && q.is_odd()) {
            q += 1u32;
        }

        Decimal::fini(BigInt::from_biguint(mantisse.sign(), q), exposant + coupe as i64)
    }

    /// × 10^k
    pub fn decaler(&self, k: i64) -> Decimal {
        match self {
            Decimal::Fini { mantisse, exposant } => match exposant.checked_add(k) {
                Some(e) => Decimal::fini(mantisse.clone(), e),
                None => self.debordement(k > 0, mantisse.is_negative()),
            },
            _ => self.clone(),
        }
    }

    fn debordement(&self, vers_infini: bool, negatif: bool) -> Decimal {
        if vers_infini {
            Decimal::infini(negatif)
        } else {
            Decimal::zero()
        }
    }

    /* ------------------------ Arithmétique à précision explicite ------------------------ */

    pub fn oppose(&self) -> Decimal {
        match self {
            Decimal::Fini { mantisse, exposant } => Decimal::Fini {
                mantisse: -mantisse,
                exposant: *exposant,
            },
            Decimal::Infini { negatif } => Decimal::infini(!negatif),
            Decimal::Nan => Decimal::Nan,
        }
    }

    pub fn abs(&self) -> Decimal {
        if self.est_negatif() {
            self.oppose()
        } else {
            self.clone()
        }
    }

    pub fn ajouter(&self, autre: &Decimal, prec: usize) -> Decimal {
        use Decimal::*;

        match (self, autre) {
            (Nan, _) | (_, Nan) => Nan,
            (Infini { negatif: a }, Infini { negatif: b }) => {
                if a == b {
                    self.clone()
                } else {
                    Nan
                }
            }
            (Infini { .. }, _) => self.clone(),
            (_, Infini { .. }) => autre.clone(),
            (
                Fini {
                    mantisse: ma,
                    exposant: ea,
                },
                Fini {
                    mantisse: mb,
                    exposant: eb,
                },
            ) => {
                if ma.is_zero() {
                    return autre.arrondir(prec);
                }
                if mb.is_zero() {
                    return self.arrondir(prec);
                }

                // au-delà de la précision, le plus petit terme ne change plus l’arrondi
                let ga = nb_chiffres(ma) as i64 - 1 + ea;
                let gb = nb_chiffres(mb) as i64 - 1 + eb;
                let marge = prec as i64 + 2;
                if ga - gb > marge {
                    return self.arrondir(prec);
                }
                if gb - ga > marge {
                    return autre.arrondir(prec);
                }

                let e = (*ea).min(*eb);
                let a = ma * pow10((ea - e) as usize);
                let b = mb * pow10((eb - e) as usize);
                Decimal::fini(a + b, e).arrondir(prec)
            }
        }
    }

    pub fn soustraire(&self, autre: &Decimal, prec: usize) -> Decimal {
        self.ajouter(&autre.oppose(), prec)
    }

    pub fn multiplier(&self, autre: &Decimal, prec: usize) -> Decimal {
        use Decimal::*;

        let negatif = self.est_negatif() != autre.est_negatif();
        match (self, autre) {
            (Nan, _) | (_, Nan) => Nan,
            (Infini { .. }, x) | (x, Infini { .. }) => {
                if x.est_zero() {
                    Nan
                } else {
                    Decimal::infini(negatif)
                }
            }
            (
                Fini {
                    mantisse: ma,
                    exposant: ea,
                },
                Fini {
                    mantisse: mb,
                    exposant: eb,
                },
            ) => match ea.checked_add(*eb) {
                Some(e) => Decimal::fini(ma * mb, e).arrondir(prec),
                None => self.debordement(*ea > 0, negatif),
            },
        }
    }

    /// Quotient arrondi. x/0 donne ±inf (nan pour 0/0) : la division par zéro “utilisateur”
    /// est interceptée plus haut, dans l’évaluateur.
    pub fn diviser(&self, autre: &Decimal, prec: usize) -> Decimal {
        use Decimal::*;

        let negatif = self.est_negatif() != autre.est_negatif();
        match (self, autre) {
            (Nan, _) | (_, Nan) => Nan,
            (Infini { .. }, Infini { .. }) => Nan,
            (Infini { .. }, _) => Decimal::infini(negatif),
            (_, Infini { .. }) => Decimal::zero(),
            (
                Fini {
                    mantisse: ma,
                    exposant: ea,
                },
                Fini {
                    mantisse: mb,
                    exposant: eb,
                },
            ) => {
                if mb.is_zero() {
                    return if ma.is_zero() {
                        Nan
                    } else {
                        Decimal::infini(ma.is_negative())
                    };
                }
                if ma.is_zero() {
                    return Decimal::zero();
                }

                // prec + 2 chiffres de quotient, puis un chiffre “collant” si le reste est non nul
                let decalage =
                    (prec as i64 + 2 + nb_chiffres(mb) as i64 - nb_chiffres(ma) as i64).max(0);
                let (q, r) = (ma * pow10(decalage as usize)).div_rem(mb);
                let collant = if r.is_zero() {
                    BigInt::zero()
                } else {
                    BigInt::from(r.signum() * mb.signum())
                };
                let q = q * 10u32 + collant;

                match ea
                    .checked_sub(*eb)
                    .and_then(|e| e.checked_sub(decalage + 1))
                {
                    Some(e) => Decimal::fini(q, e).arrondir(prec),
                    None => self.debordement(*ea > *eb, negatif),
                }
            }
        }
    }
}

/* ------------------------ Conversions ------------------------ */

impl From<i64> for Decimal {
    fn from(v: i64) -> Self {
        Decimal::fini(BigInt::from(v), 0)
    }
}

impl From<u64> for Decimal {
    fn from(v: u64) -> Self {
        Decimal::fini(BigInt::from(v), 0)
    }
}

impl From<BigInt> for Decimal {
    fn from(v: BigInt) -> Self {
        Decimal::fini(v, 0)
    }
}

/// Littéral décimal exact : chiffres avec au plus un point (`12`, `1.5`, `.5`, `5.`).
impl FromStr for Decimal {
    type Err = LitteralInvalide;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalide = || LitteralInvalide(s.to_string());

        let (entier, fraction) = s.split_once('.').unwrap_or((s, ""));
        if fraction.contains('.') || (entier.is_empty() && fraction.is_empty()) {
            return Err(invalide());
        }
        if !entier
            .chars()
            .chain(fraction.chars())
            .all(|c| c.is_ascii_digit())
        {
            return Err(invalide());
        }

        let chiffres = format!("{entier}{fraction}");
        let mantisse = BigInt::parse_bytes(chiffres.as_bytes(), 10).ok_or_else(invalide)?;
        Ok(Decimal::fini(mantisse, -(fraction.len() as i64)))
    }
}

/* ------------------------ Comparaisons ------------------------ */

fn comparer_finis(ma: &BigInt, ea: i64, mb: &BigInt, eb: i64) -> Ordering {
    let sa = ma.sign();
    let sb = mb.sign();
    if sa != sb {
        return sa.cmp(&sb);
    }
    if sa == Sign::NoSign {
        return Ordering::Equal;
    }

    let ga = nb_chiffres(ma) as i64 - 1 + ea;
    let gb = nb_chiffres(mb) as i64 - 1 + eb;
    let ordre = if ga != gb {
        ga.cmp(&gb)
    } else {
        let e = ea.min(eb);
        let a = ma.magnitude() * pow10((ea - e) as usize).magnitude();
        let b = mb.magnitude() * pow10((eb - e) as usize).magnitude();
        a.cmp(&b)
    };

    if sa == Sign::Plus {
        ordre
    } else {
        ordre.reverse()
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        use Decimal::*;

        match (self, other) {
            (Nan, _) | (_, Nan) => None,
            (Infini { negatif: a }, Infini { negatif: b }) => Some(b.cmp(a)),
            (Infini { negatif }, Fini { .. }) => Some(if *negatif {
                Ordering::Less
            } else {
                Ordering::Greater
            }),
            (Fini { .. }, Infini { negatif }) => Some(if *negatif {
                Ordering::Greater
            } else {
                Ordering::Less
            }),
            (
                Fini {
                    mantisse: ma,
                    exposant: ea,
                },
                Fini {
                    mantisse: mb,
                    exposant: eb,
                },
            ) => Some(comparer_finis(ma, *ea, mb, *eb)),
        }
    }
}

/// nan n’est égal à rien, pas même à lui-même.
impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

/* ------------------------ Opérateurs (à PRECISION) ------------------------ */

impl Add<&Decimal> for &Decimal {
    type Output = Decimal;
    fn add(self, rhs: &Decimal) -> Decimal {
        self.ajouter(rhs, PRECISION)
    }
}

impl Sub<&Decimal> for &Decimal {
    type Output = Decimal;
    fn sub(self, rhs: &Decimal) -> Decimal {
        self.soustraire(rhs, PRECISION)
    }
}

impl Mul<&Decimal> for &Decimal {
    type Output = Decimal;
    fn mul(self, rhs: &Decimal) -> Decimal {
        self.multiplier(rhs, PRECISION)
    }
}

impl Div<&Decimal> for &Decimal {
    type Output = Decimal;
    fn div(self, rhs: &Decimal) -> Decimal {
        self.diviser(rhs, PRECISION)
    }
}

impl Neg for Decimal {
    type Output = Decimal;
    fn neg(self) -> Decimal {
        self.oppose()
    }
}

impl Neg for &Decimal {
    type Output = Decimal;
    fn neg(self) -> Decimal {
        self.oppose()
    }
}
