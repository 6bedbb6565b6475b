// src/noyau/transcendantes.rs
//
// Fonctions du backend (exp, ln, trig, hyperboliques, racine, puissance, reste, gamma)
// -----------------------------------------------------------------------------------
// Chaque fonction publique rend un Decimal arrondi à PRECISION.
// Les variantes `*_w` travaillent à w chiffres (sans arrondi final) et se composent.
//
// Les séries tournent en virgule fixe (pointfixe.rs) : l’erreur y est absolue.
// Quand le résultat est petit devant ses entrées (sin près de kπ, ln près de 1…),
// `relatif` relance le calcul avec autant de chiffres que ceux perdus.

use std::f64::consts::{LN_10, PI};
use std::sync::OnceLock;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::constantes::{ln10, pi, pi_fixe};
use super::decimal::{nb_chiffres, Decimal, GARDE, PRECISION};
use super::pointfixe::{exp_fixe, ln_fixe, pow10, sin_cos_fixe, Echelle};

/// Reprises maximales de `relatif` (et plafond : 8 × la précision de départ).
const ESSAIS_MAX: usize = 4;

/// exp : au-delà, débordement (inf) ou soupassement (0).
const EXP_ARG_MAX: f64 = 1e15;

/// sin/cos/tan : au-delà de 10^TRIG_GRANDEUR_MAX, la réduction n’est plus tentée (nan).
const TRIG_GRANDEUR_MAX: i64 = 10_000;

/// tanh(x) = ±1 à PRECISION chiffres bien avant cette borne.
const TANH_SATURE: f64 = 1e6;

/// Γ(n) exact (produit) jusque-là.
const FACT_EXACT_MAX: u64 = 5000;

/// Γ : série de Stirling au-delà, série incomplète en deçà.
const SEUIL_STIRLING: f64 = 1e4;

/// Termes de Stirling précalculés (suffisent pour s ≥ SEUIL_STIRLING à PRECISION).
const STIRLING_TERMES: usize = 260;

/// x^n par carrés successifs jusqu’à |n| = 10^15.
const POW_ENTIER_MAX: i64 = 1_000_000_000_000_000;

/* ------------------------ Outils ------------------------ */

fn demi() -> Decimal {
    Decimal::fini(BigInt::from(5u32), -1)
}

fn chiffres_entier(n: i64) -> usize {
    n.unsigned_abs().to_string().len()
}

/// Chiffres significatifs perdus par un résultat calculé à précision absolue.
fn perte(v: &Decimal) -> usize {
    match v.magnitude() {
        Some(g) if g < 0 => g.unsigned_abs() as usize,
        _ => 0,
    }
}

/// |x| assez petit pour que f(x) = x (sin, tan, sinh, tanh) à w chiffres.
fn negligeable(x: &Decimal, w: usize) -> bool {
    x.magnitude().is_some_and(|g| g < -(w as i64) / 2 - 1)
}

/// Calcule à prec + GARDE chiffres, puis reprend avec les chiffres perdus en plus.
fn relatif<F>(prec: usize, nom: &str, calcul: F) -> Decimal
where
    F: Fn(usize) -> (Decimal, usize),
{
    let base = prec + GARDE;
    let plafond = base * 8;
    let mut w = base;
    let mut essai = 1;

    loop {
        let (v, perdus) = calcul(w);
        if w >= prec + GARDE / 2 + perdus || essai == ESSAIS_MAX || w == plafond {
            return v.arrondir(prec);
        }
        essai += 1;
        w = (base + perdus).min(plafond);
        log::trace!("{nom} : {perdus} chiffres perdus, reprise à {w} chiffres");
    }
}

/* ------------------------ exp / ln / log ------------------------ */

pub fn exp(x: &Decimal) -> Decimal {
    exp_w(x, PRECISION + GARDE).arrondir(PRECISION)
}

fn exp_w(x: &Decimal, w: usize) -> Decimal {
    match x {
        Decimal::Nan => return Decimal::Nan,
        Decimal::Infini { negatif: true } => return Decimal::zero(),
        Decimal::Infini { negatif: false } => return Decimal::infini(false),
        _ if x.est_zero() => return Decimal::un(),
        _ => {}
    }

    let xf = x.vers_f64();
    if xf.abs() > EXP_ARG_MAX {
        return if xf > 0.0 {
            Decimal::infini(false)
        } else {
            Decimal::zero()
        };
    }

    // x = k ln 10 + r, |r| <= ln 10 / 2
    let k = (xf / LN_10).round() as i64;
    let r = if k == 0 {
        x.clone()
    } else {
        let p = w + 20 + x.magnitude().unwrap_or(0).max(0) as usize;
        x.soustraire(&ln10(p).multiplier(&Decimal::from(k), p), p)
    };

    let e = Echelle::new(w + 2);
    let v = exp_fixe(&r.vers_fixe(&e), &e);
    Decimal::depuis_fixe(v, w + 2).decaler(k)
}

pub fn ln(x: &Decimal) -> Decimal {
    relatif(PRECISION, "ln", |w| {
        let v = ln_w(x, w);
        let p = perte(&v);
        (v, p)
    })
}

fn ln_w(x: &Decimal, w: usize) -> Decimal {
    match x {
        Decimal::Nan => return Decimal::Nan,
        Decimal::Infini { negatif: false } => return Decimal::infini(false),
        _ if x.est_zero() => return Decimal::infini(true),
        _ if x.est_negatif() => return Decimal::Nan,
        _ => {}
    }

    // x = y × 10^g, y ∈ [1, 10)
    let g = x.magnitude().unwrap_or(0);
    let p = w + 4 + chiffres_entier(g);
    let e = Echelle::new(p);
    let y = x.decaler(-g).vers_fixe(&e);

    let partie = if &y == e.un() {
        Decimal::zero()
    } else {
        Decimal::depuis_fixe(ln_fixe(&y, &e), p)
    };

    if g == 0 {
        partie
    } else {
        partie.ajouter(&ln10(p).multiplier(&Decimal::from(g), p), p)
    }
}

/// log décimal ; exact sur les puissances de 10.
pub fn log10(x: &Decimal) -> Decimal {
    if let Decimal::Fini { mantisse, exposant } = x {
        if mantisse.is_one() {
            return Decimal::from(*exposant);
        }
    }

    relatif(PRECISION, "log", |w| {
        let v = ln_w(x, w).diviser(&ln10(w + 2), w);
        let p = perte(&v);
        (v, p)
    })
}

/* ------------------------ sin / cos / tan ------------------------ */

/// (sin x, cos x) à 10^-w près. None : argument non fini ou trop grand.
fn sin_cos_w(x: &Decimal, w: usize) -> Option<(Decimal, Decimal)> {
    if !x.est_fini() {
        return None;
    }
    if x.est_zero() {
        return Some((Decimal::zero(), Decimal::un()));
    }
    if negligeable(x, w) {
        return Some((x.clone(), Decimal::un()));
    }

    let g = x.magnitude().unwrap_or(0);
    if g >= TRIG_GRANDEUR_MAX {
        return None;
    }

    // q·(π/2) le plus proche : π porte les chiffres de la partie entière de x en plus
    let p = w + g.max(0) as usize + 10;
    let e = Echelle::new(p);
    let xs = x.vers_fixe(&e);
    let demi_pi = pi_fixe(&e) / 2u32;

    let (mut q, mut r) = xs.div_mod_floor(&demi_pi);
    if &r * 2u32 > demi_pi {
        q += 1u32;
        r -= &demi_pi;
    }

    let (s, c) = sin_cos_fixe(&r, &e);
    let (s, c) = match q.mod_floor(&BigInt::from(4u32)).to_u8() {
        Some(1) => (c, -s),
        Some(2) => (-s, -c),
        Some(3) => (-c, s),
        _ => (s, c),
    };

    Some((Decimal::depuis_fixe(s, p), Decimal::depuis_fixe(c, p)))
}

pub fn sin(x: &Decimal) -> Decimal {
    if negligeable(x, PRECISION + GARDE) {
        return x.arrondir(PRECISION);
    }
    relatif(PRECISION, "sin", |w| match sin_cos_w(x, w) {
        Some((s, _)) => {
            let p = perte(&s);
            (s, p)
        }
        None => (Decimal::Nan, 0),
    })
}

pub fn cos(x: &Decimal) -> Decimal {
    relatif(PRECISION, "cos", |w| match sin_cos_w(x, w) {
        Some((_, c)) => {
            let p = perte(&c);
            (c, p)
        }
        None => (Decimal::Nan, 0),
    })
}

pub fn tan(x: &Decimal) -> Decimal {
    if negligeable(x, PRECISION + GARDE) {
        return x.arrondir(PRECISION);
    }
    relatif(PRECISION, "tan", |w| match sin_cos_w(x, w) {
        Some((s, c)) => {
            let p = perte(&s).max(perte(&c));
            (s.diviser(&c, w), p)
        }
        None => (Decimal::Nan, 0),
    })
}

/* ------------------------ Hyperboliques ------------------------ */

pub fn sinh(x: &Decimal) -> Decimal {
    match x {
        Decimal::Nan | Decimal::Infini { .. } => return x.clone(),
        _ if negligeable(x, PRECISION + GARDE) => return x.arrondir(PRECISION),
        _ => {}
    }

    relatif(PRECISION, "sinh", |w| {
        let t = exp_w(x, w + 2);
        let inverse = Decimal::un().diviser(&t, w + 2);
        let v = t.soustraire(&inverse, w + 2).multiplier(&demi(), w + 2);
        let p = perte(&v);
        (v, p)
    })
}

pub fn cosh(x: &Decimal) -> Decimal {
    match x {
        Decimal::Nan => Decimal::Nan,
        Decimal::Infini { .. } => Decimal::infini(false),
        _ => {
            let w = PRECISION + GARDE;
            let t = exp_w(x, w);
            let inverse = Decimal::un().diviser(&t, w);
            t.ajouter(&inverse, w)
                .multiplier(&demi(), w)
                .arrondir(PRECISION)
        }
    }
}

pub fn tanh(x: &Decimal) -> Decimal {
    let signe = |negatif: bool| {
        if negatif {
            Decimal::from(-1i64)
        } else {
            Decimal::un()
        }
    };

    match x {
        Decimal::Nan => return Decimal::Nan,
        Decimal::Infini { negatif } => return signe(*negatif),
        _ if negligeable(x, PRECISION + GARDE) => return x.arrondir(PRECISION),
        _ if x.vers_f64().abs() > TANH_SATURE => return signe(x.est_negatif()),
        _ => {}
    }

    // (t - 1) / (t + 1), t = e^(2x)
    relatif(PRECISION, "tanh", |w| {
        let t = exp_w(&x.multiplier(&Decimal::from(2i64), w + 2), w + 2);
        let un = Decimal::un();
        let v = t
            .soustraire(&un, w + 2)
            .diviser(&t.ajouter(&un, w + 2), w + 2);
        let p = perte(&v);
        (v, p)
    })
}

/* ------------------------ Racine carrée ------------------------ */

/// Racine correctement arrondie (reste ≠ 0 => chiffre collant).
pub fn sqrt(x: &Decimal) -> Decimal {
    racine(x, PRECISION)
}

fn racine(x: &Decimal, prec: usize) -> Decimal {
    match x {
        Decimal::Nan => Decimal::Nan,
        _ if x.est_negatif() => Decimal::Nan,
        Decimal::Infini { .. } => Decimal::infini(false),
        Decimal::Fini { mantisse, exposant } => {
            if mantisse.is_zero() {
                return Decimal::zero();
            }

            // exposant pair, puis au moins 2(prec + 2) chiffres sous la racine
            let (mut m, mut e) = (mantisse.clone(), *exposant);
            if e.rem_euclid(2) != 0 {
                m *= 10u32;
                e -= 1;
            }
            let cible = 2 * (prec + 2);
            let d = nb_chiffres(&m);
            if d < cible {
                let k = (cible - d + 1) / 2;
                m *= pow10(2 * k);
                e -= 2 * k as i64;
            }

            let r = m.sqrt();
            let (r, e) = if &r * &r == m {
                (r, e / 2)
            } else {
                (r * 10u32 + 1u32, e / 2 - 1)
            };
            Decimal::fini(r, e).arrondir(prec)
        }
    }
}

/* ------------------------ Puissance ------------------------ */

/// x^y, cas particuliers dans l’ordre IEEE (pow(x, 0) = 1 même pour nan).
pub fn pow(x: &Decimal, y: &Decimal) -> Decimal {
    let un = Decimal::un();
    if y.est_zero() || *x == un {
        return un;
    }
    if x.est_nan() || y.est_nan() {
        return Decimal::Nan;
    }

    if let Decimal::Infini { negatif } = y {
        let ax = x.abs();
        return if ax == un {
            un
        } else if (ax > un) != *negatif {
            Decimal::infini(false)
        } else {
            Decimal::zero()
        };
    }

    let impair = y.est_entier() && !y.est_pair();
    if let Decimal::Infini { negatif } = x {
        return if y.est_negatif() {
            Decimal::zero()
        } else {
            Decimal::infini(*negatif && impair)
        };
    }
    if x.est_zero() {
        return if y.est_negatif() {
            Decimal::infini(false)
        } else {
            Decimal::zero()
        };
    }
    if x.est_negatif() && !y.est_entier() {
        return Decimal::Nan;
    }

    let w = PRECISION + GARDE;
    let entier = y
        .vers_entier()
        .and_then(|n| n.to_i64())
        .filter(|n| n.abs() <= POW_ENTIER_MAX);

    let v = match entier {
        Some(n) => puissance_entiere(x, n, w),
        None => {
            // exp(y ln|x|) : l’erreur absolue sur ln|x| est multipliée par y
            let gy = y.magnitude().unwrap_or(0).clamp(0, 4 * PRECISION as i64) as usize;
            let gl = chiffres_entier(x.magnitude().unwrap_or(0)) + 1;
            let p = w + gy + gl + 4;
            let z = y.multiplier(&ln_w(&x.abs(), p), p);
            let v = exp_w(&z, w);
            if x.est_negatif() && impair {
                v.oppose()
            } else {
                v
            }
        }
    };

    v.arrondir(PRECISION)
}

/// Carrés successifs ; exact tant que les produits tiennent dans la précision.
fn puissance_entiere(x: &Decimal, n: i64, w: usize) -> Decimal {
    let g = x.magnitude().unwrap_or(0);
    if g.unsigned_abs() as f64 * n.unsigned_abs() as f64 > EXP_ARG_MAX {
        let negatif = x.est_negatif() && n % 2 != 0;
        return if (g >= 0) == (n > 0) {
            Decimal::infini(negatif)
        } else {
            Decimal::zero()
        };
    }

    let prec = w + chiffres_entier(n) + 2;
    let mut e = n.unsigned_abs();
    let mut acc = Decimal::un();
    let mut b = x.clone();

    while e > 0 {
        if (e & 1) == 1 {
            acc = acc.multiplier(&b, prec);
        }
        e >>= 1;
        if e > 0 {
            b = b.multiplier(&b, prec);
        }
    }

    if n < 0 {
        Decimal::un().diviser(&acc, prec)
    } else {
        acc
    }
}

/* ------------------------ Reste ------------------------ */

/// Reste de la division tronquée (signe du dividende), exact.
pub fn fmod(x: &Decimal, y: &Decimal) -> Decimal {
    match (x, y) {
        (Decimal::Nan, _) | (_, Decimal::Nan) | (Decimal::Infini { .. }, _) => Decimal::Nan,
        (_, Decimal::Infini { .. }) => x.clone(),
        (
            Decimal::Fini {
                mantisse: mx,
                exposant: ex,
            },
            Decimal::Fini {
                mantisse: my,
                exposant: ey,
            },
        ) => {
            if my.is_zero() {
                return Decimal::Nan;
            }
            if mx.is_zero() {
                return Decimal::zero();
            }

            let (ax, ay) = (mx.abs(), my.abs());
            let (r, e) = if ex >= ey {
                // x = (mx × 10^(ex - ey)) × 10^ey
                let facteur = BigInt::from(10u32).modpow(&BigInt::from(ex - ey), &ay);
                ((ax * facteur) % &ay, *ey)
            } else {
                let d = (ey - ex) as u64;
                if d >= nb_chiffres(mx) as u64 {
                    // |x| < |y|
                    return x.arrondir(PRECISION);
                }
                (ax % (ay * pow10(d as usize)), *ex)
            };

            let r = if mx.is_negative() { -r } else { r };
            Decimal::fini(r, e).arrondir(PRECISION)
        }
    }
}

/* ------------------------ Gamma ------------------------ */

/// Γ(x). Pôles : 0 => +inf, entiers négatifs => nan.
pub fn gamma(x: &Decimal) -> Decimal {
    match x {
        Decimal::Nan | Decimal::Infini { negatif: true } => Decimal::Nan,
        Decimal::Infini { negatif: false } => Decimal::infini(false),
        _ if x.est_zero() => Decimal::infini(false),
        _ if x.est_negatif() && x.est_entier() => Decimal::Nan,
        _ if x.est_negatif() => reflexion(x),
        _ => gamma_positif(x, PRECISION + GARDE).arrondir(PRECISION),
    }
}

/// Γ(s) = π / (sin(πs) Γ(1 - s)), s < 0 non entier
fn reflexion(s: &Decimal) -> Decimal {
    relatif(PRECISION, "gamma", |w| {
        let p = w + s.magnitude().unwrap_or(0).max(0) as usize + 4;
        let ps = pi(p).multiplier(s, p);
        let Some((sinus, _)) = sin_cos_w(&ps, w + 4) else {
            return (Decimal::Nan, 0);
        };

        let g = gamma_positif(&Decimal::un().soustraire(s, p), w + 4);
        let v = pi(w + 4).diviser(&sinus.multiplier(&g, w + 4), w + 4);
        (v, perte(&sinus))
    })
}

fn gamma_positif(s: &Decimal, w: usize) -> Decimal {
    let sf = s.vers_f64();
    if sf > EXP_ARG_MAX {
        return Decimal::infini(false);
    }

    let entier = s
        .vers_entier()
        .and_then(|n| n.to_u64())
        .filter(|n| *n <= FACT_EXACT_MAX);
    if let Some(n) = entier {
        return Decimal::from((1..n).map(BigInt::from).product::<BigInt>());
    }

    if sf < 1.0 {
        // Γ(s) = Γ(s + 1) / s
        let s1 = s.ajouter(&Decimal::un(), w + 4);
        return gamma_positif(&s1, w + 2).diviser(s, w + 2);
    }

    if sf >= SEUIL_STIRLING {
        stirling(s, w)
    } else {
        serie_incomplete(s, w)
    }
}

/// lnΓ approché (Stirling f64), s >= 1 : borne du reste uniquement.
fn ln_gamma_f64(s: f64) -> f64 {
    (s - 0.5) * s.ln() - s + 0.5 * (2.0 * PI).ln() + 1.0 / (12.0 * s)
}

/// N entier tel que Γ(s, N) < 10^-(w + 10) Γ(s).
fn borne_n(s: f64, w: usize) -> u64 {
    let cible = -((w + 10) as f64) * LN_10;
    let lg = ln_gamma_f64(s);
    let mut n = s + w as f64 * LN_10;
    while (s - 1.0) * n.ln() - n - lg > cible {
        n *= 1.1;
    }
    n.ceil() as u64
}

/// Γ(s) ≈ N^s e^-N Σ_{k≥0} N^k / (s (s+1) … (s+k))   (termes positifs : pas d’annulation)
fn serie_incomplete(s: &Decimal, w: usize) -> Decimal {
    let n = borne_n(s.vers_f64(), w);
    let e = Echelle::new(w + 4);
    let sf = s.vers_fixe(&e);

    let mut terme = e.div(e.un(), &sf);
    let mut somme = terme.clone();
    let mut k: u64 = 1;
    while !terme.is_zero() {
        let denominateur = &sf + e.un() * k;
        terme = e.div(&(terme * n), &denominateur);
        somme += &terme;
        k += 1;
    }
    log::trace!("gamma : série incomplète, N = {n}, {k} termes");

    // N^s e^-N = exp(s ln N - N)
    let p = w + 12;
    let nd = Decimal::from(n);
    let z = s.multiplier(&ln_w(&nd, p), p).soustraire(&nd, p);
    let facteur = exp_w(&z, w + 2);

    Decimal::depuis_fixe(somme, w + 4).multiplier(&facteur, w + 2)
}

/// Nombres tangents T_1..T_n (Brent–Harvey), T[0] inutilisé.
fn nombres_tangents(n: usize) -> Vec<BigInt> {
    let mut t = vec![BigInt::zero(); n + 1];
    t[1] = BigInt::one();
    for k in 2..=n {
        t[k] = &t[k - 1] * (k - 1);
    }
    for k in 2..=n {
        for j in k..=n {
            t[j] = &t[j - 1] * (j - k) + &t[j] * (j - k + 2);
        }
    }
    t
}

static STIRLING: OnceLock<Vec<BigRational>> = OnceLock::new();

/// c_k = B_2k / (2k (2k - 1)) = (-1)^(k+1) T_k / (4^k (4^k - 1) (2k - 1))
fn coefficients_stirling() -> &'static [BigRational] {
    STIRLING.get_or_init(|| {
        let t = nombres_tangents(STIRLING_TERMES);
        (1..=STIRLING_TERMES)
            .map(|k| {
                let quatre_k = BigInt::from(4u32).pow(k as u32);
                let den = &quatre_k * (&quatre_k - 1u32) * (2 * k as u64 - 1);
                let c = BigRational::new(t[k].clone(), den);
                if k % 2 == 1 {
                    c
                } else {
                    -c
                }
            })
            .collect()
    })
}

/// lnΓ(s) = (s - ½) ln s - s + ½ ln 2π + Σ c_k / s^(2k-1)
fn stirling(s: &Decimal, w: usize) -> Decimal {
    let p = w + s.magnitude().unwrap_or(0).max(0) as usize + 8;
    let demi = demi();

    let mut somme = s
        .soustraire(&demi, p)
        .multiplier(&ln_w(s, p), p)
        .soustraire(s, p);
    let deux_pi = pi(p).multiplier(&Decimal::from(2i64), p);
    somme = somme.ajouter(&ln_w(&deux_pi, p).multiplier(&demi, p), p);

    let inverse = Decimal::un().diviser(s, p);
    let inverse2 = inverse.multiplier(&inverse, p);
    let mut puissance = inverse;
    let seuil = -((w + 8) as i64);

    for c in coefficients_stirling() {
        let c = Decimal::from(c.numer().clone()).diviser(&Decimal::from(c.denom().clone()), p);
        let terme = c.multiplier(&puissance, p);
        if terme.magnitude().map_or(true, |g| g < seuil) {
            break;
        }
        somme = somme.ajouter(&terme, p);
        puissance = puissance.multiplier(&inverse2, p);
    }

    exp_w(&somme, w)
}
