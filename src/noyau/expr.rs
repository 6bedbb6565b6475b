// src/noyau/expr.rs
//
// AST numérique.
// - construit uniquement par l’analyseur (parseur.rs), immuable ensuite
// - chaque nœud possède ses enfants (Box) : pas de partage, pas de cycle
// - imbrication bornée à l’analyse (PROFONDEUR_MAX) ; les chaînes gauches (1+1+…) ne le sont pas,
//   d’où Drop, Display et évaluation itératifs le long de l’épine gauche

use std::fmt;

use super::decimal::Decimal;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Identity,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Modulus,
}

impl BinaryOp {
    pub fn symbole(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Subtract => '-',
            BinaryOp::Multiply => '*',
            BinaryOp::Divide => '/',
            BinaryOp::Power => '^',
            BinaryOp::Modulus => '%',
        }
    }
}

#[derive(Debug)]
pub enum Expr {
    Number(Decimal),
    Constant(String),

    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),

    // fonction(argument), nom vérifié à l’évaluation
    Call(String, Box<Expr>),
}

impl Expr {
    pub fn binary(op: BinaryOp, a: Expr, b: Expr) -> Expr {
        Expr::Binary(op, Box::new(a), Box::new(b))
    }

    pub fn unary(op: UnaryOp, a: Expr) -> Expr {
        Expr::Unary(op, Box::new(a))
    }

    pub fn call(nom: impl Into<String>, a: Expr) -> Expr {
        Expr::Call(nom.into(), Box::new(a))
    }

    /// Épine gauche d’une chaîne binaire : (opérateur, opérande droit) du sommet vers
    /// la feuille, puis la feuille elle-même.
    pub fn epine(&self) -> (Vec<(BinaryOp, &Expr)>, &Expr) {
        let mut noeuds = Vec::new();
        let mut courant = self;
        while let Expr::Binary(op, a, b) = courant {
            noeuds.push((*op, &**b));
            courant = &**a;
        }
        (noeuds, courant)
    }

    /// Détache les enfants (remplacés par une feuille vide) vers `pile`.
    fn detacher(&mut self, pile: &mut Vec<Expr>) {
        let vide = || Expr::Constant(String::new());
        match self {
            Expr::Number(_) | Expr::Constant(_) => {}
            Expr::Unary(_, x) | Expr::Call(_, x) => pile.push(std::mem::replace(&mut **x, vide())),
            Expr::Binary(_, a, b) => {
                pile.push(std::mem::replace(&mut **a, vide()));
                pile.push(std::mem::replace(&mut **b, vide()));
            }
        }
    }
}

/// Libération sans récursion (une chaîne de 10^5 termes ne doit pas vider la pile).
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pile = Vec::new();
        self.detacher(&mut pile);
        while let Some(mut e) = pile.pop() {
            e.detacher(&mut pile);
        }
    }
}

/// Rendu entièrement parenthésé (journal) ; nombres abrégés à 20 chiffres.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Expr::*;
        match self {
            Number(n) => write!(f, "{n:.20}"),
            Constant(c) => write!(f, "{c}"),
            Unary(UnaryOp::Negate, x) => write!(f, "(-{x})"),
            Unary(UnaryOp::Identity, x) => write!(f, "(+{x})"),
            Binary(..) => {
                let (noeuds, feuille) = self.epine();
                for _ in 0..noeuds.len() {
                    f.write_str("(")?;
                }
                write!(f, "{feuille}")?;
                for (op, b) in noeuds.iter().rev() {
                    write!(f, "{}{b})", op.symbole())?;
                }
                Ok(())
            }
            Call(nom, x) => write!(f, "{nom}({x})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affichage_parenthese() {
        let e = Expr::binary(
            BinaryOp::Add,
            Expr::Number(Decimal::from(2i64)),
            Expr::binary(
                BinaryOp::Power,
                Expr::Constant("pi".into()),
                Expr::unary(UnaryOp::Negate, Expr::call("sin", Expr::Number(Decimal::un()))),
            ),
        );
        assert_eq!(e.to_string(), "(2+(pi^(-sin(1))))");
    }

    #[test]
    fn longue_chaine_gauche() {
        let mut e = Expr::Number(Decimal::un());
        for _ in 0..100_000 {
            e = Expr::binary(BinaryOp::Subtract, e, Expr::Number(Decimal::un()));
        }
        let (noeuds, feuille) = e.epine();
        assert_eq!(noeuds.len(), 100_000);
        assert!(matches!(feuille, Expr::Number(_)));

        let court = Expr::binary(
            BinaryOp::Multiply,
            Expr::binary(BinaryOp::Add, Expr::Constant("e".into()), Expr::Constant("pi".into())),
            Expr::Number(Decimal::from(3i64)),
        );
        assert_eq!(court.to_string(), "((e+pi)*3)");
        // e libéré ici, sans récursion
    }
}
