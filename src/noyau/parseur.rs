// src/noyau/parseur.rs
//
// Descente récursive
// ------------------
//   Expr    := Term (('+' | '-') Term)*
//   Term    := Factor (('*' | '/' | '%') Factor)* ('^' Factor)*
//   Factor  := ('-' | '+') Factor | Number | Constant | Function '(' Expr ')' | '(' Expr ')'
//
// '^' est replié à gauche APRÈS * / % : 2^3^2 = (2^3)^2 = 64, 2*3^2 = (2*3)^2 = 36.
// Chaque jeton est consommé une fois, dans l’ordre ; la ligne doit finir exactement sur End.
//
// Seule l’imbrication (parenthèse, appel, signe unaire) creuse la pile ici. Les chaînes
// repliées à gauche (1+1+…+1) sont des boucles, sans limite de longueur.

use super::decimal::{Decimal, PRECISION};
use super::erreur::ParseError;
use super::expr::{BinaryOp, Expr, UnaryOp};
use super::jetons::{Token, TokenKind};

/// Imbrications maximales : un niveau par parenthèse, appel de fonction ou signe unaire.
pub const PROFONDEUR_MAX: usize = 256;

// lu au-delà de la fin d’une séquence sans End
static FIN: Token = Token {
    kind: TokenKind::End,
    texte: String::new(),
};

pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    imbrication: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            imbrication: 0,
        }
    }

    pub fn parse(mut self) -> Result<Expr, ParseError> {
        let expr = self.expression()?;
        if self.courant().kind != TokenKind::End {
            // reste non absorbé (ex: 2^3*4)
            return Err(ParseError::InvalidInput);
        }
        log::trace!("arbre : {} jetons", self.pos + 1);
        Ok(expr)
    }

    fn courant(&self) -> &'a Token {
        self.tokens.get(self.pos).unwrap_or(&FIN)
    }

    fn avancer(&mut self) {
        self.pos += 1;
    }

    fn entrer(&mut self) -> Result<(), ParseError> {
        self.imbrication += 1;
        if self.imbrication > PROFONDEUR_MAX {
            return Err(ParseError::TooDeep);
        }
        Ok(())
    }

    fn sortir(&mut self) {
        self.imbrication -= 1;
    }

    fn fermer(&mut self) -> Result<(), ParseError> {
        if self.courant().kind != TokenKind::CloseParen {
            return Err(ParseError::MismatchedParentheses);
        }
        self.avancer();
        Ok(())
    }

    fn expression(&mut self) -> Result<Expr, ParseError> {
        let mut gauche = self.terme()?;

        loop {
            let op = match self.courant().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Subtract,
                _ => break,
            };
            self.avancer();
            let droite = self.terme()?;
            gauche = Expr::binary(op, gauche, droite);
        }

        Ok(gauche)
    }

    fn terme(&mut self) -> Result<Expr, ParseError> {
        let mut gauche = self.facteur()?;

        loop {
            let op = match self.courant().kind {
                TokenKind::Multiply => BinaryOp::Multiply,
                TokenKind::Divide => BinaryOp::Divide,
                TokenKind::Modulus => BinaryOp::Modulus,
                _ => break,
            };
            self.avancer();
            let droite = self.facteur()?;
            gauche = Expr::binary(op, gauche, droite);
        }

        // puis la chaîne de ^, sur le côté gauche déjà réduit
        while self.courant().kind == TokenKind::Power {
            self.avancer();
            let droite = self.facteur()?;
            gauche = Expr::binary(BinaryOp::Power, gauche, droite);
        }

        Ok(gauche)
    }

    fn facteur(&mut self) -> Result<Expr, ParseError> {
        let tok = self.courant();

        match tok.kind {
            TokenKind::Minus | TokenKind::Plus => {
                self.avancer();
                let op = if tok.kind == TokenKind::Minus {
                    UnaryOp::Negate
                } else {
                    UnaryOp::Identity
                };
                self.entrer()?;
                let x = self.facteur()?;
                self.sortir();
                Ok(Expr::unary(op, x))
            }

            TokenKind::Number => {
                self.avancer();
                let v: Decimal = tok
                    .texte
                    .parse()
                    .map_err(|_| ParseError::InvalidNumber(tok.texte.clone()))?;
                Ok(Expr::Number(v.arrondir(PRECISION)))
            }

            TokenKind::Constant => {
                self.avancer();
                Ok(Expr::Constant(tok.texte.clone()))
            }

            TokenKind::Function => {
                self.avancer();
                if self.courant().kind != TokenKind::OpenParen {
                    return Err(ParseError::MissingFunctionArgument);
                }
                self.avancer();
                self.entrer()?;
                let arg = self.expression()?;
                self.fermer()?;
                self.sortir();
                Ok(Expr::call(tok.texte.clone(), arg))
            }

            TokenKind::OpenParen => {
                self.avancer();
                self.entrer()?;
                let e = self.expression()?;
                self.fermer()?;
                self.sortir();
                Ok(e)
            }

            _ => Err(ParseError::InvalidInput),
        }
    }
}
