// src/noyau/jetons.rs

use super::erreur::LexError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    Plus,
    Minus,
    Multiply,
    Divide,
    Power,
    Modulus,
    OpenParen,
    CloseParen,
    Function,
    Constant,
    End,
}

impl TokenKind {
    /// Fin d’opérande : un opérande collé derrière => opérateur manquant.
    fn ferme_operande(self) -> bool {
        matches!(
            self,
            TokenKind::Number | TokenKind::Constant | TokenKind::CloseParen
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Texte du littéral (nombre, nom de constante ou de fonction) ; vide sinon.
    pub texte: String,
}

impl Token {
    fn new(kind: TokenKind, texte: impl Into<String>) -> Self {
        Self {
            kind,
            texte: texte.into(),
        }
    }

    fn seul(kind: TokenKind) -> Self {
        Self::new(kind, "")
    }
}

/// Tokenize une ligne (tout ou rien).
/// Supporte:
/// - nombres : suite maximale de chiffres et de points (validés à l’analyse)
/// - constantes : e (sauf devant x), pi, phi
/// - fonctions : suite maximale de lettres ASCII (nom vérifié à l’évaluation)
/// - opérateurs + - * / ^ % et parenthèses
///
/// Se termine toujours par un unique jeton End.
pub fn tokenize(s: &str) -> Result<Vec<Token>, LexError> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;
    let mut profondeur: i64 = 0;

    // type du dernier jeton émis
    let mut dernier: Option<TokenKind> = None;
    let colle = |dernier: Option<TokenKind>| -> Result<(), LexError> {
        match dernier {
            Some(k) if k.ferme_operande() => Err(LexError::MissingOperator),
            _ => Ok(()),
        }
    };

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        // Nombre
        if c.is_ascii_digit() || c == '.' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            colle(dernier)?;
            let texte: String = chars[start..i].iter().collect();
            out.push(Token::new(TokenKind::Number, texte));
            dernier = Some(TokenKind::Number);
            continue;
        }

        // Constantes (avant les identifiants) : "e" mais pas "exp"
        let suivant = chars.get(i + 1).copied();
        let constante = if c == 'e' && suivant != Some('x') {
            Some("e")
        } else if c == 'p' && suivant == Some('i') {
            Some("pi")
        } else if c == 'p' && suivant == Some('h') && chars.get(i + 2) == Some(&'i') {
            Some("phi")
        } else {
            None
        };
        if let Some(nom) = constante {
            colle(dernier)?;
            out.push(Token::new(TokenKind::Constant, nom));
            i += nom.len();
            dernier = Some(TokenKind::Constant);
            continue;
        }

        // Fonction : lettres ASCII
        if c.is_ascii_alphabetic() {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_alphabetic() {
                i += 1;
            }
            colle(dernier)?;
            let nom: String = chars[start..i].iter().collect();
            out.push(Token::new(TokenKind::Function, nom));
            dernier = Some(TokenKind::Function);
            continue;
        }

        // Opérateurs + parenthèses
        let kind = match c {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Multiply,
            '/' => TokenKind::Divide,
            '^' => TokenKind::Power,
            '%' => TokenKind::Modulus,
            '(' => {
                colle(dernier)?;
                profondeur += 1;
                TokenKind::OpenParen
            }
            ')' => {
                profondeur -= 1;
                if profondeur < 0 {
                    return Err(LexError::MismatchedParentheses);
                }
                TokenKind::CloseParen
            }
            _ => return Err(LexError::UnknownCharacter(c)),
        };
        out.push(Token::seul(kind));
        dernier = Some(kind);
        i += 1;
    }

    // profondeur > 0 : laissé à l’analyse
    out.push(Token::seul(TokenKind::End));
    Ok(out)
}

/// Format utilitaire (journal) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Token]) -> String {
    let mut out = Vec::new();
    for t in tokens {
        let s = match t.kind {
            TokenKind::Number | TokenKind::Constant | TokenKind::Function => t.texte.clone(),

            TokenKind::Plus => "+".to_string(),
            TokenKind::Minus => "-".to_string(),
            TokenKind::Multiply => "*".to_string(),
            TokenKind::Divide => "/".to_string(),
            TokenKind::Power => "^".to_string(),
            TokenKind::Modulus => "%".to_string(),

            TokenKind::OpenParen => "(".to_string(),
            TokenKind::CloseParen => ")".to_string(),
            TokenKind::End => "⊣".to_string(),
        };
        out.push(s);
    }
    out.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(s: &str) -> Vec<TokenKind> {
        tokenize(s).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn expression_simple() {
        use TokenKind::*;
        assert_eq!(
            kinds("2 + 3.5*(x)"),
            vec![Number, Plus, Number, Multiply, OpenParen, Function, CloseParen, End]
        );
        assert_eq!(tokenize("").unwrap(), vec![Token::seul(End)]);
    }

    #[test]
    fn constantes_et_fonctions() {
        let t = tokenize("exp(e) + pi - phi").unwrap();
        let textes: Vec<&str> = t.iter().map(|t| t.texte.as_str()).collect();
        assert_eq!(textes, ["exp", "", "e", "", "", "pi", "", "phi", ""]);
        assert_eq!(t[0].kind, TokenKind::Function);
        assert_eq!(t[2].kind, TokenKind::Constant);
        assert_eq!(format_tokens(&t), "exp ( e ) + pi - phi ⊣");
    }

    #[test]
    fn e_en_fin_de_ligne() {
        assert_eq!(kinds("2*e"), vec![
            TokenKind::Number,
            TokenKind::Multiply,
            TokenKind::Constant,
            TokenKind::End
        ]);
    }

    #[test]
    fn nombre_mal_forme_garde_son_texte() {
        let t = tokenize("1.2.3").unwrap();
        assert_eq!(t[0].texte, "1.2.3");
    }

    #[test]
    fn operateur_manquant() {
        for s in ["2(3)", "2pi", "pi 2", "(1)(2)", "e pi", "2 sin(1)", "2 3", "eta"] {
            assert_eq!(tokenize(s), Err(LexError::MissingOperator), "{s}");
        }
    }

    #[test]
    fn parentheses() {
        assert_eq!(tokenize("1+2)"), Err(LexError::MismatchedParentheses));
        // ouverte non refermée : acceptée ici
        assert!(tokenize("(1+2").is_ok());
    }

    #[test]
    fn caractere_inconnu() {
        assert_eq!(tokenize("2 $ 3"), Err(LexError::UnknownCharacter('$')));
        assert_eq!(tokenize("π"), Err(LexError::UnknownCharacter('π')));
    }
}
