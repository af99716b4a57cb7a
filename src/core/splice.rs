// =============================================================================
// SPLICE — Insertion de blocs de texte à des ancres du document
// =============================================================================
//
// Le document de base (l'ontologie Turtle) n'est PAS analysé : c'est une
// suite de lignes opaques, sauf deux lignes d'ancrage connues à l'avance.
//
//   ligne i       ###  http://.../tnm-lung-olivier.owl#EvalPatient   ← ancre
//   ligne i+1     ...
//   ligne i+2     ...
//   ligne i+3     ◀── le bloc est inséré ICI (décalage +3)
//
// Règle de reconnaissance d'une ancre : la ligne, débarrassée de ses blancs
// en tête et en fin, est ÉGALE au texte de l'ancre. Cette règle vit en un
// seul endroit (Anchor::locate).
//
// Toutes les opérations sont des fonctions : elles prennent un document et
// en retournent un NOUVEAU. Les lignes hors du bloc inséré sont recopiées
// octet pour octet.
//
// =============================================================================

use crate::error::{ConvertError, Result};

/// Séparateur entre deux fragments consécutifs d'un même bloc
pub const FRAGMENT_SEPARATOR: &str = "\n\n\n";

/// Une ancre : le texte exact d'une ligne + le décalage d'insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub text: String,
    pub offset: usize,
}

impl Anchor {
    pub fn new(text: &str, offset: usize) -> Self {
        Anchor {
            text: text.to_string(),
            offset,
        }
    }

    /// Index (à partir de 0) de la première ligne qui correspond à l'ancre.
    pub fn locate(&self, document: &str) -> Option<usize> {
        find_anchor_line(document, &self.text)
    }
}

/// Résultat d'une insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spliced {
    pub document: String,
    /// Ligne de l'ancre dans le document d'origine
    pub anchor_line: usize,
    /// Ligne où commence le bloc dans le nouveau document
    pub insertion_line: usize,
}

/// Cherche la première ligne dont le contenu, sans les blancs autour, est
/// exactement `exact`.
pub fn find_anchor_line(document: &str, exact: &str) -> Option<usize> {
    document.split('\n').position(|line| line.trim() == exact)
}

/// Insère `block` comme UNE nouvelle ligne à l'index `anchor_index + offset`.
///
/// Le bloc peut contenir ses propres retours à la ligne. Un index au-delà de
/// la fin du document revient à ajouter le bloc à la fin.
pub fn insert_block_after_offset(
    document: &str,
    anchor_index: usize,
    offset: usize,
    block: &str,
) -> String {
    let lines: Vec<&str> = document.split('\n').collect();
    let at = (anchor_index + offset).min(lines.len());

    let mut out: Vec<&str> = Vec::with_capacity(lines.len() + 1);
    out.extend_from_slice(&lines[..at]);
    out.push(block);
    out.extend_from_slice(&lines[at..]);
    out.join("\n")
}

/// Localise l'ancre puis insère le bloc. Une ancre absente est fatale :
/// on n'insère jamais "au hasard" en tête ou en fin de document.
pub fn splice_at_anchor(document: &str, anchor: &Anchor, block: &str) -> Result<Spliced> {
    let anchor_line = anchor
        .locate(document)
        .ok_or_else(|| ConvertError::AnchorNotFound {
            anchor: anchor.text.clone(),
        })?;

    let line_count = document.split('\n').count();
    let insertion_line = (anchor_line + anchor.offset).min(line_count);

    Ok(Spliced {
        document: insert_block_after_offset(document, anchor_line, anchor.offset, block),
        anchor_line,
        insertion_line,
    })
}

/// Assemble des fragments en un seul bloc, dans l'ordre donné.
pub fn join_fragments<I, S>(fragments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut block = String::new();
    for (i, fragment) in fragments.into_iter().enumerate() {
        if i > 0 {
            block.push_str(FRAGMENT_SEPARATOR);
        }
        block.push_str(fragment.as_ref());
    }
    block
}
