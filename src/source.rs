// =============================================================================
// SOURCE — Lecture du jeu de données tabulaire
// =============================================================================
//
// Les fichiers historiques ne sont pas en UTF-8 strict : on décode d'abord
// les octets avec l'encodage configuré (Latin-1 par défaut), puis on lit le
// CSV. La première ligne est l'en-tête, chaque ligne suivante devient une
// RawRecord dans l'ordre du fichier.
//
//   octets ──decode──▶ texte ──csv──▶ [RawRecord, RawRecord, ...]
//
// Latin-1 est décodé au sens strict (ISO-8859-1) : l'octet 0x92 devient
// U+0092, et non '’' comme en windows-1252. Les étiquettes WHATWG "latin1"
// et "iso-8859-1" désignent windows-1252, on les intercepte donc avant.
//
// =============================================================================

use std::path::Path;

use encoding_rs::Encoding;

use crate::core::record::RawRecord;
use crate::error::{ConvertError, Result};

/// Étiquette d'encodage utilisée quand rien n'est configuré
pub const DEFAULT_ENCODING: &str = "latin1";

/// Étiquettes lues comme ISO-8859-1 strict
const LATIN1_LABELS: &[&str] = &[
    "latin1",
    "latin-1",
    "l1",
    "iso-8859-1",
    "iso8859-1",
    "iso_8859-1",
    "iso88591",
];

/// L'encodage du fichier d'entrée
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEncoding {
    /// ISO-8859-1 : chaque octet est le point de code de même valeur
    Latin1,
    /// Tout autre encodage connu de WHATWG (UTF-8, windows-1252...)
    Whatwg(&'static Encoding),
}

impl InputEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            InputEncoding::Latin1 => "ISO-8859-1",
            InputEncoding::Whatwg(encoding) => encoding.name(),
        }
    }
}

/// Résout une étiquette d'encodage ("latin1", "utf-8", "windows-1252"...).
pub fn resolve_encoding(label: &str) -> Result<InputEncoding> {
    let label = label.trim();
    if LATIN1_LABELS.iter().any(|l| l.eq_ignore_ascii_case(label)) {
        return Ok(InputEncoding::Latin1);
    }
    Encoding::for_label(label.as_bytes())
        .map(InputEncoding::Whatwg)
        .ok_or_else(|| ConvertError::UnknownEncoding(label.to_string()))
}

/// Décode des octets sans jamais échouer : les séquences invalides sont
/// remplacées, et un BOM éventuel est respecté (sauf en Latin-1, où tout
/// octet est un caractère).
pub fn decode(bytes: &[u8], encoding: InputEncoding) -> String {
    match encoding {
        InputEncoding::Latin1 => encoding_rs::mem::decode_latin1(bytes).into_owned(),
        InputEncoding::Whatwg(encoding) => {
            let (text, used, had_errors) = encoding.decode(bytes);
            if had_errors {
                tracing::warn!(encoding = used.name(), "séquences invalides remplacées au décodage");
            }
            text.into_owned()
        }
    }
}

/// Lit les lignes d'un CSV déjà décodé.
///
/// Les colonnes en trop sont ignorées ; une ligne trop courte n'a tout
/// simplement pas les dernières colonnes (l'erreur vient plus tard, si une
/// colonne utile manque).
pub fn parse_records(text: &str) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    tracing::debug!(columns = headers.len(), "en-tête CSV lu");

    reader
        .records()
        .map(|result| -> Result<RawRecord> {
            let record = result?;
            Ok(headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.to_string(), v.to_string()))
                .collect())
        })
        .collect()
}

/// Lit et décode le fichier CSV complet.
pub fn read_records(path: &Path, encoding: InputEncoding) -> Result<Vec<RawRecord>> {
    let bytes = std::fs::read(path).map_err(|e| ConvertError::io(path, e))?;
    let text = decode(&bytes, encoding);
    let records = parse_records(&text)?;
    tracing::info!(
        path = %path.display(),
        encoding = encoding.name(),
        rows = records.len(),
        "jeu de données lu"
    );
    Ok(records)
}
