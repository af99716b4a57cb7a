// =============================================================================
// ERROR — Les erreurs fatales de la conversion
// =============================================================================
//
// Toute erreur de ce type interrompt la conversion ENTIÈRE : aucun fichier
// de sortie n'est écrit. Les défauts "doux" (localisation non traduisible en
// mode tolérant) ne passent pas par ici, ils sont seulement journalisés.
//
// =============================================================================

use std::num::ParseFloatError;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::record::PatientNum;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("dossier {num} : la colonne '{column}' contient '{value}', qui n'est pas un nombre")]
    MalformedSize {
        num: PatientNum,
        column: String,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("ligne d'ancrage introuvable dans l'ontologie : '{anchor}'")]
    AnchorNotFound { anchor: String },

    #[error("dossier {num} : localisation non traduisible '{raw}'")]
    UnmappableLocation { num: PatientNum, raw: String },

    #[error("cohorte incohérente : {0}")]
    InvalidCohort(String),

    #[error("dossier {row} : colonne '{column}' absente")]
    MissingColumn { row: PatientNum, column: String },

    #[error("encodage d'entrée inconnu : '{0}'")]
    UnknownEncoding(String),

    #[error("erreur CSV : {0}")]
    Csv(#[from] csv::Error),

    #[error("erreur d'E/S sur {path} : {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration invalide : {0}")]
    Config(String),
}

impl ConvertError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;
