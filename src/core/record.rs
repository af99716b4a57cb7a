// =============================================================================
// RECORD — Un dossier patient typé et la cohorte numérotée
// =============================================================================
//
// Une ligne brute du CSV est une simple table colonne → texte. En lui
// appliquant le vocabulaire, on obtient un PatientRecord typé :
//
//   ligne brute                              dossier
//   ─────────────────────────────            ─────────────────────────────
//   source.location  = "Left Lower Lung"  →  location = LowerLungOfLeftLung
//   ...stage.mets    = "pM0"              →  m        = "M0"
//   ...maximumdiameter = ""               →  size     = None
//
// Chaque dossier reçoit un numéro `num` (1, 2, 3...) dans l'ordre d'entrée.
// C'est la SEULE clé utilisée pour nommer les entités générées
// (EvalPatient{num}) : deux dossiers ne doivent jamais le partager.
//
// =============================================================================

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use super::vocabulary::{self, SizeBucket};
use crate::error::{ConvertError, Result};

/// Numéro séquentiel d'un dossier (commence à 1).
pub type PatientNum = u64;

/// Une ligne brute : nom de colonne → valeur textuelle.
pub type RawRecord = HashMap<String, String>;

/// Les noms des colonnes du CSV lues pour construire un dossier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub location: String,
    pub metastasis: String,
    pub nodes: String,
    pub primary_tumor: String,
    pub size: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        ColumnNames {
            location: "source.location".into(),
            metastasis: "characteristics.tag.stage.mets".into(),
            nodes: "characteristics.tag.stage.nodes".into(),
            primary_tumor: "characteristics.tag.stage.primary.tumor".into(),
            size: "characteristics.tag.tumor.size.maximumdiameter".into(),
        }
    }
}

/// Localisation anatomique : soit traduite, soit non traduisible.
///
/// On garde le texte brut dans le cas non traduit pour pouvoir le signaler.
/// C'est au moteur de rendu de décider quoi écrire à la place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Mapped(String),
    Unmapped { raw: String },
}

impl Location {
    pub fn from_raw(raw: &str) -> Self {
        match vocabulary::map_location(raw) {
            Some(token) => Location::Mapped(token),
            None => Location::Unmapped { raw: raw.to_string() },
        }
    }

    /// Le jeton de l'ontologie, s'il existe
    pub fn token(&self) -> Option<&str> {
        match self {
            Location::Mapped(token) => Some(token),
            Location::Unmapped { .. } => None,
        }
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, Location::Mapped(_))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Mapped(token) => write!(f, "{}", token),
            Location::Unmapped { raw } => write!(f, "<non traduite: {:?}>", raw),
        }
    }
}

/// Un dossier patient, prêt à être rendu.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientRecord {
    pub num: PatientNum,
    pub location: Location,
    /// Stade M (métastases), nettoyé
    pub m: String,
    /// Stade N (ganglions), nettoyé
    pub n: String,
    /// Stade T (tumeur primitive), nettoyé
    pub t: String,
    /// Taille de la tumeur en cm
    pub size: Option<f64>,
}

impl PatientRecord {
    /// Construit un dossier à partir d'une ligne brute.
    ///
    /// Échoue si une colonne attendue manque ou si la taille n'est pas un
    /// nombre. Une localisation non traduisible n'est PAS une erreur ici.
    pub fn from_raw(raw: &RawRecord, num: PatientNum, columns: &ColumnNames) -> Result<Self> {
        let size_raw = field(raw, num, &columns.size)?;
        let size = vocabulary::clean_size(size_raw).map_err(|source| ConvertError::MalformedSize {
            num,
            column: columns.size.clone(),
            value: size_raw.to_string(),
            source,
        })?;

        Ok(PatientRecord {
            num,
            location: Location::from_raw(field(raw, num, &columns.location)?),
            m: vocabulary::clean_stage(field(raw, num, &columns.metastasis)?),
            n: vocabulary::clean_stage(field(raw, num, &columns.nodes)?),
            t: vocabulary::clean_stage(field(raw, num, &columns.primary_tumor)?),
            size,
        })
    }

    /// Catégorie de taille, calculée à la demande
    pub fn size_bucket(&self) -> SizeBucket {
        vocabulary::size_bucket(self.size)
    }
}

/// Lit une colonne d'une ligne brute ; son absence est fatale.
fn field<'a>(raw: &'a RawRecord, num: PatientNum, column: &str) -> Result<&'a str> {
    raw.get(column)
        .map(String::as_str)
        .ok_or_else(|| ConvertError::MissingColumn {
            row: num,
            column: column.to_string(),
        })
}

/// La cohorte : tous les dossiers, dans l'ordre d'entrée.
///
/// Le compteur `next_num` garantit des numéros 1..N sans trou ni doublon.
#[derive(Debug, Clone)]
pub struct Cohort {
    next_num: PatientNum,
    records: Vec<PatientRecord>,
}

impl Default for Cohort {
    fn default() -> Self {
        Self::new()
    }
}

impl Cohort {
    pub fn new() -> Self {
        Cohort {
            next_num: 1,
            records: Vec::new(),
        }
    }

    /// Construit une cohorte à partir des lignes brutes, dans l'ordre.
    /// La première ligne en erreur interrompt tout.
    pub fn from_raw_records<I>(rows: I, columns: &ColumnNames) -> Result<Self>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let mut cohort = Cohort::new();
        for raw in rows {
            cohort.push_raw(&raw, columns)?;
        }
        Ok(cohort)
    }

    /// Ajoute une ligne brute. Retourne le numéro attribué.
    pub fn push_raw(&mut self, raw: &RawRecord, columns: &ColumnNames) -> Result<PatientNum> {
        let num = self.next_num;
        let record = PatientRecord::from_raw(raw, num, columns)?;
        tracing::debug!(
            num,
            location = %record.location,
            m = %record.m,
            size = ?record.size,
            "dossier traduit"
        );
        self.records.push(record);
        self.next_num += 1;
        Ok(num)
    }

    /// Insère un dossier déjà construit, tel quel : le numéro n'est PAS
    /// réattribué.
    #[cfg(test)]
    pub(crate) fn push_record(&mut self, record: PatientRecord) {
        if record.num >= self.next_num {
            self.next_num = record.num + 1;
        }
        self.records.push(record);
    }

    pub fn records(&self) -> &[PatientRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Dossiers dont la localisation n'a pas pu être traduite
    pub fn unmapped(&self) -> impl Iterator<Item = &PatientRecord> + '_ {
        self.records.iter().filter(|r| !r.location.is_mapped())
    }
}
