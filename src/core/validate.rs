// =============================================================================
// VALIDATE — Vérification de cohérence d'une cohorte
// =============================================================================
//
// Ce module vérifie, AVANT le rendu, que la cohorte produira des fragments
// utilisables :
//   - Les numéros forment exactement la suite 1..N, dans l'ordre
//   - Chaque localisation a été traduite en nom de classe
//
// Une localisation non traduite ne bloque pas la conversion par défaut : le
// fragment référencera une entité indéfinie. Le pipeline décide, selon la
// politique configurée, si ces erreurs sont fatales ou seulement signalées.
//
// =============================================================================

use std::collections::HashSet;

use super::record::{Cohort, Location, PatientNum};

/// Nature d'un défaut de validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationKind {
    /// Numéro en double, manquant ou hors séquence
    Numbering,
    /// Localisation non traduite
    UnmappedLocation { raw: String },
}

/// Erreur de validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub num: PatientNum,
    pub kind: ValidationKind,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Validation error: {}", self.message)
    }
}

impl ValidationError {
    pub fn is_numbering(&self) -> bool {
        self.kind == ValidationKind::Numbering
    }
}

/// Vérifie la numérotation de la cohorte.
///
/// Conditions :
/// - Le i-ème dossier (à partir de 1) porte le numéro i
/// - Aucun numéro n'apparaît deux fois
pub fn validate_numbering(cohort: &Cohort) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (i, record) in cohort.records().iter().enumerate() {
        let expected = i as PatientNum + 1;

        if !seen.insert(record.num) {
            errors.push(ValidationError {
                num: record.num,
                kind: ValidationKind::Numbering,
                message: format!("le numéro {} est attribué deux fois", record.num),
            });
        } else if record.num != expected {
            errors.push(ValidationError {
                num: record.num,
                kind: ValidationKind::Numbering,
                message: format!(
                    "position {} : numéro {} attendu, {} trouvé",
                    i + 1,
                    expected,
                    record.num
                ),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Vérifie que chaque localisation a été traduite.
pub fn validate_locations(cohort: &Cohort) -> Result<(), Vec<ValidationError>> {
    let errors: Vec<ValidationError> = cohort
        .records()
        .iter()
        .filter_map(|record| match &record.location {
            Location::Mapped(_) => None,
            Location::Unmapped { raw } => Some(ValidationError {
                num: record.num,
                kind: ValidationKind::UnmappedLocation { raw: raw.clone() },
                message: format!(
                    "dossier {} : la localisation '{}' ne contient pas exactement trois mots",
                    record.num, raw
                ),
            }),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Vérification complète d'une cohorte (numérotation puis localisations).
pub fn validate_cohort(cohort: &Cohort) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = validate_numbering(cohort) {
        errors.extend(e);
    }
    if let Err(e) = validate_locations(cohort) {
        errors.extend(e);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::PatientRecord;

    fn record(num: PatientNum, location: Location) -> PatientRecord {
        PatientRecord {
            num,
            location,
            m: "M0".into(),
            n: "N0".into(),
            t: "T1".into(),
            size: Some(1.0),
        }
    }

    fn mapped() -> Location {
        Location::Mapped("LowerLungOfLeftLung".into())
    }

    #[test]
    fn test_valid_cohort() {
        let mut cohort = Cohort::new();
        cohort.push_record(record(1, mapped()));
        cohort.push_record(record(2, mapped()));
        assert!(validate_cohort(&cohort).is_ok());
    }

    #[test]
    fn test_empty_cohort_is_valid() {
        assert!(validate_cohort(&Cohort::new()).is_ok());
    }

    #[test]
    fn test_duplicate_num() {
        let mut cohort = Cohort::new();
        cohort.push_record(record(1, mapped()));
        cohort.push_record(record(1, mapped()));
        let errors = validate_numbering(&cohort).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("deux fois"));
    }

    #[test]
    fn test_gap_in_numbering() {
        let mut cohort = Cohort::new();
        cohort.push_record(record(1, mapped()));
        cohort.push_record(record(3, mapped()));
        let errors = validate_numbering(&cohort).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].is_numbering());
        assert_eq!(errors[0].num, 3);
    }

    #[test]
    fn test_unmapped_locations_reported() {
        let mut cohort = Cohort::new();
        cohort.push_record(record(1, mapped()));
        cohort.push_record(record(2, Location::Unmapped { raw: "Lung".into() }));
        cohort.push_record(record(3, Location::Unmapped { raw: "".into() }));

        let errors = validate_cohort(&cohort).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].num, 2);
        assert_eq!(
            errors[0].kind,
            ValidationKind::UnmappedLocation { raw: "Lung".into() }
        );
        assert!(errors.iter().all(|e| !e.is_numbering()));
    }
}
