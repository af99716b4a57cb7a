// =============================================================================
// CORE — Module principal du cœur de conversion
// =============================================================================
//
// Ce module regroupe toute la logique pure :
// pas de fichiers, pas de CSV — uniquement des chaînes et des dossiers.
//
// Architecture :
//   vocabulary → traduction des valeurs brutes en jetons de l'ontologie
//   record     → un dossier patient typé + la cohorte numérotée
//   validate   → la vérification de cohérence d'une cohorte
//   splice     → la localisation des ancres et l'insertion de blocs
//
// =============================================================================

pub mod vocabulary;
pub mod record;
pub mod validate;
pub mod splice;
