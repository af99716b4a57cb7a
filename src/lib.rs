// =============================================================================
// LUNGOWL — Conversion de dossiers cliniques TNM en fragments d'ontologie
// =============================================================================
//
// Lungowl lit un jeu de données tabulaire (patients atteints d'un cancer du
// poumon), traduit chaque ligne dans le vocabulaire de l'ontologie TNM, puis
// insère les classes et individus générés dans un document OWL (Turtle)
// existant, à deux points d'ancrage textuels.
//
// Architecture :
//   core/     → Le cœur pur (vocabulaire, dossiers, validation, épissage)
//   backend/  → Rendu des fragments (Turtle)
//   source    → Lecture du CSV (encodages hérités tolérés)
//   config    → Chemins, colonnes, ancres, politique de localisation
//   pipeline  → Enchaînement complet : lire → rendre → insérer → écrire
//
// =============================================================================

pub mod core;
pub mod backend;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod source;

pub use error::{ConvertError, Result};
