// =============================================================================
// BACKEND — Rendu des dossiers en fragments d'ontologie
// =============================================================================
//
// Le backend traduit un PatientRecord en texte insérable dans l'ontologie.
// Pour chaque dossier on produit DEUX fragments :
//   - un fragment "classe"     : EvalPatient{num} ⊑ EvalPatient ⊓ restrictions
//   - un fragment "individu"   : EvalPatient{num}Instance : EvalPatient{num}
//
// Le cœur (module core) ne connaît JAMAIS la syntaxe de sortie.
// Aujourd'hui seul Turtle est produit, mais le trait permet d'en ajouter.
//
// =============================================================================

pub mod turtle;

use crate::core::record::PatientRecord;

/// Un fragment généré par un backend, rattaché à un seul dossier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Déclaration de classe (EvalPatient{num})
    Class(String),
    /// Déclaration d'individu (EvalPatient{num}Instance)
    Individual(String),
}

impl Fragment {
    pub fn text(&self) -> &str {
        match self {
            Fragment::Class(s) | Fragment::Individual(s) => s,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Fragment::Class(s) | Fragment::Individual(s) => s,
        }
    }
}

impl std::fmt::Display for Fragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text())
    }
}

/// Trait abstrait pour tous les moteurs de rendu.
///
/// Les deux méthodes sont de simples expansions de gabarit : aucune logique
/// conditionnelle hors du calcul de la cardinalité de métastase.
pub trait FragmentRenderer {
    /// Génère le fragment de classe d'un dossier.
    fn render_class(&self, record: &PatientRecord) -> Fragment;

    /// Génère le fragment d'individu d'un dossier.
    fn render_individual(&self, record: &PatientRecord) -> Fragment;

    /// Retourne le nom du backend
    fn name(&self) -> &str;
}
