// =============================================================================
// VOCABULARY — Traduction des valeurs brutes en jetons de l'ontologie
// =============================================================================
//
// Les colonnes du jeu de données sont saisies à la main et donc incohérentes :
//   - la localisation est un texte libre ("Left Lower Lung", "  Right Upper Lung ")
//   - les stades TNM portent parfois un préfixe pathologique ("pT2", "pM0")
//   - la taille de la tumeur peut manquer
//
// Ce module les ramène à un vocabulaire FIXE de noms de classes de l'ontologie.
// Toutes les fonctions sont pures : même entrée → même jeton.
//
// ANALOGIE : c'est le "dictionnaire" entre le monde du tableur et le monde
// OWL. Rien ici ne connaît le format Turtle ni le document de base.
//
// =============================================================================

use std::fmt;
use std::num::ParseFloatError;

/// Catégorie de taille de la tumeur primitive.
///
/// Six catégories disjointes et contiguës, bornes inférieures incluses :
/// `[0, 2[`, `[2, 3[`, `[3, 5[`, `[5, 7[`, `[7, ∞[`, plus la taille inconnue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeBucket {
    /// Pas de mesure dans le dossier
    Unknown,
    /// Strictement moins de 2 cm
    Smaller2cm,
    /// De 2 cm (inclus) à 3 cm (exclu)
    Between2cm3cm,
    /// De 3 cm (inclus) à 5 cm (exclu)
    Between3cm5cm,
    /// De 5 cm (inclus) à 7 cm (exclu)
    Between5cm7cm,
    /// 7 cm et plus
    Greater7cm,
}

impl SizeBucket {
    /// Nom de la classe correspondante dans l'ontologie
    pub fn token(&self) -> &'static str {
        match self {
            SizeBucket::Unknown => "TumorSizeUnknown",
            SizeBucket::Smaller2cm => "TumorSmaller2cm",
            SizeBucket::Between2cm3cm => "TumorBetween2cm3cm",
            SizeBucket::Between3cm5cm => "TumorBetween3cm5cm",
            SizeBucket::Between5cm7cm => "TumorBetween5cm7cm",
            SizeBucket::Greater7cm => "TumorGreater7cm",
        }
    }
}

impl fmt::Display for SizeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Traduit une localisation en texte libre vers un nom de classe.
///
/// Le texte est découpé sur les blancs ASCII (les blancs répétés sont
/// absorbés). L'espace insécable U+00A0 reste collé au mot.
/// Il faut EXACTEMENT trois mots `[A, B, C]`, sinon on retourne `None`.
/// Le résultat est la concaténation positionnelle `B + C + "Of" + A + "Lung"` :
///
/// ```text
/// "Left Lower Lung"  →  "LowerLungOfLeftLung"
/// ```
///
/// Aucune vérification n'est faite contre un vocabulaire connu.
pub fn map_location(raw: &str) -> Option<String> {
    let parts: Vec<&str> = raw.split_ascii_whitespace().collect();
    match parts.as_slice() {
        [side, lobe, organ] => Some(format!("{}{}Of{}Lung", lobe, organ, side)),
        _ => None,
    }
}

/// Nettoie un code de stade TNM.
///
/// ATTENTION : TOUS les caractères `p` sont retirés, pas seulement le préfixe
/// ("mp0" → "m0"). Le comportement historique est conservé tel quel.
pub fn clean_stage(raw: &str) -> String {
    raw.replace('p', "")
}

/// Lit la taille de la tumeur (en cm).
///
/// Chaîne vide → `Ok(None)`. Sinon la valeur (blancs autour ignorés) doit
/// être un flottant ; une erreur de lecture est remontée à l'appelant, qui
/// l'escalade en erreur fatale.
pub fn clean_size(raw: &str) -> Result<Option<f64>, ParseFloatError> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.trim().parse::<f64>().map(Some)
}

/// Range une taille dans sa catégorie.
///
/// Une taille NaN n'appartient à aucun intervalle : on la considère inconnue.
pub fn size_bucket(size: Option<f64>) -> SizeBucket {
    match size {
        None => SizeBucket::Unknown,
        Some(s) if s.is_nan() => SizeBucket::Unknown,
        Some(s) if s < 2.0 => SizeBucket::Smaller2cm,
        Some(s) if s < 3.0 => SizeBucket::Between2cm3cm,
        Some(s) if s < 5.0 => SizeBucket::Between3cm5cm,
        Some(s) if s < 7.0 => SizeBucket::Between5cm7cm,
        Some(_) => SizeBucket::Greater7cm,
    }
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_location() {
        assert_eq!(map_location("Left Lower Lung").as_deref(), Some("LowerLungOfLeftLung"));
        assert_eq!(
            map_location("  Right   Upper   Lung  ").as_deref(),
            Some("UpperLungOfRightLung")
        );
        assert_eq!(map_location("Right\tMiddle Lung").as_deref(), Some("MiddleLungOfRightLung"));
    }

    #[test]
    fn test_map_location_wrong_arity() {
        assert_eq!(map_location("Lung"), None);
        assert_eq!(map_location(""), None);
        assert_eq!(map_location("Left Lower Lobe Lung"), None);
    }

    #[test]
    fn test_map_location_keeps_non_breaking_space() {
        // 0xA0 en Latin-1 : ce n'est pas un séparateur
        assert_eq!(map_location("Left\u{a0}Lower Lung"), None);
        assert_eq!(
            map_location("Left Lower\u{a0}X Lung").as_deref(),
            Some("Lower\u{a0}XLungOfLeftLung")
        );
    }

    #[test]
    fn test_clean_stage_removes_every_p() {
        assert_eq!(clean_stage("pT2"), "T2");
        assert_eq!(clean_stage("mp0"), "m0");
        assert_eq!(clean_stage("pM1a"), "M1a");
        assert_eq!(clean_stage(""), "");
        // Seul le 'p' minuscule est visé
        assert_eq!(clean_stage("PN1"), "PN1");
    }

    #[test]
    fn test_clean_size() {
        assert_eq!(clean_size(""), Ok(None));
        assert_eq!(clean_size("4.5"), Ok(Some(4.5)));
        assert_eq!(clean_size(" 3 "), Ok(Some(3.0)));
        assert!(clean_size("abc").is_err());
        assert!(clean_size("  ").is_err());
    }

    #[test]
    fn test_size_bucket_boundaries() {
        assert_eq!(size_bucket(None), SizeBucket::Unknown);
        assert_eq!(size_bucket(Some(0.0)), SizeBucket::Smaller2cm);
        assert_eq!(size_bucket(Some(1.99)), SizeBucket::Smaller2cm);
        assert_eq!(size_bucket(Some(2.0)), SizeBucket::Between2cm3cm);
        assert_eq!(size_bucket(Some(3.0)), SizeBucket::Between3cm5cm);
        assert_eq!(size_bucket(Some(4.99)), SizeBucket::Between3cm5cm);
        assert_eq!(size_bucket(Some(5.0)), SizeBucket::Between5cm7cm);
        assert_eq!(size_bucket(Some(7.0)), SizeBucket::Greater7cm);
        assert_eq!(size_bucket(Some(120.0)), SizeBucket::Greater7cm);
        assert_eq!(size_bucket(Some(f64::NAN)), SizeBucket::Unknown);
    }

    #[test]
    fn test_size_bucket_is_monotonic() {
        // Parcourir [0, 10[ par pas de 0.25 : les catégories ne reculent jamais
        let order = [
            SizeBucket::Smaller2cm,
            SizeBucket::Between2cm3cm,
            SizeBucket::Between3cm5cm,
            SizeBucket::Between5cm7cm,
            SizeBucket::Greater7cm,
        ];
        let mut last = 0;
        for step in 0..40 {
            let bucket = size_bucket(Some(step as f64 * 0.25));
            let rank = order.iter().position(|b| *b == bucket).unwrap();
            assert!(rank >= last);
            last = rank;
        }
        assert_eq!(last, order.len() - 1);
    }

    #[test]
    fn test_bucket_tokens() {
        assert_eq!(SizeBucket::Unknown.to_string(), "TumorSizeUnknown");
        assert_eq!(SizeBucket::Between3cm5cm.to_string(), "TumorBetween3cm5cm");
    }
}
