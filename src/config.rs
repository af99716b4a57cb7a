// =============================================================================
// CONFIG — Paramètres de la conversion
// =============================================================================
//
// Tout est optionnel : une section ou une clé manquante donne les valeurs
// historiques (jeu BMC, ontologie tnm-2020.owl, ancres TNM poumon).
//
//   --config donné      →  read_config : le fichier DOIT exister
//   --config absent     →  load_config(DEFAULT_CONFIG) : défauts si absent
//
// =============================================================================

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::backend::turtle::{Namespace, DEFAULT_IRI, DEFAULT_PREFIX, UNMAPPED_SENTINEL};
use crate::core::record::ColumnNames;
use crate::core::splice::Anchor;
use crate::error::{ConvertError, Result};
use crate::source::DEFAULT_ENCODING;

/// Fichier lu quand aucun --config n'est passé
pub const DEFAULT_CONFIG: &str = "lungowl.toml";

pub const DEFAULT_INPUT: &str = "bmc_cancer_staging_dataset.csv";
pub const DEFAULT_ONTOLOGY: &str = "tnm-2020.owl";
pub const DEFAULT_OUTPUT: &str = "tnm_2020_eval.owl";

pub const DEFAULT_CLASS_OFFSET: usize = 3;
pub const DEFAULT_INDIVIDUAL_ANCHOR: &str = "#    Individuals";
pub const DEFAULT_INDIVIDUAL_OFFSET: usize = 2;

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub columns: ColumnNames,
    pub input: InputConfig,
    pub ontology: OntologyConfig,
    pub mapping: MappingConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    pub input: PathBuf,
    pub ontology: PathBuf,
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            input: DEFAULT_INPUT.into(),
            ontology: DEFAULT_ONTOLOGY.into(),
            output: DEFAULT_OUTPUT.into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Étiquette de l'encodage du CSV ("latin1" = ISO-8859-1 strict)
    pub encoding: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            encoding: DEFAULT_ENCODING.into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct OntologyConfig {
    pub iri: String,
    pub prefix: String,
    /// Ancre des classes ; dérivée de l'IRI si absente
    pub class_anchor: Option<String>,
    pub class_offset: usize,
    pub individual_anchor: String,
    pub individual_offset: usize,
}

impl Default for OntologyConfig {
    fn default() -> Self {
        OntologyConfig {
            iri: DEFAULT_IRI.into(),
            prefix: DEFAULT_PREFIX.into(),
            class_anchor: None,
            class_offset: DEFAULT_CLASS_OFFSET,
            individual_anchor: DEFAULT_INDIVIDUAL_ANCHOR.into(),
            individual_offset: DEFAULT_INDIVIDUAL_OFFSET,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MappingConfig {
    /// Une localisation non traduisible devient une erreur fatale
    pub strict_locations: bool,
    pub unmapped_sentinel: String,
}

impl Default for MappingConfig {
    fn default() -> Self {
        MappingConfig {
            strict_locations: false,
            unmapped_sentinel: UNMAPPED_SENTINEL.into(),
        }
    }
}

/// Que faire d'une localisation qui ne se traduit pas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationPolicy {
    /// Écrire le jeton sentinelle et continuer
    Sentinel,
    /// Interrompre la conversion
    Strict,
}

impl Config {
    pub fn location_policy(&self) -> LocationPolicy {
        if self.mapping.strict_locations {
            LocationPolicy::Strict
        } else {
            LocationPolicy::Sentinel
        }
    }

    pub fn namespace(&self) -> Namespace {
        Namespace {
            iri: self.ontology.iri.clone(),
            prefix: self.ontology.prefix.clone(),
        }
    }

    pub fn class_anchor(&self) -> Anchor {
        let text = self
            .ontology
            .class_anchor
            .clone()
            .unwrap_or_else(|| format!("###  {}EvalPatient", self.ontology.iri));
        Anchor::new(&text, self.ontology.class_offset)
    }

    pub fn individual_anchor(&self) -> Anchor {
        Anchor::new(&self.ontology.individual_anchor, self.ontology.individual_offset)
    }

    /// Vérifications de base avant de lancer la conversion
    pub fn validate(&self) -> Result<()> {
        if self.ontology.individual_anchor.trim().is_empty() {
            return Err(ConvertError::Config("l'ancre des individus est vide".into()));
        }
        if self.class_anchor().text.trim().is_empty() {
            return Err(ConvertError::Config("l'ancre des classes est vide".into()));
        }
        if self.ontology.prefix.trim().is_empty() {
            return Err(ConvertError::Config("le préfixe de l'ontologie est vide".into()));
        }
        Ok(())
    }
}

pub fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).map_err(|e| ConvertError::Config(e.to_string()))
}

/// Lit un fichier de configuration explicitement demandé ; son absence est
/// une erreur.
pub fn read_config(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
    parse_config(&contents)
}

/// Charge la configuration implicite ; un fichier absent donne les valeurs
/// par défaut.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "pas de configuration, valeurs par défaut");
        return Ok(Config::default());
    }
    read_config(path)
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.paths.input, PathBuf::from(DEFAULT_INPUT));
        assert_eq!(config.paths.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(config.input.encoding, "latin1");
        assert_eq!(config.location_policy(), LocationPolicy::Sentinel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_anchors() {
        let config = Config::default();
        let class = config.class_anchor();
        assert_eq!(
            class.text,
            "###  http://smi.stanford.edu/people/dameron/ontology/tnm-lung-olivier.owl#EvalPatient"
        );
        assert_eq!(class.offset, 3);

        let individual = config.individual_anchor();
        assert_eq!(individual.text, "#    Individuals");
        assert_eq!(individual.offset, 2);
    }

    #[test]
    fn test_parse_partial_config() {
        let config = parse_config(
            r#"
            [paths]
            input = "data/cohort.csv"

            [mapping]
            strict_locations = true

            [columns]
            size = "tumor_size_cm"
            "#,
        )
        .unwrap();

        assert_eq!(config.paths.input, PathBuf::from("data/cohort.csv"));
        assert_eq!(config.paths.ontology, PathBuf::from(DEFAULT_ONTOLOGY));
        assert_eq!(config.columns.size, "tumor_size_cm");
        assert_eq!(config.columns.location, "source.location");
        assert_eq!(config.location_policy(), LocationPolicy::Strict);
        assert_eq!(config.mapping.unmapped_sentinel, "None");
    }

    #[test]
    fn test_class_anchor_follows_iri() {
        let config = parse_config(
            r#"
            [ontology]
            iri = "http://example.org/tnm#"
            prefix = "tnm"
            "#,
        )
        .unwrap();
        assert_eq!(config.class_anchor().text, "###  http://example.org/tnm#EvalPatient");
        assert_eq!(config.namespace().prefix, "tnm");
    }

    #[test]
    fn test_invalid_toml() {
        let err = parse_config("[paths\ninput = ").unwrap_err();
        assert!(matches!(err, ConvertError::Config(_)));
    }

    #[test]
    fn test_empty_anchor_rejected() {
        let mut config = Config::default();
        config.ontology.individual_anchor = "   ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_config() {
        let config = load_config(Path::new("/nonexistent/lungowl.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_read_explicit_config_must_exist() {
        let err = read_config(Path::new("/nonexistent/lungowl.toml")).unwrap_err();
        assert!(matches!(err, ConvertError::Io { .. }));
    }

    #[test]
    fn test_read_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[input]\nencoding = \"utf-8\"\n").unwrap();

        let config = read_config(&path).unwrap();
        assert_eq!(config.input.encoding, "utf-8");
        assert_eq!(load_config(&path).unwrap(), config);
    }
}
