// =============================================================================
// PIPELINE — Enchaînement complet de la conversion
// =============================================================================
//
// Les étapes, strictement séquentielles :
//   1. Lire le CSV et construire la cohorte numérotée
//   2. Vérifier la cohorte (politique de localisation)
//   3. Lire l'ontologie de base
//   4. Rendre les classes   → insérer après l'ancre des classes
//   5. Rendre les individus → insérer après l'ancre des individus, dans le
//      document DÉJÀ modifié par l'étape 4
//   6. Écrire le résultat (seul effet externe, atomique)
//
// Toute erreur interrompt la conversion avant l'étape 6 : pas de fichier
// de sortie partiel.
//
// ATTENTION : la conversion n'est PAS idempotente. Les ancres restent dans
// le document ; relancer sur la sortie insère une seconde copie des fragments.
//
// =============================================================================

use std::io::Write;
use std::path::Path;

use crate::backend::turtle::TurtleRenderer;
use crate::backend::FragmentRenderer;
use crate::config::{Config, LocationPolicy};
use crate::core::record::Cohort;
use crate::core::splice::{self, Anchor, Spliced};
use crate::core::validate::{self, ValidationKind};
use crate::error::{ConvertError, Result};
use crate::source;

/// Bilan d'une conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub records: usize,
    pub unmapped_locations: usize,
    pub class_anchor_line: usize,
    pub individual_anchor_line: usize,
    pub output_lines: usize,
    /// Faux en mode simulation
    pub written: bool,
}

/// Le document final et les positions des insertions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted {
    pub document: String,
    pub class_anchor_line: usize,
    pub individual_anchor_line: usize,
}

/// Le bloc de toutes les classes, dans l'ordre de la cohorte
pub fn render_class_block<R: FragmentRenderer + ?Sized>(cohort: &Cohort, renderer: &R) -> String {
    splice::join_fragments(
        cohort
            .records()
            .iter()
            .map(|r| renderer.render_class(r).into_text()),
    )
}

/// Le bloc de tous les individus, dans l'ordre de la cohorte
pub fn render_individual_block<R: FragmentRenderer + ?Sized>(cohort: &Cohort, renderer: &R) -> String {
    splice::join_fragments(
        cohort
            .records()
            .iter()
            .map(|r| renderer.render_individual(r).into_text()),
    )
}

/// Applique la politique de localisation à la cohorte.
///
/// Retourne le nombre de localisations non traduites (mode sentinelle), ou
/// l'erreur du premier dossier fautif (mode strict). Une numérotation
/// incohérente est toujours fatale.
pub fn check_cohort(cohort: &Cohort, policy: LocationPolicy) -> Result<usize> {
    let errors = match validate::validate_cohort(cohort) {
        Ok(()) => return Ok(0),
        Err(errors) => errors,
    };

    if let Some(e) = errors.iter().find(|e| e.is_numbering()) {
        return Err(ConvertError::InvalidCohort(e.message.clone()));
    }

    let mut unmapped = 0;
    for error in &errors {
        if let ValidationKind::UnmappedLocation { raw } = &error.kind {
            if policy == LocationPolicy::Strict {
                return Err(ConvertError::UnmappableLocation {
                    num: error.num,
                    raw: raw.clone(),
                });
            }
            tracing::warn!(num = error.num, raw = %raw, "localisation non traduite, jeton sentinelle écrit");
            unmapped += 1;
        }
    }
    Ok(unmapped)
}

/// Insère les classes de la cohorte après l'ancre des classes.
pub fn insert_classes<R: FragmentRenderer + ?Sized>(
    document: &str,
    cohort: &Cohort,
    renderer: &R,
    anchor: &Anchor,
) -> Result<Spliced> {
    let block = render_class_block(cohort, renderer);
    splice::splice_at_anchor(document, anchor, &block)
}

/// Insère les individus de la cohorte après l'ancre des individus.
pub fn insert_individuals<R: FragmentRenderer + ?Sized>(
    document: &str,
    cohort: &Cohort,
    renderer: &R,
    anchor: &Anchor,
) -> Result<Spliced> {
    let block = render_individual_block(cohort, renderer);
    splice::splice_at_anchor(document, anchor, &block)
}

/// Les deux insertions, classes d'abord, sans aucune entrée/sortie.
pub fn convert<R: FragmentRenderer + ?Sized>(
    document: &str,
    cohort: &Cohort,
    renderer: &R,
    class_anchor: &Anchor,
    individual_anchor: &Anchor,
) -> Result<Converted> {
    let with_classes = insert_classes(document, cohort, renderer, class_anchor)?;
    tracing::info!(
        backend = renderer.name(),
        records = cohort.len(),
        anchor_line = with_classes.anchor_line,
        insertion_line = with_classes.insertion_line,
        "classes insérées"
    );

    let with_individuals = insert_individuals(&with_classes.document, cohort, renderer, individual_anchor)?;
    tracing::info!(
        anchor_line = with_individuals.anchor_line,
        insertion_line = with_individuals.insertion_line,
        "individus insérés"
    );

    Ok(Converted {
        document: with_individuals.document,
        class_anchor_line: with_classes.anchor_line,
        individual_anchor_line: with_individuals.anchor_line,
    })
}

/// Écrit le document d'un seul coup : fichier temporaire voisin puis
/// renommage. En cas d'échec la cible n'est pas touchée.
pub fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| ConvertError::io(dir, e))?;
    let tmp_path = tmp.path().to_path_buf();
    tmp.write_all(contents.as_bytes())
        .map_err(|e| ConvertError::io(&tmp_path, e))?;
    tmp.flush().map_err(|e| ConvertError::io(&tmp_path, e))?;
    tmp.persist(path).map_err(|e| ConvertError::io(path, e.error))?;
    Ok(())
}

/// Lance la conversion complète décrite par la configuration.
pub fn run(config: &Config, dry_run: bool) -> Result<PipelineReport> {
    config.validate()?;

    let encoding = source::resolve_encoding(&config.input.encoding)?;
    let rows = source::read_records(&config.paths.input, encoding)?;
    let cohort = Cohort::from_raw_records(rows, &config.columns)?;
    if cohort.is_empty() {
        tracing::warn!("aucun dossier dans le jeu de données, une ligne vide sera insérée");
    }

    let unmapped_locations = check_cohort(&cohort, config.location_policy())?;

    let ontology = &config.paths.ontology;
    let document = std::fs::read_to_string(ontology).map_err(|e| ConvertError::io(ontology, e))?;
    tracing::info!(path = %ontology.display(), lines = document.split('\n').count(), "ontologie lue");

    let renderer = TurtleRenderer::new(config.namespace())
        .with_unmapped_sentinel(&config.mapping.unmapped_sentinel);
    let converted = convert(
        &document,
        &cohort,
        &renderer,
        &config.class_anchor(),
        &config.individual_anchor(),
    )?;

    let output_lines = converted.document.split('\n').count();
    if dry_run {
        tracing::info!(lines = output_lines, "simulation : aucun fichier écrit");
    } else {
        write_atomically(&config.paths.output, &converted.document)?;
        tracing::info!(
            path = %config.paths.output.display(),
            bytes = converted.document.len(),
            "ontologie enrichie écrite"
        );
    }

    Ok(PipelineReport {
        records: cohort.len(),
        unmapped_locations,
        class_anchor_line: converted.class_anchor_line,
        individual_anchor_line: converted.individual_anchor_line,
        output_lines,
        written: !dry_run,
    })
}
