// =============================================================================
// BACKEND TURTLE — Génération de fragments OWL en syntaxe Turtle
// =============================================================================
//
// Correspondance dossier → OWL :
//   - num          → classe EvalPatient{num} + individu EvalPatient{num}Instance
//   - location     → restriction hasLocation someValuesFrom <jeton>
//   - taille       → restriction hasPrimaryTumor someValuesFrom <catégorie>
//   - stade M      → restriction hasMetastasis cardinality "0" ou "1"
//
// Les gabarits reproduisent EXACTEMENT la mise en page historique (y compris
// l'indentation irrégulière de la deuxième ligne du fragment de classe),
// pour que les documents produits restent comparables octet pour octet.
//
// =============================================================================

use crate::backend::{Fragment, FragmentRenderer};
use crate::core::record::{Location, PatientRecord};

/// IRI par défaut de l'ontologie TNM poumon
pub const DEFAULT_IRI: &str = "http://smi.stanford.edu/people/dameron/ontology/tnm-lung-olivier.owl#";
/// Préfixe Turtle par défaut associé à l'IRI
pub const DEFAULT_PREFIX: &str = "tnm-lung-olivier";
/// Ce qui est écrit à la place d'une localisation non traduite
pub const UNMAPPED_SENTINEL: &str = "None";

/// L'espace de noms dans lequel les entités sont déclarées.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    pub iri: String,
    pub prefix: String,
}

impl Default for Namespace {
    fn default() -> Self {
        Namespace {
            iri: DEFAULT_IRI.into(),
            prefix: DEFAULT_PREFIX.into(),
        }
    }
}

/// Backend Turtle — génère les fragments de classe et d'individu
#[derive(Debug, Clone)]
pub struct TurtleRenderer {
    namespace: Namespace,
    unmapped_sentinel: String,
}

impl Default for TurtleRenderer {
    fn default() -> Self {
        Self::new(Namespace::default())
    }
}

impl TurtleRenderer {
    pub fn new(namespace: Namespace) -> Self {
        TurtleRenderer {
            namespace,
            unmapped_sentinel: UNMAPPED_SENTINEL.into(),
        }
    }

    /// Change le jeton écrit pour une localisation non traduite
    pub fn with_unmapped_sentinel(mut self, sentinel: &str) -> Self {
        self.unmapped_sentinel = sentinel.to_string();
        self
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Jeton de localisation à écrire dans la restriction hasLocation
    fn location_token<'a>(&'a self, location: &'a Location) -> &'a str {
        location.token().unwrap_or(self.unmapped_sentinel.as_str())
    }
}

/// Cardinalité de hasMetastasis : "0" si le stade M nettoyé vaut "M0", sinon "1"
pub fn metastasis_cardinality(m: &str) -> &'static str {
    if m == "M0" {
        "0"
    } else {
        "1"
    }
}

impl FragmentRenderer for TurtleRenderer {
    fn render_class(&self, record: &PatientRecord) -> Fragment {
        let iri = &self.namespace.iri;
        let prefix = &self.namespace.prefix;
        let num = record.num;
        let loc = self.location_token(&record.location);
        let size = record.size_bucket().token();
        let metas = metastasis_cardinality(&record.m);

        Fragment::Class(format!(
            r#"###  {iri}EvalPatient{num}
                {prefix}:EvalPatient{num} rdf:type owl:Class ;
                          rdfs:subClassOf {prefix}:EvalPatient ,
                                          [ rdf:type owl:Restriction ;
                                            owl:onProperty {prefix}:hasLocation ;
                                            owl:someValuesFrom {prefix}:{loc}
                                          ] ,
                                          [ rdf:type owl:Restriction ;
                                            owl:onProperty {prefix}:hasPrimaryTumor ;
                                            owl:someValuesFrom {prefix}:{size}
                                          ] ,
                                          [ rdf:type owl:Restriction ;
                                            owl:onProperty {prefix}:hasMetastasis ;
                                            owl:cardinality "{metas}"^^xsd:nonNegativeInteger
                                          ] ."#
        ))
    }

    fn render_individual(&self, record: &PatientRecord) -> Fragment {
        let iri = &self.namespace.iri;
        let prefix = &self.namespace.prefix;
        let num = record.num;

        Fragment::Individual(format!(
            r#"###  {iri}EvalPatient{num}Instance
{prefix}:EvalPatient{num}Instance rdf:type owl:NamedIndividual ,
                                           {prefix}:EvalPatient{num} ."#
        ))
    }

    fn name(&self) -> &str {
        "Turtle"
    }
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn record(num: u64, location: Location, m: &str, size: Option<f64>) -> PatientRecord {
        PatientRecord {
            num,
            location,
            m: m.into(),
            n: "N0".into(),
            t: "T2".into(),
            size,
        }
    }

    #[test]
    fn test_individual_fragment() {
        let renderer = TurtleRenderer::default();
        let rec = record(12, Location::Mapped("LowerLungOfLeftLung".into()), "M0", None);
        let frag = renderer.render_individual(&rec);

        let expected = "###  http://smi.stanford.edu/people/dameron/ontology/tnm-lung-olivier.owl#EvalPatient12Instance\n\
tnm-lung-olivier:EvalPatient12Instance rdf:type owl:NamedIndividual ,\n\
\x20                                          tnm-lung-olivier:EvalPatient12 .";
        assert_eq!(frag.text(), expected);
        assert!(matches!(frag, Fragment::Individual(_)));
    }

    #[test]
    fn test_class_fragment() {
        let renderer = TurtleRenderer::default();
        let rec = record(2, Location::Mapped("UpperLungOfRightLung".into()), "M1", Some(4.5));
        let frag = renderer.render_class(&rec);
        let text = frag.text();

        assert!(text.starts_with(
            "###  http://smi.stanford.edu/people/dameron/ontology/tnm-lung-olivier.owl#EvalPatient2\n"
        ));
        assert!(text.contains("tnm-lung-olivier:EvalPatient2 rdf:type owl:Class ;"));
        assert!(text.contains("rdfs:subClassOf tnm-lung-olivier:EvalPatient ,"));
        assert!(text.contains("owl:someValuesFrom tnm-lung-olivier:UpperLungOfRightLung\n"));
        assert!(text.contains("owl:someValuesFrom tnm-lung-olivier:TumorBetween3cm5cm\n"));
        assert!(text.contains(r#"owl:cardinality "1"^^xsd:nonNegativeInteger"#));
        assert!(text.ends_with("] ."));
        assert_eq!(text.lines().count(), 15);
    }

    #[test]
    fn test_class_fragment_layout() {
        let renderer = TurtleRenderer::default();
        let rec = record(1, Location::Mapped("LowerLungOfLeftLung".into()), "M0", None);
        let frag = renderer.render_class(&rec);
        let lines: Vec<&str> = frag.text().lines().collect();

        assert_eq!(lines[1], "                tnm-lung-olivier:EvalPatient1 rdf:type owl:Class ;");
        assert_eq!(
            lines[13],
            r#"                                            owl:cardinality "0"^^xsd:nonNegativeInteger"#
        );
    }

    #[test]
    fn test_unmapped_location_uses_sentinel() {
        let renderer = TurtleRenderer::default();
        let rec = record(3, Location::Unmapped { raw: "Lung".into() }, "M0", Some(1.0));
        let text = renderer.render_class(&rec).into_text();
        assert!(text.contains("owl:someValuesFrom tnm-lung-olivier:None\n"));

        let custom = TurtleRenderer::default().with_unmapped_sentinel("UnknownLocation");
        let text = custom.render_class(&rec).into_text();
        assert!(text.contains("owl:someValuesFrom tnm-lung-olivier:UnknownLocation\n"));
    }

    #[test]
    fn test_metastasis_cardinality() {
        assert_eq!(metastasis_cardinality("M0"), "0");
        assert_eq!(metastasis_cardinality("M1"), "1");
        assert_eq!(metastasis_cardinality("M1a"), "1");
        assert_eq!(metastasis_cardinality("MX"), "1");
        assert_eq!(metastasis_cardinality(""), "1");
        assert_eq!(metastasis_cardinality("m0"), "1");
    }

    #[test]
    fn test_custom_namespace() {
        let renderer = TurtleRenderer::new(Namespace {
            iri: "http://example.org/tnm#".into(),
            prefix: "tnm".into(),
        });
        let rec = record(5, Location::Mapped("LowerLungOfLeftLung".into()), "M0", None);
        let text = renderer.render_individual(&rec).into_text();
        assert!(text.starts_with("###  http://example.org/tnm#EvalPatient5Instance\n"));
        assert!(text.contains("tnm:EvalPatient5 ."));
        assert_eq!(renderer.name(), "Turtle");
    }
}
