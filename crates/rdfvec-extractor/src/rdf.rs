//! RDF reader
//!
//! Detects the serialization of an ontology file and parses it into
//! owned [`RdfTriple`] values. Named graphs are flattened; only the
//! subject, predicate and object of each quad are kept.

use std::path::Path;

use oxrdf::{Subject, Term};
use oxrdfio::{RdfFormat, RdfParser};
use tracing::debug;

use rdfvec_core::{RdfNode, RdfTriple, RdfVecError, Result};

/// Map a file extension to an RDF format
pub fn format_from_extension(ext: &str) -> Option<RdfFormat> {
    match ext.to_lowercase().as_str() {
        "ttl" | "turtle" => Some(RdfFormat::Turtle),
        "nt" => Some(RdfFormat::NTriples),
        "nq" => Some(RdfFormat::NQuads),
        "trig" => Some(RdfFormat::TriG),
        "n3" => Some(RdfFormat::N3),
        "owl" | "rdf" | "xml" => Some(RdfFormat::RdfXml),
        _ => None,
    }
}

/// Guess the format from the first bytes of a document
pub fn format_from_content(content: &[u8]) -> RdfFormat {
    let start = content
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(content.len());
    let head = &content[start..];

    if head.starts_with(b"<?xml") || head.starts_with(b"<rdf:RDF") {
        RdfFormat::RdfXml
    } else {
        RdfFormat::Turtle
    }
}

/// Pick a format for `path`, falling back to content sniffing
pub fn detect_format(path: &Path, content: &[u8]) -> RdfFormat {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(format_from_extension)
        .unwrap_or_else(|| format_from_content(content))
}

/// Read and parse an RDF file
pub fn read_triples(path: &Path) -> Result<Vec<RdfTriple>> {
    let content = std::fs::read(path)?;
    let format = detect_format(path, &content);
    debug!("Parsing {} as {format:?}", path.display());

    parse_triples(&content, format).map_err(|message| RdfVecError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

/// Parse an in-memory document in a known format
pub fn parse_triples(
    content: &[u8],
    format: RdfFormat,
) -> std::result::Result<Vec<RdfTriple>, String> {
    let mut triples = Vec::new();

    for quad in RdfParser::from_format(format).for_reader(content) {
        let quad = quad.map_err(|e| e.to_string())?;

        let Some(subject) = subject_node(&quad.subject) else {
            continue;
        };
        let Some(object) = object_node(&quad.object) else {
            continue;
        };

        triples.push(RdfTriple::new(subject, quad.predicate.as_str(), object));
    }

    Ok(triples)
}

// Quoted triples (RDF-star) are skipped.
#[allow(unreachable_patterns)]
fn subject_node(subject: &Subject) -> Option<RdfNode> {
    match subject {
        Subject::NamedNode(node) => Some(RdfNode::Iri(node.as_str().to_string())),
        Subject::BlankNode(node) => Some(RdfNode::Blank(node.as_str().to_string())),
        _ => None,
    }
}

#[allow(unreachable_patterns)]
fn object_node(object: &Term) -> Option<RdfNode> {
    match object {
        Term::NamedNode(node) => Some(RdfNode::Iri(node.as_str().to_string())),
        Term::BlankNode(node) => Some(RdfNode::Blank(node.as_str().to_string())),
        Term::Literal(literal) => Some(RdfNode::Literal(literal.value().to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TURTLE: &str = r#"
@prefix obo: <http://purl.obolibrary.org/obo/> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .

obo:GO_0000001 rdfs:subClassOf obo:GO_0000002 ;
    rdfs:label "mitochondrion inheritance" .
obo:GO_0000002 rdfs:subClassOf [ rdfs:label "anonymous" ] .
"#;

    const RDF_XML: &str = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
         xmlns:owl="http://www.w3.org/2002/07/owl#">
  <owl:Class rdf:about="http://purl.obolibrary.org/obo/HP_0000001">
    <rdfs:subClassOf rdf:resource="http://purl.obolibrary.org/obo/HP_0000002"/>
  </owl:Class>
</rdf:RDF>
"#;

    #[test]
    fn test_format_detection() {
        assert_eq!(format_from_extension("owl"), Some(RdfFormat::RdfXml));
        assert_eq!(format_from_extension("TTL"), Some(RdfFormat::Turtle));
        assert_eq!(format_from_extension("nt"), Some(RdfFormat::NTriples));
        assert_eq!(format_from_extension("obo"), None);

        assert_eq!(format_from_content(b"  \n<?xml version"), RdfFormat::RdfXml);
        assert_eq!(format_from_content(b"<rdf:RDF>"), RdfFormat::RdfXml);
        assert_eq!(format_from_content(b"@prefix x: <y> ."), RdfFormat::Turtle);

        assert_eq!(
            detect_format(Path::new("ontology.data"), RDF_XML.as_bytes()),
            RdfFormat::RdfXml
        );
    }

    #[test]
    fn test_parse_turtle() {
        let triples = parse_triples(TURTLE.as_bytes(), RdfFormat::Turtle).unwrap();
        assert_eq!(triples.len(), 4);

        let literals = triples
            .iter()
            .filter(|t| matches!(t.object, RdfNode::Literal(_)))
            .count();
        assert_eq!(literals, 2);
        assert!(triples
            .iter()
            .any(|t| matches!(t.subject, RdfNode::Blank(_))
                || matches!(t.object, RdfNode::Blank(_))));
    }

    #[test]
    fn test_read_rdf_xml_file() {
        let mut file = tempfile::Builder::new().suffix(".owl").tempfile().unwrap();
        file.write_all(RDF_XML.as_bytes()).unwrap();

        let triples = read_triples(file.path()).unwrap();
        assert_eq!(triples.len(), 2);
        assert!(triples.iter().any(|t| t.subject
            == RdfNode::Iri("http://purl.obolibrary.org/obo/HP_0000001".to_string())
            && t.object
                == RdfNode::Iri("http://purl.obolibrary.org/obo/HP_0000002".to_string())));
    }

    #[test]
    fn test_parse_error_carries_path() {
        let mut file = tempfile::Builder::new().suffix(".ttl").tempfile().unwrap();
        file.write_all(b"this is not turtle <<<").unwrap();

        let err = read_triples(file.path()).unwrap_err();
        match err {
            RdfVecError::Parse { path, .. } => assert_eq!(path, file.path()),
            other => panic!("unexpected error: {other}"),
        }
    }
}
