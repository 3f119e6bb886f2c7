//! Textual diagrams
//!
//! Fences tagged `mermaid` render as a container for the client-side mermaid
//! script. `plantuml`, `dot` and `ditaa` fences render as an image served by
//! a PlantUML server, with the source deflated and encoded into the URL.

use base64::alphabet::Alphabet;
use base64::engine::general_purpose::NO_PAD;
use base64::engine::GeneralPurpose;
use base64::Engine as _;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use std::io::Write;

use super::escape_html;
use crate::error::{RenderError, RenderResult};

pub const PLANTUML_SERVER: &str = "https://www.plantuml.com/plantuml";
pub const MERMAID_CLASS: &str = "mermaid";
pub const PLANTUML_CLASS: &str = "plantuml";

const PLANTUML_ALPHABET: Alphabet =
    match Alphabet::new("0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz-_") {
        Ok(alphabet) => alphabet,
        Err(_) => panic!("invalid PlantUML alphabet"),
    };

const PLANTUML_ENGINE: GeneralPurpose = GeneralPurpose::new(&PLANTUML_ALPHABET, NO_PAD);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramKind {
    Mermaid,
    PlantUml,
    Dot,
    Ditaa,
}

impl DiagramKind {
    /// Diagram kind for a fence language, if it is one
    pub fn from_language(language: &str) -> Option<Self> {
        match language {
            "mermaid" => Some(DiagramKind::Mermaid),
            "plantuml" => Some(DiagramKind::PlantUml),
            "dot" => Some(DiagramKind::Dot),
            "ditaa" => Some(DiagramKind::Ditaa),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramKind::Mermaid => "mermaid",
            DiagramKind::PlantUml => "plantuml",
            DiagramKind::Dot => "dot",
            DiagramKind::Ditaa => "ditaa",
        }
    }

    /// PlantUML start/end keyword
    fn block_name(&self) -> &'static str {
        match self {
            DiagramKind::Dot => "dot",
            DiagramKind::Ditaa => "ditaa",
            _ => "uml",
        }
    }

    /// ditaa has no SVG output
    fn image_format(&self) -> &'static str {
        match self {
            DiagramKind::Ditaa => "png",
            _ => "svg",
        }
    }
}

/// Render a diagram fence
pub fn render_diagram(kind: DiagramKind, code: &str) -> RenderResult<String> {
    if kind == DiagramKind::Mermaid {
        return Ok(format!(
            "<div class=\"{}\">{}</div>\n",
            MERMAID_CLASS,
            escape_html(code)
        ));
    }

    let name = kind.block_name();
    let source = format!("@start{}\n{}\n@end{}", name, code.trim_end_matches('\n'), name);
    Ok(format!(
        "<img class=\"{}\" src=\"{}/{}/{}\" alt=\"{} diagram\" />\n",
        PLANTUML_CLASS,
        PLANTUML_SERVER,
        kind.image_format(),
        plantuml_encode(&source)?,
        kind.as_str()
    ))
}

/// Deflate `source` and encode it with PlantUML's URL alphabet.
/// The tail is zero-filled to whole 3-byte groups like the reference encoder.
pub fn plantuml_encode(source: &str) -> RenderResult<String> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(source.as_bytes())
        .map_err(|e| RenderError::Diagram(e.to_string()))?;
    let mut compressed = encoder
        .finish()
        .map_err(|e| RenderError::Diagram(e.to_string()))?;

    let remainder = compressed.len() % 3;
    if remainder != 0 {
        compressed.resize(compressed.len() + 3 - remainder, 0);
    }
    Ok(PLANTUML_ENGINE.encode(compressed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::DeflateDecoder;
    use std::io::Read;

    #[test]
    fn test_kind_from_language() {
        assert_eq!(DiagramKind::from_language("mermaid"), Some(DiagramKind::Mermaid));
        assert_eq!(DiagramKind::from_language("dot"), Some(DiagramKind::Dot));
        assert_eq!(DiagramKind::from_language("rust"), None);
    }

    #[test]
    fn test_mermaid_container_escapes_source() {
        let html = render_diagram(DiagramKind::Mermaid, "graph TD\nA-->B<script>\n").unwrap();
        assert_eq!(
            html,
            "<div class=\"mermaid\">graph TD\nA--&gt;B&lt;script&gt;\n</div>\n"
        );
    }

    #[test]
    fn test_plantuml_image_url() {
        let html = render_diagram(DiagramKind::PlantUml, "Bob -> Alice : hello\n").unwrap();
        assert!(html.starts_with(
            "<img class=\"plantuml\" src=\"https://www.plantuml.com/plantuml/svg/"
        ));
        assert!(html.ends_with("alt=\"plantuml diagram\" />\n"));

        let ditaa = render_diagram(DiagramKind::Ditaa, "+--+\n").unwrap();
        assert!(ditaa.contains("/plantuml/png/"));
    }

    #[test]
    fn test_plantuml_encoding_decodes_to_source() {
        let source = "@startuml\nBob -> Alice : hello\n@enduml";
        let encoded = plantuml_encode(source).unwrap();
        assert_eq!(encoded.len() % 4, 0);
        assert!(encoded
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));

        let compressed = PLANTUML_ENGINE.decode(&encoded).unwrap();
        let mut decoded = String::new();
        DeflateDecoder::new(&compressed[..])
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, source);
    }
}
