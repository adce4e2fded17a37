//! Go import extractor using Tree-sitter.
//!
//! Only the file header is significant: the package clause and the import
//! declarations that precede the first other top-level declaration. Syntax
//! errors past that point do not prevent extraction.

use tree_sitter::{Language, Node, Parser};

use layer_lint_core::{ExtractError, ImportExtractor, ImportInfo};

/// Extracts import paths from Go source.
pub struct GoExtractor {
    language: Language,
}

impl GoExtractor {
    /// Creates a new Go extractor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_go::LANGUAGE.into(),
        }
    }

    fn text<'a>(node: &Node<'_>, src: &'a [u8]) -> &'a str {
        node.utf8_text(src).unwrap_or("")
    }

    /// Import path with `"` or `` ` `` delimiters stripped.
    fn unquote(literal: &str) -> &str {
        literal.trim_matches(|c| c == '"' || c == '`')
    }

    fn extract_spec(spec: &Node<'_>, src: &[u8]) -> Option<ImportInfo> {
        let path = spec.child_by_field_name("path")?;
        let pos = path.start_position();
        Some(ImportInfo::new(
            Self::unquote(Self::text(&path, src)),
            pos.row + 1,
            pos.column + 1,
        ))
    }

    /// Collect `import_spec`s from an `import_declaration`, single or grouped.
    fn extract_declaration(decl: &Node<'_>, src: &[u8], out: &mut Vec<ImportInfo>) {
        let mut cursor = decl.walk();
        for child in decl.children(&mut cursor) {
            match child.kind() {
                "import_spec" => out.extend(Self::extract_spec(&child, src)),
                "import_spec_list" => {
                    let mut list_cursor = child.walk();
                    for spec in child.children(&mut list_cursor) {
                        if spec.kind() == "import_spec" {
                            out.extend(Self::extract_spec(&spec, src));
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// A top-level ERROR left over from a broken package or import clause.
    fn is_header_fragment(node: &Node<'_>) -> bool {
        node.child(0)
            .is_some_and(|c| matches!(c.kind(), "import" | "package"))
    }

    /// First ERROR or MISSING node in document order.
    fn first_error<'t>(node: Node<'t>) -> Option<Node<'t>> {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if !node.has_error() {
            return None;
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if let Some(err) = Self::first_error(child) {
                return Some(err);
            }
        }
        None
    }

    fn syntax_error(node: &Node<'_>, message: impl Into<String>) -> ExtractError {
        let pos = node.start_position();
        ExtractError::Syntax {
            line: pos.row + 1,
            column: pos.column + 1,
            message: message.into(),
        }
    }
}

impl Default for GoExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportExtractor for GoExtractor {
    fn language_id(&self) -> &'static str {
        "go"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".go"]
    }

    fn extract(&self, source: &str) -> Result<Vec<ImportInfo>, ExtractError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ExtractError::Parser(e.to_string()))?;

        let src = source.as_bytes();
        let tree = parser
            .parse(src, None)
            .ok_or_else(|| ExtractError::Parser("parse did not complete".into()))?;
        let root = tree.root_node();

        let mut has_package = false;
        let mut header_end = src.len();
        let mut imports = Vec::new();

        let mut cursor = root.walk();
        for node in root.children(&mut cursor) {
            match node.kind() {
                "package_clause" => has_package = true,
                "import_declaration" => Self::extract_declaration(&node, src, &mut imports),
                "comment" => {}
                "ERROR" if Self::is_header_fragment(&node) => {}
                _ if node.is_named() => {
                    header_end = node.start_byte();
                    break;
                }
                _ => {}
            }
        }

        let in_header = |e: &Node<'_>| header_end == src.len() || e.start_byte() < header_end;
        if let Some(err) = Self::first_error(root).filter(in_header) {
            let message = if err.is_missing() {
                format!("missing {}", err.kind())
            } else {
                "unexpected syntax in file header".to_owned()
            };
            return Err(Self::syntax_error(&err, message));
        }

        if !has_package {
            return Err(Self::syntax_error(&root, "expected 'package' clause"));
        }

        tracing::trace!("extracted {} imports", imports.len());
        Ok(imports)
    }
}
