use crate::error::{Result, VersionSyncError, read_file, write_file};
use crate::parsers::{Parser, ParserOptions, UpdateOutcome};
use crate::version::parse_version;
use log::{debug, warn};
use regex::{Captures, Regex};
use semver::Version;
use std::path::Path;
use tree_sitter::Node;

pub struct PythonParser;

impl PythonParser {
    /// Matches `<indent><targets> = <prefix><quote><value><quote><rest>` on a single line.
    ///
    /// `targets` holds one candidate name, optionally chained with other identifiers
    /// (`a = version = "1.0"`). Triple quotes are tried before single ones so that
    /// `"""1.0"""` never reads as an empty string followed by text.
    pub fn version_match_regex(variables: &[String]) -> Result<Regex> {
        let names = variables
            .iter()
            .map(|name| regex::escape(name))
            .collect::<Vec<_>>()
            .join("|");
        let link = r"[A-Za-z_]\w*\s*=\s*";
        Regex::new(&format!(
            concat!(
                r##"^(?P<assign>\s*(?:{link})*(?:{names})\s*=\s*(?:{link})*)(?P<prefix>[rRuU]?)"##,
                r##"(?:"""(?P<tdq>[^"]*)"""|'''(?P<tsq>[^']*)'''|"(?P<dq>[^"]*)"|'(?P<sq>[^']*)')"##,
                r##"(?P<rest>.*)$"##,
            ),
            link = link,
            names = names,
        ))
        .map_err(|e| VersionSyncError::parse("--py-vars", "variable pattern", e))
    }

    /// The quote delimiter that matched, reused verbatim on rewrite.
    fn delimiter(captures: &Captures) -> &'static str {
        if captures.name("tdq").is_some() {
            "\"\"\""
        } else if captures.name("tsq").is_some() {
            "'''"
        } else if captures.name("dq").is_some() {
            "\""
        } else {
            "'"
        }
    }

    fn find_assignment(path: &Path, source: &str, variables: &[String]) -> Result<Option<String>> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| VersionSyncError::parse(path, "Python", e))?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| VersionSyncError::parse(path, "Python", "parser produced no tree"))?;

        let root = tree.root_node();
        if root.has_error() {
            let line = first_error(root).map_or(1, |node| node.start_position().row + 1);
            return Err(VersionSyncError::parse(
                path,
                "Python",
                format!("invalid syntax at line {line}"),
            ));
        }

        let mut cursor = root.walk();
        for statement in root.named_children(&mut cursor) {
            if statement.kind() != "expression_statement" {
                continue;
            }
            let Some(assignment) = statement.named_child(0) else {
                continue;
            };
            if let Some(value) = assigned_string(assignment, source, variables) {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

/// Walks `a = b = "x"` chains and returns the literal when any target is a candidate name.
fn assigned_string(assignment: Node, source: &str, variables: &[String]) -> Option<String> {
    let mut node = assignment;
    let mut matched = false;
    while node.kind() == "assignment" {
        // Annotated assignments are not plain assignments.
        if node.child_by_field_name("type").is_some() {
            return None;
        }
        let left = node.child_by_field_name("left")?;
        if left.kind() == "identifier" {
            let name = left.utf8_text(source.as_bytes()).ok()?;
            matched |= variables.iter().any(|candidate| candidate == name);
        }
        node = node.child_by_field_name("right")?;
    }
    if !matched {
        return None;
    }
    while node.kind() == "parenthesized_expression" {
        node = node.named_child(0)?;
    }
    string_literal(node, source)
}

/// Contents of a plain string literal; f-strings and byte strings are rejected.
fn string_literal(node: Node, source: &str) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }
    let mut cursor = node.walk();
    let mut start = None;
    let mut end = None;
    for child in node.children(&mut cursor) {
        match child.kind() {
            "string_start" => {
                let prefix = child.utf8_text(source.as_bytes()).ok()?;
                if prefix.chars().any(|c| matches!(c, 'f' | 'F' | 'b' | 'B')) {
                    return None;
                }
                start = Some(child.end_byte());
            }
            "string_end" => end = Some(child.start_byte()),
            "interpolation" => return None,
            _ => {}
        }
    }
    source.get(start?..end?).map(String::from)
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error)
}

impl Parser for PythonParser {
    fn get_current_version(path: impl AsRef<Path>, options: &ParserOptions) -> Result<Version> {
        let path = path.as_ref();
        let source = read_file(path)?;
        match Self::find_assignment(path, &source, &options.variables)? {
            Some(version) => {
                debug!("Found current version: {}", version);
                parse_version(&version, path)
            }
            None => Err(VersionSyncError::missing(
                path,
                format!("an assignment to any of [{}]", options.variables.join(", ")),
            )),
        }
    }

    fn update_version(
        path: impl AsRef<Path>,
        version: &Version,
        options: &ParserOptions,
    ) -> Result<UpdateOutcome> {
        let path = path.as_ref();
        if options.variables.is_empty() {
            warn!("No variable names given, '{}' left unchanged.", path.display());
            return Ok(UpdateOutcome::Skipped);
        }

        let contents = read_file(path)?;
        let version_regex = Self::version_match_regex(&options.variables)?;
        let new_version = version.to_string();
        let mut replaced = 0usize;
        let mut new_contents = String::with_capacity(contents.len());

        for line in contents.split_inclusive('\n') {
            let body = line.trim_end_matches(['\n', '\r']);
            let ending = &line[body.len()..];
            match version_regex.captures(body) {
                Some(captures) => {
                    let quote = Self::delimiter(&captures);
                    debug!("Rewriting line: '{}'", body);
                    new_contents.push_str(&captures["assign"]);
                    new_contents.push_str(&captures["prefix"]);
                    new_contents.push_str(quote);
                    new_contents.push_str(&new_version);
                    new_contents.push_str(quote);
                    new_contents.push_str(&captures["rest"]);
                    replaced += 1;
                }
                None => new_contents.push_str(body),
            }
            new_contents.push_str(ending);
        }

        if replaced == 0 {
            warn!(
                "No version variable found in '{}' to update.",
                path.display()
            );
            return Ok(UpdateOutcome::Skipped);
        }

        write_file(path, &new_contents)?;
        Ok(UpdateOutcome::Updated)
    }
}
