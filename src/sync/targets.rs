// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resolves the target-namespace annotation into a concrete copy plan.

/// Where copies of a source secret should live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSpec {
    /// Copy to every namespace in the cluster except the source namespace
    AllNamespaces,
    /// Copy to exactly these namespaces, deduplicated, source excluded
    Explicit(Vec<String>),
}

/// Resolve the raw annotation value into a [`TargetSpec`].
///
/// An empty or all-whitespace annotation means "all namespaces". An explicit
/// list is deduplicated preserving first-seen order, and never contains the
/// source namespace itself. A list naming only the source namespace yields
/// an empty explicit set, not all namespaces.
pub fn resolve_targets(annotation: &str, source_namespace: &str) -> TargetSpec {
    let entries = parse_annotation_list(annotation);
    if entries.is_empty() {
        return TargetSpec::AllNamespaces;
    }

    let mut targets: Vec<String> = Vec::with_capacity(entries.len());
    for entry in entries {
        if entry == source_namespace || targets.contains(&entry) {
            continue;
        }
        targets.push(entry);
    }
    TargetSpec::Explicit(targets)
}

/// Parse the annotation as a single CSV record, dropping empty entries.
///
/// Quoted entries may embed commas and whitespace; malformed quoting falls
/// back to naive comma splitting so that parsing never fails a pass.
fn parse_annotation_list(value: &str) -> Vec<String> {
    let value = value.trim();
    if value.is_empty() {
        return Vec::new();
    }

    let fields = match split_csv_record(value) {
        Some(fields) => fields,
        None => value.split(',').map(str::to_string).collect(),
    };

    fields
        .into_iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect()
}

/// Split a single CSV record into fields.
///
/// Leading whitespace before a field is skipped, double quotes delimit
/// fields with embedded commas, and `""` inside a quoted field is a literal
/// quote. Returns `None` on a bare quote, an unterminated quote, or trailing
/// characters after a closing quote.
fn split_csv_record(value: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut chars = value.chars().peekable();

    loop {
        while matches!(chars.peek(), Some(' ') | Some('\t')) {
            chars.next();
        }

        let mut field = String::new();
        if chars.peek() == Some(&'"') {
            chars.next();
            loop {
                match chars.next() {
                    Some('"') if chars.peek() == Some(&'"') => {
                        chars.next();
                        field.push('"');
                    }
                    Some('"') => break,
                    Some(c) => field.push(c),
                    // Unterminated quote
                    None => return None,
                }
            }
            fields.push(field);
            match chars.next() {
                None => return Some(fields),
                Some(',') => continue,
                // Trailing junk after the closing quote
                Some(_) => return None,
            }
        }

        loop {
            match chars.next() {
                Some(',') => {
                    fields.push(field);
                    break;
                }
                // Bare quote inside an unquoted field
                Some('"') => return None,
                Some(c) => field.push(c),
                None => {
                    fields.push(field);
                    return Some(fields);
                }
            }
        }
    }
}
