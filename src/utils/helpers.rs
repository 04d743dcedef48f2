//! Helper utility functions

use std::path::Path;

/// Upper-case the first character and lower-case the rest
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Office lock files start with `~$`
pub fn is_lock_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with("~$"))
        .unwrap_or(false)
}

pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Make a report number safe for use in a filename
pub fn sanitize_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c => c,
        })
        .collect()
}

/// `<report_number>_<template filename>`
pub fn output_file_name(report_number: &str, template_name: &str) -> String {
    format!("{}_{}", sanitize_name(report_number), template_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("PICHINCHA"), "Pichincha");
        assert_eq!(capitalize_first("SAN JOSÉ DE MINAS"), "San josé de minas");
        assert_eq!(capitalize_first("ÑUÑOA"), "Ñuñoa");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_is_lock_file() {
        assert!(is_lock_file(&PathBuf::from("charts/~$TUMBACO.xlsx")));
        assert!(!is_lock_file(&PathBuf::from("charts/TUMBACO.xlsx")));
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension(&PathBuf::from("a/MAPA.PNG"), &["png", "jpg"]));
        assert!(!has_extension(&PathBuf::from("a/notes.txt"), &["png"]));
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(
            output_file_name("IT-CZO2-C-2025-0101", "TUMBACO_4G_CONECEL_DT.docx"),
            "IT-CZO2-C-2025-0101_TUMBACO_4G_CONECEL_DT.docx"
        );
        assert_eq!(
            output_file_name("IT/2025/01", "X_4G_Y_Z.docx"),
            "IT-2025-01_X_4G_Y_Z.docx"
        );
    }
}
