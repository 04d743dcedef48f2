//! Header, footer and correction-map images

use crate::utils::{contains_ignore_case, has_extension};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

const RASTER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BannerImages {
    pub header: Option<PathBuf>,
    pub footer: Option<PathBuf>,
}

/// Files directly inside `dir`, sorted by name
fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Header and footer images matched by exact, case-insensitive file name
pub fn find_banner_images(dir: &Path, header_name: &str, footer_name: &str) -> Result<BannerImages> {
    let mut found = BannerImages::default();
    for path in list_files(dir)? {
        let name = file_name(&path);
        if found.header.is_none() && name.eq_ignore_ascii_case(header_name) {
            debug!(path = %path.display(), "header image found");
            found.header = Some(path);
        } else if found.footer.is_none() && name.eq_ignore_ascii_case(footer_name) {
            debug!(path = %path.display(), "footer image found");
            found.footer = Some(path);
        }
    }
    Ok(found)
}

/// First raster image whose name contains the locality, banners excluded
pub fn find_correction_image(
    dir: &Path,
    locality: &str,
    excluded: &[&str],
) -> Result<Option<PathBuf>> {
    let found = list_files(dir)?.into_iter().find(|path| {
        let name = file_name(path);
        has_extension(path, RASTER_EXTENSIONS)
            && !excluded.iter().any(|x| name.eq_ignore_ascii_case(x))
            && contains_ignore_case(&name, locality)
    });
    if let Some(path) = &found {
        debug!(path = %path.display(), "correction image found");
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn populate(names: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            fs::write(dir.path().join(name), b"img").unwrap();
        }
        dir
    }

    #[test]
    fn test_banner_names_are_case_insensitive() {
        let dir = populate(&["ENCABEZADO.PNG", "Pie de Pagina.png", "otro.png"]);
        let found = find_banner_images(dir.path(), "encabezado.png", "pie de pagina.png").unwrap();
        assert_eq!(found.header.unwrap().file_name().unwrap(), "ENCABEZADO.PNG");
        assert_eq!(found.footer.unwrap().file_name().unwrap(), "Pie de Pagina.png");
    }

    #[test]
    fn test_missing_banners_are_none() {
        let dir = populate(&["logo.png"]);
        let found = find_banner_images(dir.path(), "encabezado.png", "pie de pagina.png").unwrap();
        assert_eq!(found, BannerImages::default());
    }

    #[test]
    fn test_correction_image_by_locality() {
        let dir = populate(&["mapa_pifo.png", "Mapa_Tumbaco_corregido.jpg", "tumbaco.txt"]);
        let found = find_correction_image(dir.path(), "TUMBACO", &["encabezado.png"]).unwrap();
        assert_eq!(found.unwrap().file_name().unwrap(), "Mapa_Tumbaco_corregido.jpg");
        assert!(find_correction_image(dir.path(), "PUEMBO", &[]).unwrap().is_none());
    }
}
