//! System font lookup with a small LRU of resolved font locations.

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use directories::BaseDirs;
use log::{debug, warn};
use lru::LruCache;
use skia_safe::{FontMgr, FontStyle, Typeface};

const FONT_EXTENSIONS: [&str; 3] = ["ttf", "ttc", "otf"];

/// Where a family name was resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// Matched by the platform font manager.
    System(String),
    File(PathBuf),
    /// Font manager's default typeface.
    Default,
}

pub struct FontResolver {
    search_dirs: Vec<PathBuf>,
    fallback_files: Vec<&'static str>,
    cache: Mutex<LruCache<String, FontSource>>,
}

impl FontResolver {
    pub fn new(extra_dirs: &[PathBuf], cache_size: usize) -> Self {
        let mut search_dirs = extra_dirs.to_vec();
        search_dirs.extend(os_font_dirs());
        let capacity = NonZeroUsize::new(cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            search_dirs,
            fallback_files: os_fallback_files().to_vec(),
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Resolves `family`, or the OS default list for `""`/`"default"`.
    pub fn resolve(&self, family: &str) -> FontSource {
        let key = family.trim().to_lowercase();
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(source) = cache.get(&key) {
            return source.clone();
        }
        let source = self.lookup(family.trim());
        debug!("FontResolver: '{}' -> {:?}", family, source);
        cache.put(key, source.clone());
        source
    }

    fn lookup(&self, family: &str) -> FontSource {
        let font_mgr = FontMgr::default();
        if !family.is_empty() && !family.eq_ignore_ascii_case("default") {
            if font_mgr
                .match_family_style(family, FontStyle::normal())
                .is_some()
            {
                return FontSource::System(family.to_string());
            }
            let candidates: Vec<String> = FONT_EXTENSIONS
                .iter()
                .map(|ext| format!("{}.{}", family, ext))
                .collect();
            if let Some(path) = self.find_file(&candidates) {
                return FontSource::File(path);
            }
        }
        let fallbacks: Vec<String> = self.fallback_files.iter().map(|f| f.to_string()).collect();
        match self.find_file(&fallbacks) {
            Some(path) => FontSource::File(path),
            None => FontSource::Default,
        }
    }

    /// First existing `dir/name` (or one level below `dir`) in search order.
    fn find_file(&self, names: &[String]) -> Option<PathBuf> {
        for dir in &self.search_dirs {
            for name in names {
                let direct = dir.join(name);
                if direct.is_file() {
                    return Some(direct);
                }
            }
            if let Some(nested) = find_in_subdirs(dir, names) {
                return Some(nested);
            }
        }
        None
    }

    /// Loads a typeface, degrading to the font manager default when the
    /// resolved file cannot be read.
    pub fn typeface(&self, family: &str) -> Option<Typeface> {
        let font_mgr = FontMgr::default();
        let loaded = match self.resolve(family) {
            FontSource::System(name) => font_mgr.match_family_style(&name, FontStyle::normal()),
            FontSource::File(path) => match fs::read(&path) {
                Ok(bytes) => font_mgr.new_from_data(&bytes, None),
                Err(e) => {
                    warn!("Failed to load font {}: {}", path.display(), e);
                    None
                }
            },
            FontSource::Default => None,
        };
        loaded.or_else(|| font_mgr.legacy_make_typeface(None, FontStyle::normal()))
    }
}

fn find_in_subdirs(dir: &Path, names: &[String]) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    for entry in entries.flatten() {
        let sub = entry.path();
        if !sub.is_dir() {
            continue;
        }
        for name in names {
            let candidate = sub.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}

fn home_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

fn os_font_dirs() -> Vec<PathBuf> {
    if cfg!(target_os = "windows") {
        let windir = std::env::var("WINDIR").unwrap_or_else(|_| "C:\\Windows".to_string());
        let mut dirs = vec![PathBuf::from(windir).join("Fonts")];
        if let Ok(local) = std::env::var("LOCALAPPDATA") {
            dirs.push(PathBuf::from(local).join("Microsoft\\Windows\\Fonts"));
        }
        dirs
    } else if cfg!(target_os = "macos") {
        let mut dirs = vec![
            PathBuf::from("/System/Library/Fonts"),
            PathBuf::from("/Library/Fonts"),
        ];
        dirs.extend(home_dir().map(|home| home.join("Library/Fonts")));
        dirs
    } else {
        let mut dirs = vec![
            PathBuf::from("/usr/share/fonts/truetype"),
            PathBuf::from("/usr/local/share/fonts"),
        ];
        dirs.extend(home_dir().map(|home| home.join(".local/share/fonts")));
        dirs
    }
}

fn os_fallback_files() -> &'static [&'static str] {
    if cfg!(target_os = "windows") {
        &["arial.ttf", "segoeui.ttf", "calibri.ttf", "verdana.ttf"]
    } else if cfg!(target_os = "macos") {
        &["Helvetica.ttc", "Arial.ttf", "Times.ttc"]
    } else {
        &["DejaVuSans.ttf", "FreeSans.ttf", "Ubuntu-R.ttf"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver_with(dir: &Path) -> FontResolver {
        FontResolver {
            search_dirs: vec![dir.to_path_buf()],
            fallback_files: vec!["Fallback.ttf"],
            cache: Mutex::new(LruCache::new(NonZeroUsize::new(2).unwrap())),
        }
    }

    #[test]
    fn finds_fallback_in_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("family");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("Fallback.ttf"), b"not a font").unwrap();

        let resolver = resolver_with(dir.path());
        assert_eq!(
            resolver.resolve("default"),
            FontSource::File(nested.join("Fallback.ttf"))
        );
    }

    #[test]
    fn missing_everything_resolves_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = resolver_with(dir.path());
        assert_eq!(resolver.resolve(""), FontSource::Default);
    }

    #[test]
    fn resolution_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = resolver_with(dir.path());
        assert_eq!(resolver.resolve("default"), FontSource::Default);
        fs::write(dir.path().join("Fallback.ttf"), b"x").unwrap();
        assert_eq!(resolver.resolve("DEFAULT"), FontSource::Default);
    }
}
