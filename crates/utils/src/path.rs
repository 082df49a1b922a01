use std::env;
use std::io;
use std::path::{Path, PathBuf};

// CC BY-SA 3.0
// Adapted from https://stackoverflow.com/a/35046243
pub fn is_program_in_path<P: AsRef<Path>>(program: P) -> bool {
    let program = program.as_ref();
    if let Some(paths) = env::var_os("PATH") {
        for dir in env::split_paths(&paths) {
            if std::fs::metadata(dir.join(program)).is_ok() {
                return true;
            }
        }
    }
    false
}

/// Lowercased extension of `p`, if any.
pub fn extension_lowercase<P: AsRef<Path>>(p: P) -> Option<String> {
    p.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Creates the directory that will hold `p`. A bare file name needs nothing.
pub fn ensure_parent_dir<P: AsRef<Path>>(p: P) -> io::Result<()> {
    match p.as_ref().parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// `plots/cdf.jpg` + `plot` -> `plots/cdf.jpg.plot`, so companions of
/// `cdf.png` and `cdf.jpg` never collide.
pub fn companion_path<P: AsRef<Path>>(p: P, extension: &str) -> PathBuf {
    let mut s = p.as_ref().as_os_str().to_owned();
    s.push(".");
    s.push(extension);
    PathBuf::from(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(extension_lowercase("out/CDF.JPG").as_deref(), Some("jpg"));
        assert_eq!(extension_lowercase("out/cdf"), None);
    }

    #[test]
    fn companion_keeps_original_extension() {
        assert_eq!(
            companion_path("plots/cdf.jpg", "dat"),
            PathBuf::from("plots/cdf.jpg.dat")
        );
    }

    #[test]
    fn parent_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a").join("b").join("cdf.png");
        ensure_parent_dir(&target).unwrap();
        assert!(dir.path().join("a").join("b").is_dir());
        ensure_parent_dir("cdf.png").unwrap();
    }

    #[test]
    fn missing_program_is_not_found() {
        assert!(!is_program_in_path("definitely-not-a-real-program-4242"));
    }
}
