// Cache path utilities.
// Derives the per-user cache file location from a digest of the login.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Get the base cache directory (~/.cache/locstat on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "locstat").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to a user's cache file: `<dir>/<sha256(user)>.txt`.
pub fn cache_file_path(dir: &Path, user_name: &str) -> PathBuf {
    dir.join(format!("{}.txt", super::sha256_hex(user_name)))
}

/// Path to the advisory lock file guarding a cache file.
pub fn lock_path(cache_file: &Path) -> PathBuf {
    cache_file.with_extension("lock")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_file_path_is_digest_of_user() {
        let path = cache_file_path(Path::new("/tmp/cache"), "octocat");
        let file_name = path.file_name().unwrap().to_str().unwrap();

        assert!(path.starts_with("/tmp/cache"));
        assert!(file_name.ends_with(".txt"));
        assert_eq!(file_name.len(), 64 + ".txt".len());
        assert!(!file_name.contains("octocat"));
    }

    #[test]
    fn test_cache_file_path_is_stable_per_user() {
        let dir = Path::new("cache");
        assert_eq!(
            cache_file_path(dir, "octocat"),
            cache_file_path(dir, "octocat")
        );
        assert_ne!(cache_file_path(dir, "octocat"), cache_file_path(dir, "hubot"));
    }

    #[test]
    fn test_lock_path() {
        let lock = lock_path(Path::new("/tmp/cache/abc.txt"));
        assert_eq!(lock, PathBuf::from("/tmp/cache/abc.lock"));
    }
}
