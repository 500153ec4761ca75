use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Bound on increment attempts for a single call.
pub const MAX_INCREMENT_ATTEMPTS: usize = 2500;

/// Returns `path` if nothing exists there, otherwise a sibling path whose file
/// stem carries a bumped numeric suffix (`report.csv` -> `report2.csv`,
/// `report2.csv` -> `report3.csv`).
///
/// With `overwrite` set the suffix is bumped exactly once and the result may
/// exist. Without it the search continues until a free name is found or
/// [`MAX_INCREMENT_ATTEMPTS`] is reached, in which case the last candidate is
/// returned as is.
pub fn increment(path: &Path, overwrite: bool) -> PathBuf {
    increment_with_limit(path, overwrite, MAX_INCREMENT_ATTEMPTS)
}

pub fn increment_with_limit(path: &Path, overwrite: bool, max_attempts: usize) -> PathBuf {
    let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let mut candidate = path.to_path_buf();
    let mut error_counter = 2usize;
    let mut attempts = 0usize;

    while candidate.exists() {
        let stem = candidate
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = candidate
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        let new_stem = match bump_suffix(&stem) {
            Some(bumped) => bumped,
            None => {
                let appended = format!("{}{}", stem, error_counter);
                error_counter += 1;
                appended
            }
        };

        candidate = dir.join(format!("{}{}", new_stem, ext));
        attempts += 1;
        debug!(candidate = %candidate.display(), attempts, "Incremented path");

        if overwrite {
            break;
        }
        if error_counter > max_attempts || attempts >= max_attempts {
            warn!(
                path = %path.display(),
                attempts,
                "Gave up looking for a free path"
            );
            break;
        }
    }

    candidate
}

/// Bumps the number formed by the digits among the last three characters of
/// `stem`. Every occurrence of that digit string is replaced; if the new
/// number is still absent afterwards it is appended. `None` when there are no
/// digits to bump.
fn bump_suffix(stem: &str) -> Option<String> {
    let chars: Vec<char> = stem.chars().collect();
    let tail_start = chars.len().saturating_sub(3);
    let digits: String = chars[tail_start..]
        .iter()
        .filter(|c| c.is_ascii_digit())
        .collect();

    let value: u64 = digits.parse().ok()?;
    let next = (value + 1).to_string();

    let mut bumped = stem.replace(&digits, &next);
    if !bumped.contains(&next) {
        bumped.push_str(&next);
    }
    Some(bumped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        File::create(&path).unwrap();
        path
    }

    #[test]
    fn missing_path_is_returned_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fresh.csv");
        assert_eq!(increment(&path, false), path);
        assert_eq!(increment(&path, true), path);
    }

    #[test]
    fn trailing_digits_are_bumped() {
        let dir = TempDir::new().unwrap();
        let path = touch(&dir, "data7.csv");
        assert_eq!(increment(&path, false), dir.path().join("data8.csv"));
    }

    #[test]
    fn bumping_skips_existing_names() {
        let dir = TempDir::new().unwrap();
        let path = touch(&dir, "data7.csv");
        touch(&dir, "data8.csv");
        touch(&dir, "data9.csv");

        let next = increment(&path, false);
        assert_eq!(next, dir.path().join("data10.csv"));
        assert!(!next.exists());
    }

    #[test]
    fn name_without_digits_gets_counter() {
        let dir = TempDir::new().unwrap();
        let path = touch(&dir, "report.csv");
        assert_eq!(increment(&path, false), dir.path().join("report2.csv"));

        touch(&dir, "report2.csv");
        assert_eq!(increment(&path, false), dir.path().join("report3.csv"));
    }

    #[test]
    fn overwrite_bumps_once_even_if_taken() {
        let dir = TempDir::new().unwrap();
        let path = touch(&dir, "part1.txt");
        touch(&dir, "part2.txt");

        let next = increment(&path, true);
        assert_eq!(next, dir.path().join("part2.txt"));
        assert!(next.exists());
    }

    #[test]
    fn search_is_bounded() {
        let dir = TempDir::new().unwrap();
        let path = touch(&dir, "x1.csv");
        for i in 2..=6 {
            touch(&dir, &format!("x{}.csv", i));
        }

        // every candidate within the limit exists, so the last one comes back
        let next = increment_with_limit(&path, false, 3);
        assert_eq!(next, dir.path().join("x4.csv"));
    }

    #[test]
    fn full_window_cycle_stops_at_default_bound() {
        let dir = TempDir::new().unwrap();
        // x999 -> x1000 -> x11 -> ... -> x999 cycles through 990 names
        for i in 11..=1000 {
            touch(&dir, &format!("x{}.csv", i));
        }

        let next = increment(&dir.path().join("x999.csv"), false);
        assert!(next.exists());
        // attempt 2500 sits at offset 519 of the cycle that starts at x1000
        assert_eq!(next, dir.path().join("x529.csv"));
    }

    #[test]
    fn suffix_rules() {
        assert_eq!(bump_suffix("file09").as_deref(), Some("file10"));
        assert_eq!(bump_suffix("file999").as_deref(), Some("file1000"));
        assert_eq!(bump_suffix("v1_final"), None);
        // digits in the window that are not contiguous are not found verbatim
        assert_eq!(bump_suffix("a1b2").as_deref(), Some("a1b213"));
    }

    #[test]
    fn extension_and_directory_are_kept() {
        let dir = TempDir::new().unwrap();
        let path = touch(&dir, "archive.tar.gz");
        assert_eq!(increment(&path, false), dir.path().join("archive.tar2.gz"));
    }
}
