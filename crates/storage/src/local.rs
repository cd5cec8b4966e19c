//! Filesystem-backed capture listing.
//!
//! Layout: `<image_root>/<date>/<captureName>/{metadata.json, raw.*, processed.*}`.
//! Date directory names are expected to be zero-padded `YYYY-MM-DD` so that
//! plain string ordering is chronological; other names are listed with a warning.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use futures_util::future::join_all;
use tokio::fs;
use tracing::{debug, error, info, warn};

use crate::{Capture, CaptureMetadata, CaptureSource};

pub const METADATA_FILE: &str = "metadata.json";
pub const DEFAULT_URL_PREFIX: &str = "/images";

/// Probe order for image files. The last entry is used when nothing exists.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["tiff", "tif", "jpg"];

pub struct LocalStorage {
    image_root: PathBuf,
    url_prefix: String,
}

impl LocalStorage {
    pub fn new(image_root: impl Into<PathBuf>) -> Self {
        Self {
            image_root: image_root.into(),
            url_prefix: DEFAULT_URL_PREFIX.to_string(),
        }
    }

    pub fn with_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = prefix.into().trim_end_matches('/').to_string();
        self
    }

    async fn scan(&self) -> Result<Vec<Capture>> {
        let dates = list_subdirs(&self.image_root)
            .await
            .with_context(|| format!("reading {}", self.image_root.display()))?;

        Ok(self.scan_dates(dates).await)
    }

    /// A date that cannot be listed is skipped; the others still load.
    async fn scan_dates(&self, dates: Vec<String>) -> Vec<Capture> {
        let mut captures = Vec::new();
        for date in dates {
            if !is_sortable_date(&date) {
                debug!(%date, "date directory name is not YYYY-MM-DD");
            }

            let date_path = self.image_root.join(&date);
            let names = match list_subdirs(&date_path).await {
                Ok(names) => names,
                Err(err) => {
                    warn!(%date, "could not read date directory: {err:#}");
                    continue;
                }
            };

            let records = join_all(names.iter().map(|name| self.load_capture(&date, name))).await;
            captures.extend(records);
        }

        captures
    }

    async fn load_capture(&self, date: &str, name: &str) -> Capture {
        let dir = self.image_root.join(date).join(name);

        let metadata = match read_metadata(&dir).await {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!(capture = %name, "could not read metadata for {name}: {err:#}");
                CaptureMetadata::default()
            }
        };

        let (raw, processed) = tokio::join!(resolve_image(&dir, "raw"), resolve_image(&dir, "processed"));
        let base = format!("{}/{date}/{name}", self.url_prefix);

        Capture::new(
            date,
            name,
            format!("{base}/{raw}"),
            format!("{base}/{processed}"),
            metadata,
        )
    }
}

#[async_trait]
impl CaptureSource for LocalStorage {
    async fn list_captures(&self) -> Vec<Capture> {
        match self.scan().await {
            Ok(captures) => {
                info!(count = captures.len(), "listed captures");
                captures
            }
            Err(err) => {
                error!("error scanning images directory: {err:#}");
                Vec::new()
            }
        }
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

/// Returns the file name of the first existing `<stem>.<ext>` in
/// [`IMAGE_EXTENSIONS`] order, or the last candidate when none exist.
pub async fn resolve_image(dir: &Path, stem: &str) -> String {
    let (fallback, preferred) = (
        IMAGE_EXTENSIONS[IMAGE_EXTENSIONS.len() - 1],
        &IMAGE_EXTENSIONS[..IMAGE_EXTENSIONS.len() - 1],
    );

    for ext in preferred {
        let file_name = format!("{stem}.{ext}");
        if fs::metadata(dir.join(&file_name)).await.is_ok() {
            return file_name;
        }
    }

    format!("{stem}.{fallback}")
}

async fn read_metadata(dir: &Path) -> Result<CaptureMetadata> {
    let path = dir.join(METADATA_FILE);
    let bytes = fs::read(&path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    CaptureMetadata::parse(&bytes).with_context(|| format!("parsing {}", path.display()))
}

/// Names of the directories directly under `path`, in enumeration order.
async fn list_subdirs(path: &Path) -> Result<Vec<String>> {
    let mut entries = fs::read_dir(path).await?;
    let mut names = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let is_dir = match entry.file_type().await {
            Ok(file_type) => file_type.is_dir(),
            Err(err) => {
                debug!(path = %entry.path().display(), "skipping entry without file type: {err}");
                false
            }
        };
        if !is_dir {
            continue;
        }

        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => warn!(name = ?raw, "skipping directory with non UTF-8 name"),
        }
    }

    Ok(names)
}

fn is_sortable_date(date: &str) -> bool {
    date.len() == 10 && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}

/// Startup check of the date directory names under `image_root`. Warns
/// once per name that will not sort chronologically and returns how many
/// there were. An unreadable root is left for the first scan to report.
pub async fn check_date_layout(image_root: &Path) -> usize {
    let dates = match list_subdirs(image_root).await {
        Ok(dates) => dates,
        Err(err) => {
            debug!(root = %image_root.display(), "skipping date layout check: {err}");
            return 0;
        }
    };

    let mut unsortable = 0;
    for date in dates.iter().filter(|date| !is_sortable_date(date)) {
        warn!(%date, "date directory is not YYYY-MM-DD; date sorting may not be chronological");
        unsortable += 1;
    }
    unsortable
}

#[cfg(test)]
mod tests {
    use std::fs as std_fs;

    use tempfile::TempDir;
    use tracing_test::traced_test;

    use super::*;

    fn capture_dir(root: &TempDir, date: &str, name: &str) -> PathBuf {
        let dir = root.path().join(date).join(name);
        std_fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn touch(dir: &Path, file: &str) {
        std_fs::write(dir.join(file), b"").unwrap();
    }

    fn by_id(captures: &[Capture], id: &str) -> Capture {
        captures
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .unwrap_or_else(|| panic!("missing capture {id}"))
    }

    #[tokio::test]
    async fn valid_metadata_is_carried_verbatim() {
        let root = TempDir::new().unwrap();
        let dir = capture_dir(&root, "2024-01-05", "m42");
        std_fs::write(
            dir.join(METADATA_FILE),
            r#"{"title": "Orion Nebula", "description": "Two hours of Ha",
                "tags": ["nebula", "orion"], "location": "Chile"}"#,
        )
        .unwrap();

        let captures = LocalStorage::new(root.path()).list_captures().await;
        assert_eq!(captures.len(), 1);

        let capture = &captures[0];
        assert_eq!(capture.id, "2024-01-05/m42");
        assert_eq!(capture.date, "2024-01-05");
        assert_eq!(capture.title, "Orion Nebula");
        assert_eq!(capture.description, "Two hours of Ha");
        assert_eq!(capture.tags, vec!["nebula", "orion"]);
        assert_eq!(capture.location, "Chile");
    }

    #[tokio::test]
    #[traced_test]
    async fn bad_metadata_falls_back_to_defaults() {
        let root = TempDir::new().unwrap();
        capture_dir(&root, "2024-01-05", "missing");
        let broken = capture_dir(&root, "2024-01-05", "broken");
        std_fs::write(broken.join(METADATA_FILE), "{\"title\": ").unwrap();
        let good = capture_dir(&root, "2024-01-05", "good");
        std_fs::write(good.join(METADATA_FILE), r#"{"title": "Andromeda"}"#).unwrap();

        let captures = LocalStorage::new(root.path()).list_captures().await;
        assert_eq!(captures.len(), 3);

        for id in ["2024-01-05/missing", "2024-01-05/broken"] {
            let capture = by_id(&captures, id);
            assert_eq!(capture.title, "");
            assert_eq!(capture.description, "");
            assert_eq!(capture.location, "");
            assert!(capture.tags.is_empty());
        }
        assert_eq!(by_id(&captures, "2024-01-05/good").title, "Andromeda");

        assert!(logs_contain("could not read metadata for missing"));
        assert!(logs_contain("could not read metadata for broken"));
    }

    #[tokio::test]
    async fn tiff_is_preferred_over_tif_and_jpg() {
        let root = TempDir::new().unwrap();
        let dir = capture_dir(&root, "2024-02-01", "pleiades");
        for file in ["raw.tiff", "raw.tif", "raw.jpg", "processed.tif", "processed.jpg"] {
            touch(&dir, file);
        }

        let captures = LocalStorage::new(root.path()).list_captures().await;
        assert_eq!(captures[0].raw_url, "/images/2024-02-01/pleiades/raw.tiff");
        assert_eq!(
            captures[0].processed_url,
            "/images/2024-02-01/pleiades/processed.tif"
        );
    }

    #[tokio::test]
    async fn jpg_is_used_when_no_tiff_variant_exists() {
        let root = TempDir::new().unwrap();
        let dir = capture_dir(&root, "2024-02-01", "moon");
        touch(&dir, "raw.jpg");
        touch(&dir, "processed.tiff");

        let captures = LocalStorage::new(root.path()).list_captures().await;
        assert_eq!(captures[0].raw_url, "/images/2024-02-01/moon/raw.jpg");
        assert_eq!(captures[0].processed_url, "/images/2024-02-01/moon/processed.tiff");
    }

    #[tokio::test]
    async fn jpg_is_emitted_even_when_missing() {
        let root = TempDir::new().unwrap();
        let dir = capture_dir(&root, "2024-02-01", "empty");

        assert_eq!(resolve_image(&dir, "raw").await, "raw.jpg");
        assert_eq!(resolve_image(&dir, "processed").await, "processed.jpg");
    }

    #[tokio::test]
    async fn resolved_urls_point_at_existing_files() {
        let root = TempDir::new().unwrap();
        let a = capture_dir(&root, "2024-03-01", "a");
        touch(&a, "raw.tif");
        touch(&a, "processed.jpg");
        let b = capture_dir(&root, "2024-03-02", "b");
        touch(&b, "raw.tiff");
        touch(&b, "processed.tiff");

        let captures = LocalStorage::new(root.path()).list_captures().await;
        assert_eq!(captures.len(), 2);
        for capture in captures {
            for url in [&capture.raw_url, &capture.processed_url] {
                let relative = url.strip_prefix("/images/").unwrap();
                assert!(root.path().join(relative).is_file(), "{url} does not exist");
            }
        }
    }

    #[tokio::test]
    async fn stray_files_are_ignored() {
        let root = TempDir::new().unwrap();
        touch(root.path(), "README.txt");
        let dir = capture_dir(&root, "2024-04-01", "sun");
        touch(dir.parent().unwrap(), "notes.md");
        touch(&dir, "raw.jpg");

        let captures = LocalStorage::new(root.path()).list_captures().await;
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].id, "2024-04-01/sun");
    }

    #[tokio::test]
    async fn captures_from_every_date_are_listed() {
        let root = TempDir::new().unwrap();
        capture_dir(&root, "2024-01-01", "a");
        capture_dir(&root, "2024-01-01", "b");
        capture_dir(&root, "2024-01-02", "a");

        let mut ids: Vec<String> = LocalStorage::new(root.path())
            .list_captures()
            .await
            .into_iter()
            .map(|c| c.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["2024-01-01/a", "2024-01-01/b", "2024-01-02/a"]);
    }

    #[tokio::test]
    #[traced_test]
    async fn missing_root_yields_empty_list() {
        let root = TempDir::new().unwrap();
        let storage = LocalStorage::new(root.path().join("does-not-exist"));

        assert!(storage.list_captures().await.is_empty());
        assert!(logs_contain("error scanning images directory"));
    }

    #[tokio::test]
    async fn url_prefix_is_configurable() {
        let root = TempDir::new().unwrap();
        capture_dir(&root, "2024-05-05", "jupiter");

        let captures = LocalStorage::new(root.path())
            .with_url_prefix("/media/")
            .list_captures()
            .await;
        assert_eq!(captures[0].raw_url, "/media/2024-05-05/jupiter/raw.jpg");
    }

    #[tokio::test]
    #[traced_test]
    async fn unsortable_date_names_are_listed_without_warning() {
        let root = TempDir::new().unwrap();
        capture_dir(&root, "5-1-2024", "saturn");

        let storage = LocalStorage::new(root.path());
        for _ in 0..2 {
            let captures = storage.list_captures().await;
            assert_eq!(captures.len(), 1);
            assert_eq!(captures[0].date, "5-1-2024");
        }
        assert!(!logs_contain("date sorting may not be chronological"));
    }

    #[tokio::test]
    #[traced_test]
    async fn date_layout_check_warns_per_unsortable_name() {
        let root = TempDir::new().unwrap();
        capture_dir(&root, "5-1-2024", "saturn");
        capture_dir(&root, "2024-13-40", "mars");
        capture_dir(&root, "2024-05-01", "venus");

        assert_eq!(check_date_layout(root.path()).await, 2);
        assert!(logs_contain("date sorting may not be chronological"));
        assert_eq!(check_date_layout(&root.path().join("missing")).await, 0);
    }

    #[tokio::test]
    async fn metadata_with_one_bad_field_keeps_the_rest() {
        let root = TempDir::new().unwrap();
        let dir = capture_dir(&root, "2024-01-05", "m42");
        std_fs::write(
            dir.join(METADATA_FILE),
            r#"{"title": "Orion Nebula", "tags": ["nebula"], "location": "Chile", "focalLength": 480}"#,
        )
        .unwrap();

        let captures = LocalStorage::new(root.path()).list_captures().await;
        let capture = by_id(&captures, "2024-01-05/m42");
        assert_eq!(capture.title, "Orion Nebula");
        assert_eq!(capture.tags, vec!["nebula"]);
        assert_eq!(capture.location, "Chile");
        assert_eq!(capture.focal_length, None);
    }

    #[tokio::test]
    #[traced_test]
    async fn unreadable_date_is_skipped() {
        let root = TempDir::new().unwrap();
        capture_dir(&root, "2024-06-01", "a");
        capture_dir(&root, "2024-06-03", "b");

        let storage = LocalStorage::new(root.path());
        let dates = vec!["2024-06-01".into(), "2024-06-02".into(), "2024-06-03".into()];
        let ids: Vec<String> = storage
            .scan_dates(dates)
            .await
            .into_iter()
            .map(|c| c.id)
            .collect();

        assert_eq!(ids, vec!["2024-06-01/a", "2024-06-03/b"]);
        assert!(logs_contain("could not read date directory"));
    }

    #[cfg(unix)]
    #[tokio::test]
    #[traced_test]
    async fn non_utf8_directory_names_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let root = TempDir::new().unwrap();
        let date = capture_dir(&root, "2024-07-01", "ok").parent().unwrap().to_path_buf();
        std_fs::create_dir_all(date.join(OsStr::from_bytes(b"bad\xff"))).unwrap();
        std_fs::create_dir_all(root.path().join(OsStr::from_bytes(b"\xff")).join("lost")).unwrap();

        let captures = LocalStorage::new(root.path()).list_captures().await;
        let ids: Vec<&str> = captures.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["2024-07-01/ok"]);
        assert!(logs_contain("non UTF-8"));
    }
}
