// SPDX-License-Identifier: MPL-2.0
//! Provisioning of the enhancement model artifact.
//!
//! The model ships as a zip archive behind a share link. On first use the
//! archive is downloaded into the data directory, optionally verified with a
//! BLAKE3 checksum, unpacked, and the ONNX file inside it is located.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// Result type for provisioning operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Errors that can occur while provisioning the model.
#[derive(Debug, Clone)]
pub enum ArchiveError {
    /// Failed to download the archive.
    DownloadFailed(String),
    /// Archive checksum verification failed.
    ChecksumMismatch { expected: String, actual: String },
    /// The archive could not be read or unpacked.
    CorruptArchive(String),
    /// No model file was found after unpacking.
    ModelNotFound(PathBuf),
    /// IO error occurred.
    Io(String),
}

impl std::fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArchiveError::DownloadFailed(msg) => write!(f, "Download failed: {msg}"),
            ArchiveError::ChecksumMismatch { expected, actual } => {
                write!(f, "Checksum mismatch: expected {expected}, got {actual}")
            }
            ArchiveError::CorruptArchive(msg) => write!(f, "Corrupt model archive: {msg}"),
            ArchiveError::ModelNotFound(dir) => {
                write!(f, "No .onnx model found in {}", dir.display())
            }
            ArchiveError::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ArchiveError {}

impl From<io::Error> for ArchiveError {
    fn from(err: io::Error) -> Self {
        ArchiveError::Io(err.to_string())
    }
}

/// Where the model comes from and where it lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSource {
    /// Share or direct link to the zip archive.
    pub url: String,
    /// Optional BLAKE3 hash (lowercase hex) of the archive.
    pub checksum: Option<String>,
    /// Directory name created by unpacking the archive.
    pub directory: String,
    /// File name used for the downloaded archive.
    pub archive: String,
}

impl ModelSource {
    /// Directory holding the unpacked model.
    pub fn model_dir(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.directory)
    }

    /// Path the archive is downloaded to.
    pub fn archive_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.archive)
    }
}

/// Preferred model file name inside the unpacked directory.
pub const PREFERRED_MODEL_FILE: &str = "model.onnx";

/// Direct-download endpoint for Google Drive files.
const DRIVE_DOWNLOAD_ENDPOINT: &str = "https://drive.usercontent.google.com/download";

/// Rewrites share links to a URL that serves the file bytes.
///
/// Google Drive links of the forms `/file/d/<id>/view`, `open?id=<id>` and
/// `uc?id=<id>` point at an HTML viewer; they are rewritten to the
/// direct-download endpoint. Other URLs are returned unchanged.
pub fn resolve_download_url(url: &str) -> String {
    match drive_file_id(url) {
        Some(id) => format!("{DRIVE_DOWNLOAD_ENDPOINT}?id={id}&export=download&confirm=t"),
        None => url.to_string(),
    }
}

fn drive_file_id(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let rest = rest.strip_prefix("drive.google.com/")?;

    let id: Option<&str> = if let Some(path) = rest.strip_prefix("file/d/") {
        path.split(['/', '?', '#']).next()
    } else if rest.starts_with("open?") || rest.starts_with("uc?") {
        let (_, query) = rest.split_once('?')?;
        query
            .split(['&', '#'])
            .find_map(|pair| pair.strip_prefix("id="))
    } else {
        None
    };

    id.filter(|id| !id.is_empty())
}

/// Returns the model file inside `model_dir`.
///
/// A file named `model.onnx` wins; otherwise the first `.onnx` file found by a
/// sorted recursive walk is returned.
pub fn find_model_file(model_dir: &Path) -> Option<PathBuf> {
    if !model_dir.is_dir() {
        return None;
    }
    let mut candidates = Vec::new();
    collect_onnx_files(model_dir, &mut candidates);
    candidates.sort();

    candidates
        .iter()
        .find(|p| p.file_name().is_some_and(|n| n == PREFERRED_MODEL_FILE))
        .or_else(|| candidates.first())
        .cloned()
}

fn collect_onnx_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_onnx_files(&path, out);
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("onnx"))
        {
            out.push(path);
        }
    }
}

/// Checks whether the model has already been unpacked into the data directory.
pub fn is_provisioned(source: &ModelSource, data_dir: &Path) -> bool {
    find_model_file(&source.model_dir(data_dir)).is_some()
}

/// Downloads the archive at `url` to `dest`.
///
/// Returns the number of bytes downloaded.
pub async fn download_archive(
    url: &str,
    dest: &Path,
    mut progress_callback: impl FnMut(f32) + Send,
) -> ArchiveResult<u64> {
    use futures_util::StreamExt;
    use std::io::Write;

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::limited(10))
        .user_agent(concat!("IcedLumen/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ArchiveError::DownloadFailed(e.to_string()))?;

    tracing::info!(%url, dest = %dest.display(), "downloading model archive");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ArchiveError::DownloadFailed(e.to_string()))?;

    if !response.status().is_success() {
        return Err(ArchiveError::DownloadFailed(format!(
            "HTTP status: {}",
            response.status()
        )));
    }

    // Share links that need confirmation answer with an HTML page instead of the file.
    let is_html = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/html"));
    if is_html {
        return Err(ArchiveError::DownloadFailed(
            "Server returned an HTML page instead of the archive. The link may have changed or require confirmation.".to_string(),
        ));
    }

    let total_size = response.content_length().unwrap_or(0);

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = File::create(dest)?;

    let mut downloaded: u64 = 0;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                drop(file);
                let _ = std::fs::remove_file(dest);
                return Err(ArchiveError::DownloadFailed(e.to_string()));
            }
        };
        if let Err(e) = file.write_all(&chunk) {
            drop(file);
            let _ = std::fs::remove_file(dest);
            return Err(e.into());
        }

        downloaded += chunk.len() as u64;

        if total_size > 0 {
            progress_callback((downloaded as f32 / total_size as f32).min(1.0));
        }
    }

    if downloaded == 0 {
        drop(file);
        let _ = std::fs::remove_file(dest);
        return Err(ArchiveError::DownloadFailed(
            "Server returned an empty body".to_string(),
        ));
    }

    tracing::info!(bytes = downloaded, "model archive downloaded");
    Ok(downloaded)
}

/// Verifies the archive integrity using BLAKE3 hash.
pub fn verify_checksum(path: &Path, expected_hash: &str) -> ArchiveResult<()> {
    let actual_hash = compute_hash(path)?;

    if !actual_hash.eq_ignore_ascii_case(expected_hash.trim()) {
        return Err(ArchiveError::ChecksumMismatch {
            expected: expected_hash.to_string(),
            actual: actual_hash,
        });
    }

    Ok(())
}

/// Computes the BLAKE3 hash of a file.
pub fn compute_hash(path: &Path) -> ArchiveResult<String> {
    let mut hasher = blake3::Hasher::new();
    let mut file = File::open(path)?;
    io::copy(&mut file, &mut hasher)?;
    Ok(hasher.finalize().to_hex().to_string())
}

/// Unpacks every entry of the zip archive beneath `dest_root`.
///
/// Entries whose names would escape `dest_root` are skipped. Returns the
/// number of files written.
pub fn extract_archive(zip_path: &Path, dest_root: &Path) -> ArchiveResult<usize> {
    let file = File::open(zip_path)?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| ArchiveError::CorruptArchive(e.to_string()))?;

    std::fs::create_dir_all(dest_root)?;
    let mut written = 0;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| ArchiveError::CorruptArchive(e.to_string()))?;

        let Some(relative) = entry.enclosed_name().map(Path::to_path_buf) else {
            tracing::warn!(name = entry.name(), "skipping archive entry outside destination");
            continue;
        };
        let outpath = dest_root.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&outpath)?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut outfile = File::create(&outpath)?;
        io::copy(&mut entry, &mut outfile)
            .map_err(|e| ArchiveError::CorruptArchive(e.to_string()))?;
        written += 1;
    }

    tracing::info!(files = written, dest = %dest_root.display(), "model archive extracted");
    Ok(written)
}

/// Stage reported while provisioning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProvisionStage {
    Downloading(f32),
    Extracting,
}

/// Ensures the model exists in `data_dir`, fetching and unpacking it if absent.
///
/// Returns the path of the model file.
pub async fn provision(
    source: &ModelSource,
    data_dir: &Path,
    mut on_stage: impl FnMut(ProvisionStage) + Send,
) -> ArchiveResult<PathBuf> {
    let model_dir = source.model_dir(data_dir);
    if let Some(model) = find_model_file(&model_dir) {
        tracing::debug!(path = %model.display(), "model already provisioned");
        return Ok(model);
    }

    let archive_path = source.archive_path(data_dir);
    let url = resolve_download_url(&source.url);
    on_stage(ProvisionStage::Downloading(0.0));
    download_archive(&url, &archive_path, |p| {
        on_stage(ProvisionStage::Downloading(p));
    })
    .await?;

    on_stage(ProvisionStage::Extracting);
    let source = source.clone();
    let data_dir = data_dir.to_path_buf();
    tokio::task::spawn_blocking(move || unpack_downloaded(&source, &archive_path, &data_dir))
        .await
        .map_err(|e| ArchiveError::Io(format!("Extraction task failed: {e}")))?
}

/// Verifies and unpacks an already downloaded archive, then locates the model.
///
/// The archive is unpacked into a staging directory next to the model
/// directory, which is only replaced once the new model has been found. The
/// archive and the staging directory are deleted afterwards, whether
/// unpacking succeeded or not.
pub fn unpack_downloaded(
    source: &ModelSource,
    archive_path: &Path,
    data_dir: &Path,
) -> ArchiveResult<PathBuf> {
    let staging = staging_dir(source, data_dir);
    let result = remove_dir_if_present(&staging)
        .and_then(|()| verify_and_extract(source, archive_path, &staging))
        .and_then(|()| install_staged(source, &staging, data_dir));

    if let Err(e) = std::fs::remove_file(archive_path) {
        tracing::warn!(path = %archive_path.display(), error = %e, "could not remove model archive");
    }
    if let Err(e) = remove_dir_if_present(&staging) {
        tracing::warn!(path = %staging.display(), error = %e, "could not remove staging directory");
    }
    result
}

/// Deletes the unpacked model so the next [`provision`] downloads it again.
///
/// Used when the model on disk cannot be loaded. A missing directory is not
/// an error.
pub fn discard_model(source: &ModelSource, data_dir: &Path) -> ArchiveResult<()> {
    let model_dir = source.model_dir(data_dir);
    remove_dir_if_present(&model_dir)?;
    tracing::info!(path = %model_dir.display(), "discarded unusable model");
    Ok(())
}

fn staging_dir(source: &ModelSource, data_dir: &Path) -> PathBuf {
    data_dir.join(format!(".{}.partial", source.directory))
}

fn remove_dir_if_present(dir: &Path) -> ArchiveResult<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn verify_and_extract(source: &ModelSource, archive_path: &Path, dest: &Path) -> ArchiveResult<()> {
    if let Some(expected) = source.checksum.as_deref().filter(|c| !c.is_empty()) {
        verify_checksum(archive_path, expected)?;
    }
    extract_archive(archive_path, dest)?;
    Ok(())
}

/// Moves the staged model directory into place.
fn install_staged(source: &ModelSource, staging: &Path, data_dir: &Path) -> ArchiveResult<PathBuf> {
    let model_dir = source.model_dir(data_dir);
    let staged = staging.join(&source.directory);
    if find_model_file(&staged).is_none() {
        return Err(ArchiveError::ModelNotFound(model_dir));
    }

    remove_dir_if_present(&model_dir)?;
    std::fs::rename(&staged, &model_dir)?;
    find_model_file(&model_dir).ok_or(ArchiveError::ModelNotFound(model_dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    const DRIVE_ID: &str = "11Yq_mNMNVOGR9O0sHtBWZAPTNPX8UcnE";

    fn source(checksum: Option<String>) -> ModelSource {
        ModelSource {
            url: "https://example.invalid/model.zip".to_string(),
            checksum,
            directory: "mirnet_saved".to_string(),
            archive: "mirnet_saved.zip".to_string(),
        }
    }

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::FileOptions::default();
        for (name, data) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn drive_view_link_is_rewritten() {
        let url = format!("https://drive.google.com/file/d/{DRIVE_ID}/view?usp=sharing");
        let resolved = resolve_download_url(&url);
        assert_eq!(
            resolved,
            format!("{DRIVE_DOWNLOAD_ENDPOINT}?id={DRIVE_ID}&export=download&confirm=t")
        );
    }

    #[test]
    fn drive_open_and_uc_links_are_rewritten() {
        for url in [
            format!("https://drive.google.com/open?id={DRIVE_ID}"),
            format!("https://drive.google.com/uc?export=download&id={DRIVE_ID}"),
        ] {
            assert!(resolve_download_url(&url).contains(&format!("id={DRIVE_ID}&")));
        }
    }

    #[test]
    fn other_links_are_unchanged() {
        let url = "https://huggingface.co/org/repo/resolve/main/model.zip";
        assert_eq!(resolve_download_url(url), url);
        assert_eq!(
            resolve_download_url("https://drive.google.com/drive/folders/abc"),
            "https://drive.google.com/drive/folders/abc"
        );
    }

    #[test]
    fn find_model_file_prefers_model_onnx() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("a.onnx"), b"x").unwrap();
        std::fs::write(dir.path().join("nested").join("model.onnx"), b"x").unwrap();

        let found = find_model_file(dir.path()).unwrap();
        assert!(found.ends_with("nested/model.onnx"));
    }

    #[test]
    fn find_model_file_falls_back_to_first_sorted() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("b.ONNX"), b"x").unwrap();
        std::fs::write(dir.path().join("a.onnx"), b"x").unwrap();
        std::fs::write(dir.path().join("readme.txt"), b"x").unwrap();

        let found = find_model_file(dir.path()).unwrap();
        assert!(found.ends_with("a.onnx"));
    }

    #[test]
    fn find_model_file_missing_dir_is_none() {
        let dir = tempdir().unwrap();
        assert!(find_model_file(&dir.path().join("absent")).is_none());
        assert!(!is_provisioned(&source(None), dir.path()));
    }

    #[test]
    fn extract_archive_skips_escaping_entries() {
        let dir = tempdir().unwrap();
        let zip_path = dir.path().join("m.zip");
        write_zip(
            &zip_path,
            &[
                ("mirnet_saved/model.onnx", b"onnx"),
                ("../evil.txt", b"nope"),
            ],
        );
        let dest = dir.path().join("data");

        let written = extract_archive(&zip_path, &dest).unwrap();
        assert_eq!(written, 1);
        assert!(dest.join("mirnet_saved/model.onnx").exists());
        assert!(!dir.path().join("evil.txt").exists());
    }

    #[test]
    fn extract_archive_rejects_garbage() {
        let dir = tempdir().unwrap();
        let zip_path = dir.path().join("bad.zip");
        std::fs::write(&zip_path, b"definitely not a zip").unwrap();

        let err = extract_archive(&zip_path, dir.path()).unwrap_err();
        assert!(matches!(err, ArchiveError::CorruptArchive(_)));
    }

    #[test]
    fn checksum_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("file.bin");
        std::fs::write(&path, b"hello").unwrap();

        let hash = compute_hash(&path).unwrap();
        assert_eq!(hash, blake3::hash(b"hello").to_hex().to_string());
        assert!(verify_checksum(&path, &hash.to_uppercase()).is_ok());
        assert!(matches!(
            verify_checksum(&path, "00"),
            Err(ArchiveError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn unpack_downloaded_locates_model_and_removes_archive() {
        let dir = tempdir().unwrap();
        let src = source(None);
        let archive = src.archive_path(dir.path());
        write_zip(&archive, &[("mirnet_saved/model.onnx", b"onnx")]);

        let model = unpack_downloaded(&src, &archive, dir.path()).unwrap();
        assert_eq!(model, dir.path().join("mirnet_saved").join("model.onnx"));
        assert!(!archive.exists());
        assert!(is_provisioned(&src, dir.path()));
    }

    #[test]
    fn unpack_downloaded_rejects_bad_checksum() {
        let dir = tempdir().unwrap();
        let src = source(Some("deadbeef".to_string()));
        let archive = src.archive_path(dir.path());
        write_zip(&archive, &[("mirnet_saved/model.onnx", b"onnx")]);

        let err = unpack_downloaded(&src, &archive, dir.path()).unwrap_err();
        assert!(matches!(err, ArchiveError::ChecksumMismatch { .. }));
        assert!(!archive.exists());
        assert!(!is_provisioned(&src, dir.path()));
    }

    #[test]
    fn unpack_downloaded_without_model_reports_missing() {
        let dir = tempdir().unwrap();
        let src = source(None);
        let archive = src.archive_path(dir.path());
        write_zip(&archive, &[("mirnet_saved/saved_model.pb", b"pb")]);

        let err = unpack_downloaded(&src, &archive, dir.path()).unwrap_err();
        assert!(matches!(err, ArchiveError::ModelNotFound(_)));
    }

    #[tokio::test]
    async fn provision_skips_download_when_present() {
        let dir = tempdir().unwrap();
        let src = source(None);
        let model_dir = src.model_dir(dir.path());
        std::fs::create_dir_all(&model_dir).unwrap();
        std::fs::write(model_dir.join("model.onnx"), b"onnx").unwrap();

        let mut stages = Vec::new();
        let path = provision(&src, dir.path(), |s| stages.push(s)).await.unwrap();
        assert_eq!(path, model_dir.join("model.onnx"));
        assert!(stages.is_empty());
    }

    #[test]
    fn failed_extraction_leaves_no_model_behind() {
        let dir = tempdir().unwrap();
        let src = source(None);
        let archive = src.archive_path(dir.path());
        std::fs::write(&archive, b"PK\x03\x04 truncated").unwrap();

        let err = unpack_downloaded(&src, &archive, dir.path()).unwrap_err();
        assert!(matches!(err, ArchiveError::CorruptArchive(_)));
        assert!(!src.model_dir(dir.path()).exists());
        assert!(!staging_dir(&src, dir.path()).exists());
        assert!(!archive.exists());
    }

    #[test]
    fn unpack_replaces_previous_model() {
        let dir = tempdir().unwrap();
        let src = source(None);
        let model_dir = src.model_dir(dir.path());
        std::fs::create_dir_all(&model_dir).unwrap();
        std::fs::write(model_dir.join("stale.onnx"), b"old").unwrap();

        let archive = src.archive_path(dir.path());
        write_zip(&archive, &[("mirnet_saved/model.onnx", b"new")]);

        let model = unpack_downloaded(&src, &archive, dir.path()).unwrap();
        assert_eq!(std::fs::read(&model).unwrap(), b"new");
        assert!(!model_dir.join("stale.onnx").exists());
        assert!(!staging_dir(&src, dir.path()).exists());
    }

    #[test]
    fn discard_model_removes_directory() {
        let dir = tempdir().unwrap();
        let src = source(None);
        let model_dir = src.model_dir(dir.path());
        std::fs::create_dir_all(&model_dir).unwrap();
        std::fs::write(model_dir.join("model.onnx"), b"trunc").unwrap();

        discard_model(&src, dir.path()).unwrap();
        assert!(!is_provisioned(&src, dir.path()));
        // Nothing left to remove.
        discard_model(&src, dir.path()).unwrap();
    }

    // Local HTTP server answering every connection with the same response.
    async fn serve(response: Vec<u8>) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let _ = socket.write_all(&response).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{addr}/mirnet_saved.zip")
    }

    fn http_response(status: &str, content_type: &str, body: &[u8]) -> Vec<u8> {
        let mut response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        )
        .into_bytes();
        response.extend_from_slice(body);
        response
    }

    fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fixture.zip");
        write_zip(&path, entries);
        std::fs::read(path).unwrap()
    }

    #[tokio::test]
    async fn download_rejects_http_error_status() {
        let url = serve(http_response("404 Not Found", "text/plain", b"")).await;
        let dir = tempdir().unwrap();
        let dest = dir.path().join("model.zip");

        let err = download_archive(&url, &dest, |_| {}).await.unwrap_err();
        assert!(matches!(&err, ArchiveError::DownloadFailed(msg) if msg.contains("404")));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn download_rejects_html_page() {
        let page = b"<html><body>Virus scan warning</body></html>";
        let url = serve(http_response("200 OK", "text/html; charset=utf-8", page)).await;
        let dir = tempdir().unwrap();
        let dest = dir.path().join("model.zip");

        let err = download_archive(&url, &dest, |_| {}).await.unwrap_err();
        assert!(matches!(&err, ArchiveError::DownloadFailed(msg) if msg.contains("HTML")));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn download_rejects_empty_body() {
        let url = serve(http_response("200 OK", "application/zip", b"")).await;
        let dir = tempdir().unwrap();
        let dest = dir.path().join("model.zip");

        let err = download_archive(&url, &dest, |_| {}).await.unwrap_err();
        assert!(matches!(&err, ArchiveError::DownloadFailed(msg) if msg.contains("empty")));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn download_removes_partial_file() {
        let mut response =
            b"HTTP/1.1 200 OK\r\nContent-Type: application/zip\r\nContent-Length: 4096\r\nConnection: close\r\n\r\n"
                .to_vec();
        response.extend_from_slice(&[7u8; 100]);
        let url = serve(response).await;
        let dir = tempdir().unwrap();
        let dest = dir.path().join("model.zip");

        let err = download_archive(&url, &dest, |_| {}).await.unwrap_err();
        assert!(matches!(err, ArchiveError::DownloadFailed(_)));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn download_reports_progress_up_to_one() {
        let body: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        let url = serve(http_response("200 OK", "application/octet-stream", &body)).await;
        let dir = tempdir().unwrap();
        let dest = dir.path().join("model.zip");

        let mut progress = Vec::new();
        let bytes = download_archive(&url, &dest, |p| progress.push(p)).await.unwrap();

        assert_eq!(bytes, body.len() as u64);
        assert_eq!(std::fs::read(&dest).unwrap(), body);
        assert!(!progress.is_empty());
        assert!(progress.iter().all(|p| (0.0..=1.0).contains(p)));
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(progress.last().copied(), Some(1.0));
    }

    #[tokio::test]
    async fn provision_downloads_again_after_discarded_model() {
        let dir = tempdir().unwrap();
        let fresh = zip_bytes(&[("mirnet_saved/model.onnx", b"fresh")]);
        let mut src = source(None);
        src.url = serve(http_response("200 OK", "application/zip", &fresh)).await;

        // A truncated model left by an interrupted unpack.
        let model_dir = src.model_dir(dir.path());
        std::fs::create_dir_all(&model_dir).unwrap();
        std::fs::write(model_dir.join("model.onnx"), b"trunc").unwrap();

        // Loading it failed, so it is thrown away before retrying.
        discard_model(&src, dir.path()).unwrap();

        let mut stages = Vec::new();
        let model = provision(&src, dir.path(), |s| stages.push(s)).await.unwrap();

        assert_eq!(std::fs::read(&model).unwrap(), b"fresh");
        assert_eq!(stages.first(), Some(&ProvisionStage::Downloading(0.0)));
        assert_eq!(stages.last(), Some(&ProvisionStage::Extracting));
        assert!(!src.archive_path(dir.path()).exists());
    }
}
