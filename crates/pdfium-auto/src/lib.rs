//! # pdfium-auto
//!
//! Locate a [PDFium](https://pdfium.googlesource.com/pdfium/) shared library
//! for `pdfium-render`, downloading and caching it on first use so callers
//! never have to install libpdfium or set `LD_LIBRARY_PATH` by hand.
//!
//! ## Resolution order
//!
//! 1. `PDFIUM_LIB_PATH`, when it points to an existing file.
//! 2. The per-version cache directory (see [`pdfium_cache_dir`]).
//! 3. A download of the platform archive from
//!    [bblanchon/pdfium-binaries](https://github.com/bblanchon/pdfium-binaries),
//!    unpacked into the cache directory.
//!
//! The resolved path is memoised for the lifetime of the process.
//!
//! ```rust,no_run
//! use pdfium_auto::{bind_pdfium_silent, ensure_pdfium_library, bind_pdfium_from_path};
//!
//! let pdfium = bind_pdfium_silent().expect("PDFium unavailable");
//!
//! let path = ensure_pdfium_library(Some(&|done, total| {
//!     eprint!("\r{done}/{}", total.unwrap_or(0));
//! })).expect("download failed");
//! let pdfium = bind_pdfium_from_path(&path).expect("bind failed");
//! ```

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use pdfium_render::prelude::Pdfium;
use thiserror::Error;
use tracing::{debug, info, warn};

/// The pdfium-binaries release tag used for downloads.
pub const PDFIUM_VERSION: &str = "7690";

/// Environment variable naming an existing PDFium library.
pub const LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Environment variable overriding the cache root.
pub const CACHE_DIR_ENV: &str = "PDFIUM_AUTO_CACHE_DIR";

const RELEASE_BASE_URL: &str = "https://github.com/bblanchon/pdfium-binaries/releases/download";
const CACHE_NAMESPACE: &str = "pdftext";

/// Errors returned while locating or binding PDFium.
#[derive(Error, Debug)]
pub enum PdfiumAutoError {
    #[error("no PDFium build is published for {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("cannot prepare cache directory '{path}': {source}")]
    CacheDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("PDFium download failed: {0}")]
    Download(String),

    #[error("PDFium archive extraction failed: {0}")]
    Extract(String),

    #[error("failed to bind PDFium from '{path}': {reason}")]
    Bind { path: PathBuf, reason: String },
}

/// Release asset for one OS/architecture pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PlatformAsset {
    archive: &'static str,
    member: &'static str,
    file_name: &'static str,
}

const fn asset(archive: &'static str, member: &'static str, file_name: &'static str) -> PlatformAsset {
    PlatformAsset {
        archive,
        member,
        file_name,
    }
}

const ASSETS: &[(&str, &str, PlatformAsset)] = &[
    ("linux", "x86_64", asset("pdfium-linux-x64.tgz", "lib/libpdfium.so", "libpdfium.so")),
    ("linux", "aarch64", asset("pdfium-linux-arm64.tgz", "lib/libpdfium.so", "libpdfium.so")),
    ("macos", "x86_64", asset("pdfium-mac-x64.tgz", "lib/libpdfium.dylib", "libpdfium.dylib")),
    ("macos", "aarch64", asset("pdfium-mac-arm64.tgz", "lib/libpdfium.dylib", "libpdfium.dylib")),
    ("windows", "x86_64", asset("pdfium-win-x64.tgz", "bin/pdfium.dll", "pdfium.dll")),
    ("windows", "aarch64", asset("pdfium-win-arm64.tgz", "bin/pdfium.dll", "pdfium.dll")),
    ("windows", "x86", asset("pdfium-win-x86.tgz", "bin/pdfium.dll", "pdfium.dll")),
];

fn platform_asset(os: &str, arch: &str) -> Result<PlatformAsset, PdfiumAutoError> {
    ASSETS
        .iter()
        .find(|(o, a, _)| *o == os && *a == arch)
        .map(|(_, _, asset)| *asset)
        .ok_or_else(|| PdfiumAutoError::UnsupportedPlatform {
            os: os.to_string(),
            arch: arch.to_string(),
        })
}

fn current_asset() -> Result<PlatformAsset, PdfiumAutoError> {
    platform_asset(std::env::consts::OS, std::env::consts::ARCH)
}

/// Per-version cache directory for the PDFium library.
///
/// Defaults to `{cache_dir}/pdftext/pdfium-{VERSION}`; the root can be
/// replaced with `PDFIUM_AUTO_CACHE_DIR`.
pub fn pdfium_cache_dir() -> PathBuf {
    let versioned = format!("pdfium-{PDFIUM_VERSION}");
    if let Some(root) = std::env::var_os(CACHE_DIR_ENV) {
        return PathBuf::from(root).join(versioned);
    }

    dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
        .unwrap_or_else(std::env::temp_dir)
        .join(CACHE_NAMESPACE)
        .join(versioned)
}

fn env_library_path() -> Option<PathBuf> {
    let path = PathBuf::from(std::env::var_os(LIB_PATH_ENV)?);
    if path.is_file() {
        Some(path)
    } else {
        warn!(path = %path.display(), "{LIB_PATH_ENV} does not point to a file; ignoring");
        None
    }
}

/// Path of a PDFium library that can be bound without network access.
pub fn cached_pdfium_path() -> Option<PathBuf> {
    if let Some(path) = env_library_path() {
        return Some(path);
    }
    let asset = current_asset().ok()?;
    let path = pdfium_cache_dir().join(asset.file_name);
    path.is_file().then_some(path)
}

/// `true` when [`ensure_pdfium_library`] will not need to download.
pub fn is_pdfium_cached() -> bool {
    cached_pdfium_path().is_some()
}

static RESOLVED: OnceLock<PathBuf> = OnceLock::new();

/// Make sure a PDFium library is available locally and return its path.
///
/// `on_progress` receives `(bytes_downloaded, total_bytes)` while a download
/// is in flight.
pub fn ensure_pdfium_library(
    on_progress: Option<&dyn Fn(u64, Option<u64>)>,
) -> Result<PathBuf, PdfiumAutoError> {
    if let Some(path) = RESOLVED.get() {
        return Ok(path.clone());
    }

    let path = match cached_pdfium_path() {
        Some(path) => path,
        None => download_library(on_progress)?,
    };
    debug!(path = %path.display(), "PDFium library resolved");

    // A concurrent caller may have won the race; both paths are equivalent.
    let _ = RESOLVED.set(path.clone());
    Ok(path)
}

/// Bind to PDFium, downloading it first if necessary.
pub fn bind_pdfium(
    on_progress: Option<&dyn Fn(u64, Option<u64>)>,
) -> Result<Pdfium, PdfiumAutoError> {
    let path = ensure_pdfium_library(on_progress)?;
    bind_pdfium_from_path(&path)
}

/// Bind to PDFium without progress reporting.
pub fn bind_pdfium_silent() -> Result<Pdfium, PdfiumAutoError> {
    bind_pdfium(None)
}

/// Bind to the PDFium library at `path`, bypassing the cache.
pub fn bind_pdfium_from_path(path: &Path) -> Result<Pdfium, PdfiumAutoError> {
    Pdfium::bind_to_library(path)
        .map(Pdfium::new)
        .map_err(|e| PdfiumAutoError::Bind {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

fn download_library(
    on_progress: Option<&dyn Fn(u64, Option<u64>)>,
) -> Result<PathBuf, PdfiumAutoError> {
    let asset = current_asset()?;
    let cache_dir = pdfium_cache_dir();
    fs::create_dir_all(&cache_dir).map_err(|source| PdfiumAutoError::CacheDir {
        path: cache_dir.clone(),
        source,
    })?;

    let url = format!(
        "{RELEASE_BASE_URL}/chromium%2F{PDFIUM_VERSION}/{}",
        asset.archive
    );
    info!(%url, "downloading PDFium");

    let archive = fetch(&url, on_progress)?;
    let dest = cache_dir.join(asset.file_name);
    unpack_member(&archive, asset.member, &dest)?;

    info!(path = %dest.display(), "PDFium cached");
    Ok(dest)
}

/// `Read` adapter that reports cumulative progress after every read.
struct ProgressReader<'a, R> {
    inner: R,
    read: u64,
    total: Option<u64>,
    on_progress: Option<&'a dyn Fn(u64, Option<u64>)>,
}

impl<R: Read> Read for ProgressReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.read += n as u64;
        if let Some(cb) = self.on_progress {
            cb(self.read, self.total);
        }
        Ok(n)
    }
}

fn fetch(url: &str, on_progress: Option<&dyn Fn(u64, Option<u64>)>) -> Result<Vec<u8>, PdfiumAutoError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("pdfium-auto/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| PdfiumAutoError::Download(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| PdfiumAutoError::Download(format!("GET {url}: {e}")))?;
    if !response.status().is_success() {
        return Err(PdfiumAutoError::Download(format!(
            "HTTP {} for {url}",
            response.status()
        )));
    }

    let total = response.content_length();
    let mut reader = ProgressReader {
        inner: response,
        read: 0,
        total,
        on_progress,
    };
    let mut bytes = Vec::with_capacity(total.unwrap_or(0) as usize);
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| PdfiumAutoError::Download(format!("reading body of {url}: {e}")))?;
    Ok(bytes)
}

/// Unpack `member` from a gzipped tarball to `dest`.
///
/// The file is written next to `dest` first and renamed into place, so an
/// interrupted extraction never leaves a truncated library in the cache.
fn unpack_member(archive: &[u8], member: &str, dest: &Path) -> Result<(), PdfiumAutoError> {
    let mut tarball = tar::Archive::new(flate2::read::GzDecoder::new(archive));
    let entries = tarball
        .entries()
        .map_err(|e| PdfiumAutoError::Extract(e.to_string()))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| PdfiumAutoError::Extract(e.to_string()))?;
        let is_member = entry
            .path()
            .map(|p| p.as_ref() == Path::new(member))
            .map_err(|e| PdfiumAutoError::Extract(e.to_string()))?;
        if !is_member {
            continue;
        }

        let partial = dest.with_extension("partial");
        entry
            .unpack(&partial)
            .map_err(|e| PdfiumAutoError::Extract(format!("unpacking {member}: {e}")))?;
        fs::rename(&partial, dest)
            .map_err(|e| PdfiumAutoError::Extract(format!("moving {member} into cache: {e}")))?;
        return Ok(());
    }

    Err(PdfiumAutoError::Extract(format!(
        "'{member}' not present in archive"
    )))
}
