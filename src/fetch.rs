//! Download of the word list spreadsheet

use crate::{
    config::Source,
    progress::{ProgressConfig, ProgressReport, Work},
    Result,
};
use anyhow::Context;
use futures::stream::StreamExt;
use reqwest::Response;
use std::{
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};
use tokio::{
    fs::{self, File},
    io::{AsyncRead, AsyncWriteExt, BufWriter},
};
use tokio_util::io::StreamReader;

/// Set up an HTTP client that impersonates a web browser
pub fn make_client(source: &Source) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(&*source.user_agent)
        .timeout(source.timeout)
        .build()
        .context("setting up the HTTP client")
}

/// Download the word list to `dest`, returning the number of bytes written
///
/// The body is first written next to `dest`, and only moved into place once
/// the whole download succeeded, so a failed download never leaves a
/// truncated spreadsheet behind.
pub async fn download(
    source: &Source,
    client: &reqwest::Client,
    dest: &Path,
    report: &ProgressReport,
) -> Result<u64> {
    // Start the download
    let url = &*source.url;
    let context = || format!("initiating download of {url}");
    let response = client
        .get(url)
        .send()
        .await
        .and_then(Response::error_for_status)
        .with_context(context)?;
    log::info!("Downloading {url} ({:?})", response.status());

    // Track downloaded bytes when the server tells how many there will be
    let bytes = report.add(
        "Downloading word list",
        ProgressConfig::new(Work::Bytes(0)).allow_adding_work(),
    );
    let content_length = response.content_length();
    match content_length {
        Some(len) => bytes.add_work(len),
        None => log::debug!("Server did not announce the size of {url}"),
    }
    bytes.done_adding_work();

    // Stream the body into a temporary file
    let tracker = bytes.clone();
    let body = StreamReader::new(response.bytes_stream().map(move |res| {
        res
            // Track how many bytes have been downloaded so far
            .inspect(|bytes_block| {
                if content_length.is_some() {
                    tracker.make_progress(bytes_block.len() as u64);
                }
            })
            // Translate reqwest errors into I/O errors
            .map_err(|e| io::Error::new(ErrorKind::Other, Box::new(e)))
    }));
    let partial = partial_path(dest);
    let written = match save_body(body, &partial).await {
        Ok(written) => written,
        Err(e) => {
            // Don't leave a truncated download lying around
            match fs::remove_file(&partial).await {
                Ok(()) => log::debug!("Removed partial download {}", partial.display()),
                Err(rm) if rm.kind() == ErrorKind::NotFound => {}
                Err(rm) => log::warn!("Failed to remove {}: {rm}", partial.display()),
            }
            return Err(e)
                .with_context(|| format!("downloading {url} into {}", partial.display()));
        }
    };
    if content_length.is_none() {
        bytes.finish();
    }

    // Move the finished download into place
    fs::rename(&partial, dest)
        .await
        .with_context(|| format!("moving the download to {}", dest.display()))?;
    log::info!("Saved {written} bytes from {url} into {}", dest.display());
    Ok(written)
}

/// Write a response body into a new file
async fn save_body(body: impl AsyncRead, path: &Path) -> io::Result<u64> {
    let mut body = std::pin::pin!(body);
    let mut file = BufWriter::new(File::create(path).await?);
    let written = tokio::io::copy(&mut body, &mut file).await?;
    file.flush().await?;
    Ok(written)
}

/// Where a download is written while it's in progress
fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_owned();
    name.push(".part");
    dest.with_file_name(name)
}
