//! # Export Pipeline
//!
//! Serializes a rendered grid to a downloadable asset and attaches its
//! provenance metadata:
//!
//! - **Vector (SVG)**: one `<path>` per grid line, with the metadata JSON
//!   embedded in a namespaced `<tidegrid:asset>` element inside the
//!   standard `<metadata>` element. The block is delimited well enough to
//!   be located by a substring scan, no XML parser required, and
//!   re-extracting it reproduces the original [`AssetMetadata`] exactly.
//! - **Raster (PNG)**: PNG cannot carry structured metadata reliably, so a
//!   sibling JSON file with the same stem is written alongside. No metadata
//!   means no companion file.
//!
//! Writes are all-or-nothing: every byte is produced in memory first, files
//! land via a temp-file-and-rename, and a companion failure removes the
//! image it belonged to. A failed export leaves nothing behind.
//!
//! Overlapping exports to the same path are not coordinated; callers are
//! single-threaded by design.

use crate::grid::LinePath;
use crate::metadata::AssetMetadata;
use chrono::{DateTime, Utc};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, GrayImage, ImageEncoder, Luma};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Opening delimiter of the embedded metadata payload
const METADATA_OPEN: &str = "<tidegrid:asset xmlns:tidegrid=\"https://tidegrid.app/ns/1\">";
/// Closing delimiter of the embedded metadata payload
const METADATA_CLOSE: &str = "</tidegrid:asset>";

/// Errors that can occur while exporting an asset.
#[derive(Error, Debug)]
pub enum ExportError {
    /// File write or rename failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// PNG encoding failed
    #[error("image encoding error: {0}")]
    Image(#[from] image::error::ImageError),

    /// Metadata serialization failed
    #[error("metadata serialization error: {0}")]
    Metadata(#[from] serde_json::Error),

    /// The rendered line set was empty
    #[error("nothing to render")]
    NothingToRender,
}

/// Escape the five XML special characters for safe embedding in element
/// text content. Handles `&` first.
fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

/// Invert [`xml_escape`]. `&amp;` must be handled last so escaped
/// sequences don't unescape twice.
fn xml_unescape(input: &str) -> String {
    input
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Build the SVG `d` attribute for one line path.
///
/// Returns `None` for paths with fewer than 2 points (cannot form a
/// visible segment). Coordinates are written at 0.01 px precision.
fn line_to_path_d(line: &LinePath) -> Option<String> {
    if line.points.len() < 2 {
        return None;
    }
    Some(
        line.points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let cmd = if i == 0 { "M" } else { "L" };
                format!("{cmd} {:.2} {:.2}", p.x, p.y)
            })
            .collect::<Vec<_>>()
            .join(" "),
    )
}

/// Serialize a rendered grid into an SVG document string.
///
/// Emits one `<path>` per line, horizontals first then verticals exactly as
/// rendered. When `metadata` is present its JSON serialization is embedded
/// (XML-escaped) inside `<metadata><tidegrid:asset>`; [`extract_metadata`]
/// recovers it byte-for-byte.
pub fn to_svg(
    lines: &[LinePath],
    width: f64,
    height: f64,
    stroke_width: f64,
    metadata: Option<&AssetMetadata>,
) -> Result<String, ExportError> {
    let mut out = String::new();

    let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#,
    );

    if let Some(metadata) = metadata {
        let json = serde_json::to_string(metadata)?;
        let _ = writeln!(out, "  <metadata>");
        let _ = writeln!(out, "    {METADATA_OPEN}{}{METADATA_CLOSE}", xml_escape(&json));
        let _ = writeln!(out, "  </metadata>");
    }

    for line in lines {
        if let Some(d) = line_to_path_d(line) {
            let _ = writeln!(
                out,
                r#"  <path d="{d}" fill="none" stroke="black" stroke-width="{stroke_width}"/>"#,
            );
        }
    }

    let _ = writeln!(out, "</svg>");
    Ok(out)
}

/// Recover the embedded metadata record from an SVG document.
///
/// Scans for the namespaced delimiters rather than parsing the XML; absent,
/// truncated, or malformed blocks all yield `None`, never an error.
pub fn extract_metadata(svg: &str) -> Option<AssetMetadata> {
    let start = svg.find(METADATA_OPEN)? + METADATA_OPEN.len();
    let end = svg[start..].find(METADATA_CLOSE)? + start;
    let json = xml_unescape(&svg[start..end]);
    serde_json::from_str(&json).ok()
}

/// Write a vector export to `path`.
///
/// The whole document is serialized in memory and lands through a
/// temp-file-and-rename, so a failure leaves no partial file behind.
pub fn export_vector(
    path: &Path,
    lines: &[LinePath],
    width: f64,
    height: f64,
    stroke_width: f64,
    metadata: Option<&AssetMetadata>,
) -> Result<(), ExportError> {
    if lines.is_empty() {
        return Err(ExportError::NothingToRender);
    }

    let svg = to_svg(lines, width, height, stroke_width, metadata)?;
    write_atomically(path, svg.as_bytes())?;
    info!(path = %path.display(), "exported vector asset");
    Ok(())
}

/// Rasterize a rendered grid into a grayscale image: white background,
/// black strokes, one pixel wide.
pub fn render_raster(lines: &[LinePath], width: u32, height: u32) -> GrayImage {
    let mut img = GrayImage::from_pixel(width, height, Luma([255u8]));
    for line in lines {
        for pair in line.points.windows(2) {
            draw_segment(&mut img, pair[0].x, pair[0].y, pair[1].x, pair[1].y);
        }
    }
    img
}

/// Plot one segment by stepping the longer axis one pixel at a time.
/// Samples outside the canvas are skipped, not clamped.
fn draw_segment(img: &mut GrayImage, x0: f64, y0: f64, x1: f64, y1: f64) {
    let dx = x1 - x0;
    let dy = y1 - y0;
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as u32;

    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let x = (x0 + dx * t).round();
        let y = (y0 + dy * t).round();
        if x >= 0.0 && y >= 0.0 && (x as u32) < img.width() && (y as u32) < img.height() {
            img.put_pixel(x as u32, y as u32, Luma([0u8]));
        }
    }
}

/// Companion metadata path for a raster export: same stem, `.json`.
pub fn companion_path(image_path: &Path) -> PathBuf {
    image_path.with_extension("json")
}

/// Write a raster export to `image_path`, with a same-stem JSON companion
/// when metadata is present.
///
/// Both artifacts are produced or neither is: the PNG is encoded in memory
/// before any write, and a companion failure removes the image again. With
/// no metadata only the image is written — never an empty companion.
pub fn export_raster(
    image_path: &Path,
    lines: &[LinePath],
    width: u32,
    height: u32,
    metadata: Option<&AssetMetadata>,
) -> Result<(), ExportError> {
    if lines.is_empty() {
        return Err(ExportError::NothingToRender);
    }

    // Serialize everything up front so no file exists when encoding fails
    let companion_json = metadata.map(serde_json::to_vec_pretty).transpose()?;

    let img = render_raster(lines, width, height);
    let mut png_bytes = Vec::new();
    PngEncoder::new(&mut png_bytes).write_image(
        img.as_raw(),
        width,
        height,
        ExtendedColorType::L8,
    )?;

    write_atomically(image_path, &png_bytes)?;

    if let Some(json) = companion_json {
        let companion = companion_path(image_path);
        if let Err(e) = write_atomically(&companion, &json) {
            // Keep the all-or-nothing contract
            let _ = fs::remove_file(image_path);
            return Err(e.into());
        }
    }

    info!(path = %image_path.display(), "exported raster asset");
    Ok(())
}

/// Read back the companion metadata for a raster export.
///
/// Missing, unreadable, or malformed companion files all yield `None`.
pub fn read_companion_metadata(image_path: &Path) -> Option<AssetMetadata> {
    let bytes = fs::read(companion_path(image_path)).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Generate an export filename: `{tool}-{compact UTC timestamp}[-suffix].{ext}`.
///
/// The timestamp is ISO 8601 with separators stripped, so filenames sort
/// lexically in time order.
pub fn export_filename(
    tool: &str,
    extension: &str,
    suffix: Option<&str>,
    now: DateTime<Utc>,
) -> String {
    let stamp = now.format("%Y%m%dT%H%M%SZ");
    match suffix {
        Some(suffix) => format!("{tool}-{stamp}-{suffix}.{extension}"),
        None => format!("{tool}-{stamp}.{extension}"),
    }
}

/// Write `bytes` to `path` through a sibling temp file and rename, so the
/// destination never holds a partial write.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), std::io::Error> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
