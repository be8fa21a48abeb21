//! PNG export with embedded pixel density.
//!
//! Files are written with a pHYs chunk carrying 72 dpi times the capture
//! scale, so viewers that honor density display a Retina screenshot at its
//! logical size instead of twice as large.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::{
    error::{Error, Result},
    frame::Capture,
};

/// Baseline density of a 1x point.
const BASE_DPI: f64 = 72.0;
const METERS_PER_INCH: f64 = 0.0254;

/// Strip a window title or app name down to a filename-safe token.
///
/// Keeps alphanumerics and spaces, drops everything else, trims the ends,
/// then maps each remaining space to an underscore (interior runs stay
/// runs). May return an empty string, in which case the caller omits the
/// component entirely.
pub fn sanitize_component(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ')
        .collect();
    kept.trim().replace(' ', "_")
}

/// Compose the output filename: timestamp, then the sanitized owner and
/// title when non-empty.
pub fn screenshot_filename(now: &DateTime<Local>, owner: &str, title: &str) -> String {
    let mut name = now.format("%m%d%H%M%S").to_string();
    for part in [sanitize_component(owner), sanitize_component(title)] {
        if !part.is_empty() {
            name.push('_');
            name.push_str(&part);
        }
    }
    name.push_str(".png");
    name
}

/// Write `capture` as a PNG into `dir`, named after the current time and the
/// window's owner and title. Returns the full path of the written file.
pub fn export_png(capture: &Capture, dir: &Path, owner: &str, title: &str) -> Result<PathBuf> {
    let path = dir.join(screenshot_filename(&Local::now(), owner, title));
    write_png(capture, &path)?;
    info!("export_png: wrote {}", path.display());
    Ok(path)
}

/// Write `capture` to an explicit path.
pub(crate) fn write_png(capture: &Capture, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    encode_png(capture, BufWriter::new(file))?;
    Ok(())
}

/// Encode `capture` as PNG onto any writer, embedding the pixel density
/// derived from the capture scale.
pub(crate) fn encode_png<W: Write>(
    capture: &Capture,
    out: W,
) -> std::result::Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(out, capture.image.width(), capture.image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let ppu = pixels_per_meter(capture.scale);
    encoder.set_pixel_dims(Some(png::PixelDimensions {
        xppu: ppu,
        yppu: ppu,
        unit: png::Unit::Meter,
    }));
    let mut writer = encoder.write_header()?;
    writer.write_image_data(capture.image.as_raw())?;
    Ok(())
}

/// pHYs pixels-per-meter for a backing scale.
fn pixels_per_meter(scale: f64) -> u32 {
    let s = if scale > 0.0 { scale } else { 1.0 };
    if !(BASE_DPI * s / METERS_PER_INCH).is_finite() {
        warn!("pixels_per_meter: non-finite density for scale {scale}");
        return (BASE_DPI / METERS_PER_INCH).round() as u32;
    }
    (BASE_DPI * s / METERS_PER_INCH).round() as u32
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use image::RgbaImage;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn sanitize_drops_punctuation() {
        assert_eq!(sanitize_component("Safari!!"), "Safari");
        assert_eq!(sanitize_component("My Doc.txt"), "My_Doctxt");
    }

    #[test]
    fn sanitize_maps_each_space_and_trims_ends() {
        assert_eq!(sanitize_component("a  b"), "a__b");
        assert_eq!(sanitize_component("  a b  "), "a_b");
        assert_eq!(sanitize_component("***"), "");
    }

    #[test]
    fn filename_includes_owner_and_title() {
        let t = Local.with_ymd_and_hms(2026, 3, 5, 7, 9, 2).unwrap();
        assert_eq!(
            screenshot_filename(&t, "Safari", "My Page"),
            "0305070902_Safari_My_Page.png"
        );
    }

    #[test]
    fn filename_omits_empty_components() {
        let t = Local.with_ymd_and_hms(2026, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(screenshot_filename(&t, "", ""), "1231235959.png");
        assert_eq!(screenshot_filename(&t, "***", "App"), "1231235959_App.png");
    }

    #[test]
    fn density_round_trips_through_phys_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        let cap = Capture::from_pixels(RgbaImage::new(8, 6), 2.0);
        write_png(&cap, &path).unwrap();

        let decoder = png::Decoder::new(File::open(&path).unwrap());
        let reader = decoder.read_info().unwrap();
        let dims = reader.info().pixel_dims.unwrap();
        assert_eq!(dims.unit, png::Unit::Meter);

        // Recover the scale: ppm -> dpi -> scale, then logical size.
        let dpi = f64::from(dims.xppu) * METERS_PER_INCH;
        let scale = dpi / BASE_DPI;
        assert!((scale - 2.0).abs() < 0.01);
        let logical_w = (f64::from(reader.info().width) / scale).round() as u32;
        let logical_h = (f64::from(reader.info().height) / scale).round() as u32;
        assert_eq!((logical_w, logical_h), (4, 3));
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let cap = Capture::from_pixels(RgbaImage::new(2, 2), 1.0);
        let err = write_png(&cap, Path::new("/definitely/not/here/x.png")).unwrap_err();
        assert!(matches!(err, Error::Write { .. }));
    }

    proptest! {
        #[test]
        fn sanitized_output_is_filename_safe(raw in "\\PC{0,64}") {
            let out = sanitize_component(&raw);
            prop_assert!(out.chars().all(|c| c.is_alphanumeric() || c == '_'));
            prop_assert!(!out.contains('/'));
        }
    }
}
