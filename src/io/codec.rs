//! Image file glue over the `image` crate.

use std::path::{Path, PathBuf};

use crate::foundation::error::{FilterError, FilterResult};
use crate::io::buffer::{ColorSpace, PixelBuffer};

/// Decode an image file into premultiplied pixels held in `space`.
pub fn load_image(path: impl AsRef<Path>, space: ColorSpace) -> FilterResult<PixelBuffer> {
    let path = path.as_ref();
    let img = image::open(path)
        .map_err(|e| FilterError::image(format!("decode '{}': {e}", path.display())))?;
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    let (width, height) = match (u16::try_from(w), u16::try_from(h)) {
        (Ok(width), Ok(height)) => (width, height),
        _ => {
            return Err(FilterError::validation(format!(
                "'{}' is {w}x{h}; at most {max}x{max} is supported",
                path.display(),
                max = u16::MAX
            )));
        }
    };
    tracing::debug!(path = %path.display(), width, height, "loaded image");
    PixelBuffer::from_straight_rgba8(rgba.as_raw(), width, height, space)
}

/// Encode `buffer` to `path`, returning the path actually written.
///
/// An explicit extension on `path` picks the format. Without one, PNG is used when any pixel is
/// translucent and JPEG otherwise, and the matching extension is appended. JPEG output carries
/// no alpha channel.
pub fn save_image(
    buffer: &PixelBuffer,
    path: impl AsRef<Path>,
    space: ColorSpace,
) -> FilterResult<PathBuf> {
    if buffer.extent().is_empty() {
        return Err(FilterError::validation("cannot save an empty image"));
    }

    let mut path = path.as_ref().to_path_buf();
    let format = if path.extension().is_some() {
        image::ImageFormat::from_path(&path)
            .map_err(|e| FilterError::image(format!("output '{}': {e}", path.display())))?
    } else if buffer.has_transparency() {
        path.set_extension("png");
        image::ImageFormat::Png
    } else {
        path.set_extension("jpg");
        image::ImageFormat::Jpeg
    };

    let (bytes, color) = if format == image::ImageFormat::Jpeg {
        (buffer.to_straight_rgb8(space), image::ExtendedColorType::Rgb8)
    } else {
        (buffer.to_straight_rgba8(space), image::ExtendedColorType::Rgba8)
    };

    image::save_buffer_with_format(
        &path,
        &bytes,
        u32::from(buffer.width()),
        u32::from(buffer.height()),
        color,
        format,
    )
    .map_err(|e| FilterError::image(format!("write '{}': {e}", path.display())))?;
    Ok(path)
}

/// `<stem1>[-<stem2>]-<tag>.<png|jpg>`, the naming scheme for derived outputs.
///
/// Stems are the input file names without directory or final extension. The result has no
/// directory component.
pub fn output_file_name(
    input1: impl AsRef<Path>,
    input2: Option<&Path>,
    tag: &str,
    has_alpha: bool,
) -> PathBuf {
    let stem = |p: &Path| {
        p.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    };
    let mut name = stem(input1.as_ref());
    if let Some(second) = input2 {
        name.push('-');
        name.push_str(&stem(second));
    }
    name.push('-');
    name.push_str(tag);
    name.push_str(if has_alpha { ".png" } else { ".jpg" });
    PathBuf::from(name)
}

#[cfg(test)]
#[path = "../../tests/unit/io/codec.rs"]
mod tests;
