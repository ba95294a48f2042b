//! Classifies a lot's image attachments for publication.
//!
//! Lots store their images as a JSON array of file paths. Paths that no
//! longer exist on disk are silently dropped: a lot with some broken images
//! should still publish with whatever is left.

use std::path::{Path, PathBuf};
use tracing::warn;

/// How a lot's images will be sent to the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedMedia {
    /// No usable image: plain text message.
    None,
    /// Exactly one usable image: photo with the lot text as caption.
    Single(PathBuf),
    /// Two or more usable images: album first, lot text as a separate message.
    Album(Vec<PathBuf>),
}

/// Parse the raw JSON image list off a lot. Malformed JSON is treated as
/// "no images" (logged), never as a publish-stopping error.
pub fn listed_images(images_json: Option<&str>) -> Vec<String> {
    let Some(raw) = images_json else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(paths) => paths,
        Err(err) => {
            warn!(target: "channel.media", error = %err, "failed to parse lot image list");
            Vec::new()
        }
    }
}

/// Filter the listed paths to files that exist and classify the result.
pub fn resolve_media(paths: &[String]) -> ResolvedMedia {
    let mut valid: Vec<PathBuf> = Vec::with_capacity(paths.len());
    for path in paths {
        if Path::new(path).exists() {
            valid.push(PathBuf::from(path));
        } else {
            warn!(target: "channel.media", path = %path, "image file missing, skipping");
        }
    }

    if valid.is_empty() {
        ResolvedMedia::None
    } else if valid.len() == 1 {
        ResolvedMedia::Single(valid.remove(0))
    } else {
        ResolvedMedia::Album(valid)
    }
}
