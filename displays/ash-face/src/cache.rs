//! Expression image cache
//!
//! Every expression asset is decoded and fitted to the panel at startup so
//! that switching faces never touches the disk.

use std::collections::HashMap;
use std::path::Path;

use ash_core::Expression;
use ash_drivers::display::Frame;
use tracing::{debug, info, warn};

/// Decoded, panel-sized faces
#[derive(Debug, Default)]
pub struct FaceCache {
    frames: HashMap<Expression, Frame>,
}

impl FaceCache {
    /// Load `<expression>.png` for every expression from `dir`
    ///
    /// Missing or undecodable files are warned about and skipped.
    pub fn load(dir: &Path, width: u16, height: u16) -> Self {
        let mut cache = Self::default();
        if !dir.is_dir() {
            warn!(
                dir = %dir.display(),
                "Faces directory not found; expected one PNG per expression"
            );
            return cache;
        }

        for expression in Expression::ALL {
            let path = dir.join(expression.file_name());
            if !path.exists() {
                warn!(path = %path.display(), "Missing face image");
                continue;
            }
            match image::open(&path) {
                Ok(image) => {
                    let (frame, resized) = Frame::fit(&image, width, height);
                    if resized {
                        debug!(
                            %expression,
                            from_width = image.width(),
                            from_height = image.height(),
                            "Resized face"
                        );
                    }
                    cache.insert(expression, frame);
                }
                Err(e) => warn!(path = %path.display(), "Could not load face: {}", e),
            }
        }

        info!(loaded = cache.len(), dir = %dir.display(), "Face images cached");
        cache
    }

    pub fn insert(&mut self, expression: Expression, frame: Frame) {
        self.frames.insert(expression, frame);
    }

    pub fn get(&self, expression: Expression) -> Option<&Frame> {
        self.frames.get(&expression)
    }

    pub fn contains(&self, expression: Expression) -> bool {
        self.frames.contains_key(&expression)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
