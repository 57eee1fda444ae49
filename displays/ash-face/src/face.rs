//! The robot's face

use ash_core::traits::FaceDisplay;
use ash_core::Expression;
use tracing::{debug, info, warn};

use crate::backend::FaceBackend;
use crate::cache::FaceCache;

/// Cached expressions shown on one backend
pub struct Face {
    backend: Box<dyn FaceBackend>,
    cache: FaceCache,
    current: Option<Expression>,
    closed: bool,
}

impl Face {
    pub fn new(backend: Box<dyn FaceBackend>, cache: FaceCache) -> Self {
        info!(
            backend = backend.kind(),
            expressions = cache.len(),
            "Face display ready"
        );
        Self {
            backend,
            cache,
            current: None,
            closed: false,
        }
    }
}

impl FaceDisplay for Face {
    fn set_expression(&mut self, expression: Expression) -> bool {
        if self.closed {
            return false;
        }
        let Some(frame) = self.cache.get(expression) else {
            warn!(%expression, "Expression not loaded");
            return false;
        };
        match self.backend.show(frame) {
            Ok(()) => {
                debug!(%expression, "Expression shown");
                self.current = Some(expression);
                true
            }
            Err(e) => {
                warn!(%expression, "Could not show expression: {}", e);
                false
            }
        }
    }

    fn current_expression(&self) -> Option<Expression> {
        self.current
    }

    fn clear(&mut self) {
        if self.closed {
            return;
        }
        match self.backend.blank() {
            Ok(()) => self.current = None,
            Err(e) => warn!("Could not clear display: {}", e),
        }
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        // Already blank after an explicit clear
        if self.current.is_some() {
            self.clear();
        }
        self.closed = true;
        self.backend.release();
        info!("Face display closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FaceError;
    use ash_drivers::display::Frame;
    use image::Rgb;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        log: Log,
        broken: bool,
    }

    impl FaceBackend for Recorder {
        fn kind(&self) -> &'static str {
            "recorder"
        }

        fn show(&mut self, frame: &Frame) -> Result<(), FaceError> {
            if self.broken {
                return Err(FaceError::Framebuffer {
                    path: "/dev/fb1".into(),
                    source: std::io::ErrorKind::BrokenPipe.into(),
                });
            }
            self.log.borrow_mut().push(format!("show:{:?}", frame.pixel(0, 0)));
            Ok(())
        }

        fn blank(&mut self) -> Result<(), FaceError> {
            self.log.borrow_mut().push("blank".into());
            Ok(())
        }

        fn release(&mut self) {
            self.log.borrow_mut().push("release".into());
        }
    }

    fn face(broken: bool) -> (Face, Log) {
        let log: Log = Rc::default();
        let mut cache = FaceCache::default();
        cache.insert(Expression::Happy, Frame::solid(2, 2, Rgb([1, 1, 1])));
        let backend = Recorder {
            log: Rc::clone(&log),
            broken,
        };
        (Face::new(Box::new(backend), cache), log)
    }

    #[test]
    fn test_loaded_expression_shown() {
        let (mut face, log) = face(false);
        assert!(face.set_expression(Expression::Happy));
        assert_eq!(face.current_expression(), Some(Expression::Happy));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_unloaded_expression_rejected() {
        let (mut face, log) = face(false);
        assert!(face.set_expression(Expression::Happy));
        assert!(!face.set_expression(Expression::Sad));
        assert_eq!(face.current_expression(), Some(Expression::Happy));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_backend_failure_keeps_previous() {
        let (mut face, _) = face(true);
        assert!(!face.set_expression(Expression::Happy));
        assert_eq!(face.current_expression(), None);
    }

    #[test]
    fn test_clear_and_close() {
        let (mut face, log) = face(false);
        face.set_expression(Expression::Happy);
        face.clear();
        assert_eq!(face.current_expression(), None);

        face.close();
        face.close();
        assert_eq!(log.borrow()[1..], ["blank".to_string(), "release".to_string()]);
        assert!(!face.set_expression(Expression::Happy));
    }

    #[test]
    fn test_close_blanks_a_showing_face() {
        let (mut face, log) = face(false);
        face.set_expression(Expression::Happy);
        face.close();
        assert_eq!(log.borrow()[1..], ["blank".to_string(), "release".to_string()]);
    }
}
