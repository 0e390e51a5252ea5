//! Normalizes the two ways a user hands over a photo.
//!
//! Drag-and-drop and the file picker both end up as a single
//! [`FileAcquired`] event. Nothing here decides whether the file is valid;
//! that happens when the session loads it.

use crate::file_codec::SelectedFile;
use std::path::PathBuf;

/// Which input produced a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionSource {
    DragDrop,
    Picker,
}

/// A file the user selected, forwarded unchanged.
#[derive(Debug, Clone)]
pub struct FileAcquired {
    pub source: AcquisitionSource,
    pub file: SelectedFile,
}

/// Transient drag state of the drop target.
#[derive(Debug, Default)]
pub struct DropTarget {
    hovering: bool,
}

impl DropTarget {
    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn set_hovering(&mut self, hovering: bool) {
        self.hovering = hovering;
    }

    /// Handles a drop. Only the first file is taken; an empty drop is ignored.
    pub fn drop_files<I>(&mut self, files: I) -> Option<FileAcquired>
    where
        I: IntoIterator<Item = SelectedFile>,
    {
        self.hovering = false;
        files.into_iter().next().map(|file| FileAcquired {
            source: AcquisitionSource::DragDrop,
            file,
        })
    }
}

/// Handles the file picker closing. A cancelled dialog yields nothing.
pub fn picked(path: Option<PathBuf>) -> Option<FileAcquired> {
    path.map(|path| FileAcquired {
        source: AcquisitionSource::Picker,
        file: SelectedFile::from_path(path),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn bytes_file(name: &str) -> SelectedFile {
        SelectedFile::from_bytes(name, None, Arc::from(&b"x"[..]))
    }

    #[test]
    fn empty_drop_is_ignored_and_clears_hover() {
        let mut target = DropTarget::default();
        target.set_hovering(true);

        assert!(target.drop_files(Vec::new()).is_none());
        assert!(!target.is_hovering());
    }

    #[test]
    fn drop_takes_first_file_unchanged() {
        let mut target = DropTarget::default();
        let event = target
            .drop_files(vec![bytes_file("a.pdf"), bytes_file("b.png")])
            .unwrap();

        assert_eq!(event.source, AcquisitionSource::DragDrop);
        assert_eq!(event.file.name, "a.pdf");
    }

    #[test]
    fn picker_normalizes_to_same_event() {
        assert!(picked(None).is_none());

        let event = picked(Some(PathBuf::from("/photos/me.jpg"))).unwrap();
        assert_eq!(event.source, AcquisitionSource::Picker);
        assert_eq!(event.file.name, "me.jpg");
        assert_eq!(event.file.media_type, "image/jpeg");
    }
}
