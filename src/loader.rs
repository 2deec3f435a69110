use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use image::DynamicImage;

use crate::error::{PickError, PickResult};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];
const DATA_EXTENSIONS: &[&str] = &["json"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadKind {
    Image,
    Points,
    Route,
}

impl LoadKind {
    fn slot(self) -> usize {
        match self {
            Self::Image => 0,
            Self::Points => 1,
            Self::Route => 2,
        }
    }

    fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Image => IMAGE_EXTENSIONS,
            Self::Points | Self::Route => DATA_EXTENSIONS,
        }
    }
}

pub enum Loaded {
    Image(DynamicImage),
    Text(String),
}

pub struct LoadEvent {
    pub kind: LoadKind,
    pub path: PathBuf,
    pub result: PickResult<Loaded>,
}

struct Envelope {
    generation: u64,
    event: LoadEvent,
}

/// Reads and decodes files off the UI thread. A newer request of the same
/// kind supersedes an older one: the stale result is never delivered.
pub struct FileLoader {
    tx: Sender<Envelope>,
    rx: Receiver<Envelope>,
    generations: [Arc<AtomicU64>; 3],
}

impl Default for FileLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl FileLoader {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            generations: Default::default(),
        }
    }

    pub fn request(&self, kind: LoadKind, path: &Path) -> PickResult<()> {
        check_extension(kind, path)?;

        let current = Arc::clone(&self.generations[kind.slot()]);
        let generation = current.fetch_add(1, Ordering::SeqCst) + 1;
        let tx = self.tx.clone();
        let path = path.to_path_buf();
        log::debug!("loading {:?} from {}", kind, path.display());

        thread::spawn(move || {
            let result = read_file(&path).and_then(|bytes| {
                if current.load(Ordering::SeqCst) != generation {
                    return Err(PickError::Precondition("superseded".to_string()));
                }
                decode(kind, bytes)
            });
            let _ = tx.send(Envelope {
                generation,
                event: LoadEvent { kind, path, result },
            });
        });
        Ok(())
    }

    /// Invalidates every in-flight request.
    pub fn cancel_all(&self) {
        for generation in &self.generations {
            generation.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn try_recv(&self) -> Option<LoadEvent> {
        while let Ok(envelope) = self.rx.try_recv() {
            if let Some(event) = self.accept(envelope) {
                return Some(event);
            }
        }
        None
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<LoadEvent> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.checked_duration_since(Instant::now())?;
            let envelope = self.rx.recv_timeout(remaining).ok()?;
            if let Some(event) = self.accept(envelope) {
                return Some(event);
            }
        }
    }

    fn accept(&self, envelope: Envelope) -> Option<LoadEvent> {
        let current = self.generations[envelope.event.kind.slot()].load(Ordering::SeqCst);
        if envelope.generation != current {
            log::warn!(
                "dropping superseded {:?} load of {}",
                envelope.event.kind,
                envelope.event.path.display()
            );
            return None;
        }
        Some(envelope.event)
    }
}

fn check_extension(kind: LoadKind, path: &Path) -> PickResult<()> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if kind.extensions().contains(&ext.as_str()) {
        return Ok(());
    }
    let expected = match kind {
        LoadKind::Image => "a PNG or JPEG image",
        LoadKind::Points | LoadKind::Route => "a JSON file",
    };
    Err(PickError::InputFormat(format!(
        "{} is not {expected}",
        path.display()
    )))
}

fn read_file(path: &Path) -> PickResult<Vec<u8>> {
    std::fs::read(path).map_err(|source| PickError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn decode(kind: LoadKind, bytes: Vec<u8>) -> PickResult<Loaded> {
    match kind {
        LoadKind::Image => image::load_from_memory(&bytes)
            .map(Loaded::Image)
            .map_err(|err| PickError::Decode(err.to_string())),
        LoadKind::Points | LoadKind::Route => String::from_utf8(bytes)
            .map(Loaded::Text)
            .map_err(|_| PickError::Parse("file is not valid UTF-8 text".to_string())),
    }
}

/// File name without its extension, used to name exports.
pub fn image_base_name(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::time::Duration;

    use image::{DynamicImage, ImageFormat, RgbaImage};

    use super::{image_base_name, FileLoader, LoadKind, Loaded};
    use crate::error::PickError;

    const WAIT: Duration = Duration::from_secs(5);

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> std::path::PathBuf {
        let path = dir.join(name);
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, image::Rgba([9, 9, 9, 255])))
            .save_with_format(&path, ImageFormat::Png)
            .expect("write png");
        path
    }

    #[test]
    fn wrong_extension_is_rejected_up_front() {
        let loader = FileLoader::new();
        let err = loader
            .request(LoadKind::Image, Path::new("map.gif"))
            .unwrap_err();
        assert!(matches!(err, PickError::InputFormat(_)));
        let err = loader
            .request(LoadKind::Points, Path::new("map.png"))
            .unwrap_err();
        assert!(matches!(err, PickError::InputFormat(_)));
    }

    #[test]
    fn image_is_decoded_with_native_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "trail.png", 8, 6);
        let loader = FileLoader::new();
        loader.request(LoadKind::Image, &path).unwrap();

        let event = loader.recv_timeout(WAIT).expect("load event");
        assert_eq!(event.kind, LoadKind::Image);
        match event.result {
            Ok(Loaded::Image(image)) => {
                assert_eq!((image.width(), image.height()), (8, 6));
            }
            _ => panic!("expected decoded image"),
        }
    }

    #[test]
    fn undecodable_image_reports_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();
        let loader = FileLoader::new();
        loader.request(LoadKind::Image, &path).unwrap();

        let event = loader.recv_timeout(WAIT).expect("load event");
        assert!(matches!(event.result, Err(PickError::Decode(_))));
    }

    #[test]
    fn newer_request_supersedes_older_one() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.json");
        let second = dir.path().join("second.json");
        std::fs::write(&first, "{\"points\":[]}").unwrap();
        std::fs::write(&second, "{\"points\":[{\"x\":1,\"y\":2}]}").unwrap();

        let loader = FileLoader::new();
        loader.request(LoadKind::Points, &first).unwrap();
        loader.request(LoadKind::Points, &second).unwrap();

        let event = loader.recv_timeout(WAIT).expect("load event");
        assert_eq!(event.path, second);
        assert!(loader.recv_timeout(Duration::from_millis(200)).is_none());
    }

    #[test]
    fn cancel_all_drops_pending_results() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("route.json");
        std::fs::write(&path, "{}").unwrap();

        let loader = FileLoader::new();
        loader.request(LoadKind::Route, &path).unwrap();
        loader.cancel_all();
        assert!(loader.recv_timeout(Duration::from_millis(300)).is_none());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let loader = FileLoader::new();
        loader
            .request(LoadKind::Route, Path::new("/definitely/not/here.json"))
            .unwrap();
        let event = loader.recv_timeout(WAIT).expect("load event");
        assert!(matches!(event.result, Err(PickError::Io { .. })));
    }

    #[test]
    fn base_name_drops_extension() {
        assert_eq!(image_base_name(Path::new("/maps/alps.PNG")).as_deref(), Some("alps"));
    }
}
