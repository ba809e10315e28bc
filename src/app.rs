use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gtk4::prelude::*;
use gtk4::{gio, Application};
use walkdir::WalkDir;

use crate::config::CarouselConfig;
use crate::models::CarouselItem;
use crate::ui::CarouselWindow;

const APP_ID: &str = "com.loopcarousel.Demo";
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp", "tiff", "tif"];

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Turn directories and files into slides. Directories contribute their
/// visible image files (not recursive), sorted by path.
pub fn collect_images(inputs: &[PathBuf]) -> Result<Vec<CarouselItem>> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            let walker = WalkDir::new(input).follow_links(false).max_depth(1);
            for entry in walker.into_iter().filter_entry(|entry| {
                entry.depth() == 0
                    || entry
                        .file_name()
                        .to_str()
                        .map(|name| !name.starts_with('.'))
                        .unwrap_or(true)
            }) {
                let entry = entry.with_context(|| format!("Failed to scan {:?}", input))?;
                if entry.file_type().is_file() && is_image_path(entry.path()) {
                    found.push(entry.into_path());
                }
            }
            found.sort();
            paths.extend(found);
        } else if is_image_path(input) {
            paths.push(input.clone());
        } else {
            tracing::warn!(path = ?input, "Skipping non-image input");
        }
    }
    Ok(paths.into_iter().map(CarouselItem::new).collect())
}

pub struct CarouselApp {
    app: Application,
}

impl CarouselApp {
    pub fn new() -> Self {
        let app = Application::builder()
            .application_id(APP_ID)
            .flags(gio::ApplicationFlags::HANDLES_OPEN)
            .build();

        app.connect_activate(Self::on_activate);
        app.connect_open(Self::on_open);

        Self { app }
    }

    pub fn run(&self) -> i32 {
        self.app.run().into()
    }

    fn on_activate(app: &Application) {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::show(app, &[cwd]);
    }

    fn on_open(app: &Application, files: &[gio::File], _hint: &str) {
        let paths: Vec<PathBuf> = files.iter().filter_map(|f| f.path()).collect();
        Self::show(app, &paths);
    }

    fn show(app: &Application, inputs: &[PathBuf]) {
        let result = (|| -> Result<()> {
            let config = CarouselConfig::from_env()?;
            let items = collect_images(inputs)?;
            let window = CarouselWindow::new(app, config, items)?;
            window.present();
            Ok(())
        })();

        if let Err(err) = result {
            tracing::error!(error = ?err, "Failed to open carousel");
            app.quit();
        }
    }
}

impl Default for CarouselApp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImageSource;

    #[test]
    fn test_collect_images_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.JPG", ".hidden.png", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("c.png"), b"x").unwrap();

        let items = collect_images(&[dir.path().to_path_buf()]).unwrap();
        let sources: Vec<ImageSource> = items.iter().map(|i| i.source().clone()).collect();
        assert_eq!(
            sources,
            vec![
                ImageSource::Path(dir.path().join("a.JPG")),
                ImageSource::Path(dir.path().join("b.png")),
            ]
        );
    }

    #[test]
    fn test_collect_images_keeps_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let second = dir.path().join("2.webp");
        let first = dir.path().join("1.gif");
        let skipped = dir.path().join("readme.md");
        for path in [&second, &first, &skipped] {
            std::fs::write(path, b"x").unwrap();
        }

        let items = collect_images(&[second.clone(), skipped, first.clone()]).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].source(), &ImageSource::Path(second));
        assert_eq!(items[1].source(), &ImageSource::Path(first));
    }

    #[test]
    fn test_collect_images_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_images(&[dir.path().to_path_buf()]).unwrap().is_empty());
    }
}
