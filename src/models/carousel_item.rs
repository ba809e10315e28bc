use std::path::{Path, PathBuf};

/// Where an item's image comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageSource {
    Path(PathBuf),
    Url(String),
}

impl ImageSource {
    /// Parse a URL or identifier. `file://` URLs and bare strings become paths.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(rest) = raw.strip_prefix("file://") {
            return Self::Path(PathBuf::from(rest));
        }
        if raw.contains("://") {
            return Self::Url(raw.to_string());
        }
        Self::Path(PathBuf::from(raw))
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(path) => Some(path),
            Self::Url(_) => None,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Self::Path(path) => path
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
                .unwrap_or_else(|| path.display().to_string()),
            Self::Url(url) => url.clone(),
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&str> for ImageSource {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

/// One slide of the carousel. Immutable once handed to the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselItem {
    source: ImageSource,
    caption: Option<String>,
}

impl CarouselItem {
    pub fn new(source: impl Into<ImageSource>) -> Self {
        Self {
            source: source.into(),
            caption: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sources() {
        assert_eq!(
            ImageSource::parse("file:///tmp/a.png"),
            ImageSource::Path(PathBuf::from("/tmp/a.png"))
        );
        assert_eq!(
            ImageSource::parse("https://example.com/b.jpg"),
            ImageSource::Url("https://example.com/b.jpg".to_string())
        );
        assert_eq!(
            ImageSource::parse(" banners/c.webp "),
            ImageSource::Path(PathBuf::from("banners/c.webp"))
        );
    }

    #[test]
    fn test_display_name() {
        let item = CarouselItem::new("/srv/banners/summer.jpg").with_caption("Summer");
        assert_eq!(item.source().display_name(), "summer.jpg");
        assert_eq!(item.caption(), Some("Summer"));
        assert!(item.source().as_path().is_some());

        let remote = CarouselItem::new("http://example.com/x.png");
        assert_eq!(remote.source().display_name(), "http://example.com/x.png");
        assert!(remote.source().as_path().is_none());
    }
}
