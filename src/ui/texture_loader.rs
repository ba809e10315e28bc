// Background image loading for carousel cells
// Worker threads decode, the main loop turns pixels into textures and hands
// them to whichever cell is still waiting for that source.

use gdk4::Texture;
use gtk4::prelude::*;
use gtk4::{gdk, glib, Picture};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{trace, warn};

use crate::carousel::ImageLoader;
use crate::image_loader::{decode_source, DecodedImage};
use crate::models::ImageSource;

const LOADER_THREADS: usize = 2;
const LOADER_QUEUE: usize = 64;
const TEXTURE_CACHE_ENTRIES: usize = 64;
const RESULT_POLL_MS: u64 = 16;

static NEXT_LOAD_TOKEN: AtomicU64 = AtomicU64::new(1);

// Placeholder texture - generated once and reused
fn placeholder_texture() -> &'static Texture {
    static PLACEHOLDER: OnceLock<Texture> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        let width = 64;
        let height = 64;
        let mut pixels = vec![0u8; width * height * 4];

        // Fill with dark gray (#1a1a1a) RGBA
        for chunk in pixels.chunks_exact_mut(4) {
            chunk[0] = 0x1a;
            chunk[1] = 0x1a;
            chunk[2] = 0x1a;
            chunk[3] = 0xff;
        }

        let bytes = glib::Bytes::from_owned(pixels);
        gdk::MemoryTexture::new(
            width as i32,
            height as i32,
            gdk::MemoryFormat::R8g8b8a8,
            &bytes,
            width * 4,
        )
        .upcast()
    })
}

fn create_texture(decoded: DecodedImage) -> Option<Texture> {
    let DecodedImage {
        rgba,
        width,
        height,
    } = decoded;
    let expected = (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4);
    if width == 0 || height == 0 || rgba.len() < expected {
        return None;
    }
    let bytes = glib::Bytes::from_owned(rgba);
    let texture = gdk::MemoryTexture::new(
        width as i32,
        height as i32,
        gdk::MemoryFormat::R8g8b8a8,
        &bytes,
        (width * 4) as usize,
    );
    Some(texture.upcast())
}

/// A reusable slot in the paging strip.
#[derive(Clone)]
pub struct CarouselCell {
    picture: Picture,
    bound_index: Rc<Cell<Option<usize>>>,
    token: Rc<Cell<u64>>,
}

impl CarouselCell {
    pub fn new(width: i32, height: i32) -> Self {
        let picture = Picture::new();
        picture.set_can_shrink(true);
        picture.set_content_fit(gtk4::ContentFit::Cover);
        picture.set_size_request(width, height);
        picture.add_css_class("carousel-cell");
        picture.set_paintable(Some(placeholder_texture()));
        Self {
            picture,
            bound_index: Rc::new(Cell::new(None)),
            token: Rc::new(Cell::new(0)),
        }
    }

    pub fn picture(&self) -> &Picture {
        &self.picture
    }

    pub fn bound_index(&self) -> Option<usize> {
        self.bound_index.get()
    }

    /// Point the cell at another virtual slot. Any load still in flight for
    /// the old slot is ignored when it lands.
    pub fn bind(&self, index: usize) {
        self.bound_index.set(Some(index));
        self.token
            .set(NEXT_LOAD_TOKEN.fetch_add(1, Ordering::Relaxed));
        self.picture.set_paintable(Some(placeholder_texture()));
    }

    pub fn unbind(&self) {
        self.bound_index.set(None);
        self.token.set(0);
        self.picture.set_paintable(Some(placeholder_texture()));
    }

    fn apply(&self, token: u64, texture: &Texture) {
        if self.token.get() == token {
            self.picture.set_paintable(Some(texture));
        }
    }
}

#[derive(Debug)]
struct DecodeRequest {
    source: ImageSource,
}

#[derive(Debug)]
struct DecodeResult {
    source: ImageSource,
    decoded: Option<DecodedImage>,
}

struct Waiter {
    cell: CarouselCell,
    token: u64,
}

struct LoaderState {
    pending: HashSet<ImageSource>,
    waiters: HashMap<ImageSource, Vec<Waiter>>,
    cache: lru::LruCache<ImageSource, Texture>,
}

struct LoaderInner {
    request_tx: flume::Sender<DecodeRequest>,
    result_rx: flume::Receiver<DecodeResult>,
    state: RefCell<LoaderState>,
    poll_source: RefCell<Option<glib::SourceId>>,
}

impl Drop for LoaderInner {
    fn drop(&mut self) {
        if let Some(source_id) = self.poll_source.borrow_mut().take() {
            source_id.remove();
        }
    }
}

/// Decodes slide images off the main thread and keeps a small texture cache.
#[derive(Clone)]
pub struct TextureLoader {
    inner: Rc<LoaderInner>,
}

impl TextureLoader {
    pub fn new(max_width: u32, max_height: u32) -> Self {
        let (request_tx, request_rx) = flume::bounded::<DecodeRequest>(LOADER_QUEUE);
        let (result_tx, result_rx) = flume::unbounded::<DecodeResult>();

        for worker_id in 0..LOADER_THREADS {
            let rx = request_rx.clone();
            let tx = result_tx.clone();
            let spawned = std::thread::Builder::new()
                .name(format!("carousel-decode-{}", worker_id))
                .spawn(move || {
                    while let Ok(req) = rx.recv() {
                        let decoded = match decode_source(&req.source, max_width, max_height) {
                            Ok(decoded) => Some(decoded),
                            Err(err) => {
                                warn!(error = %err, "Slide image failed to load");
                                None
                            }
                        };
                        if tx
                            .send(DecodeResult {
                                source: req.source,
                                decoded,
                            })
                            .is_err()
                        {
                            break;
                        }
                    }
                });
            if let Err(err) = spawned {
                warn!(error = %err, worker_id, "Failed to spawn decode worker");
            }
        }

        let cache_size = NonZeroUsize::new(TEXTURE_CACHE_ENTRIES).unwrap_or(NonZeroUsize::MIN);
        let inner = Rc::new(LoaderInner {
            request_tx,
            result_rx,
            state: RefCell::new(LoaderState {
                pending: HashSet::new(),
                waiters: HashMap::new(),
                cache: lru::LruCache::new(cache_size),
            }),
            poll_source: RefCell::new(None),
        });

        let inner_weak = Rc::downgrade(&inner);
        let source_id = glib::timeout_add_local(Duration::from_millis(RESULT_POLL_MS), move || {
            if let Some(inner) = inner_weak.upgrade() {
                inner.process_results();
                glib::ControlFlow::Continue
            } else {
                glib::ControlFlow::Break
            }
        });
        inner.poll_source.replace(Some(source_id));

        Self { inner }
    }
}

impl LoaderInner {
    fn request(&self, cell: &CarouselCell, source: &ImageSource) {
        let token = cell.token.get();
        let mut state = self.state.borrow_mut();

        if let Some(texture) = state.cache.get(source).cloned() {
            trace!(?source, "Slide texture cached");
            cell.apply(token, &texture);
            return;
        }

        state
            .waiters
            .entry(source.clone())
            .or_default()
            .push(Waiter {
                cell: cell.clone(),
                token,
            });

        if state.pending.insert(source.clone())
            && self
                .request_tx
                .try_send(DecodeRequest {
                    source: source.clone(),
                })
                .is_err()
        {
            warn!(?source, "Decode queue full, dropping request");
            state.pending.remove(source);
            state.waiters.remove(source);
        }
    }

    fn process_results(&self) {
        while let Ok(result) = self.result_rx.try_recv() {
            let texture = result.decoded.and_then(create_texture);

            let waiters = {
                let mut state = self.state.borrow_mut();
                state.pending.remove(&result.source);
                if let Some(ref texture) = texture {
                    state.cache.put(result.source.clone(), texture.clone());
                }
                state.waiters.remove(&result.source).unwrap_or_default()
            };

            if let Some(ref texture) = texture {
                for waiter in waiters {
                    waiter.cell.apply(waiter.token, texture);
                }
            }
        }
    }
}

impl ImageLoader for TextureLoader {
    type Cell = CarouselCell;

    fn load(&self, cell: &CarouselCell, source: &ImageSource) {
        self.inner.request(cell, source);
    }
}
