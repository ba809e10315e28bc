pub mod collaborators;
pub mod loop_carousel;
pub mod space;
pub mod timer;

pub use collaborators::{AdvanceTimer, CarouselDelegate, ImageLoader, PageIndicator, PagingContainer};
pub use loop_carousel::{LoopCarousel, PendingTap, RepositionTicket};
pub use space::VirtualSpace;
pub use timer::{AdvanceState, AutoAdvance, FireDate};
