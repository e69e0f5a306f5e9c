pub mod framebuffer;
pub mod registry;
pub mod types;

pub use framebuffer::{DEFAULT_FRAMEBUFFER_ID, Framebuffer, GLYPH_SIZE};
pub use registry::SurfaceRegistry;
pub use types::{Paint, Surface, SurfaceError, SurfaceLayout, SurfaceResult};
