pub mod format;
pub mod model;
pub mod store;
pub mod template;

pub use format::{date_range, format_date, truncate_text, wrap_text};
pub use model::{Education, Experience, PersonalInfo, ResumeData, Skill, SkillLevel, TemplateKind};
pub use store::{DEFAULT_STORE_FILE, ResumeStore, StoreError, StoreResult, parse_document};
pub use template::{PREVIEW_HEIGHT, PREVIEW_SURFACE_ID, PREVIEW_WIDTH, render, render_with};
