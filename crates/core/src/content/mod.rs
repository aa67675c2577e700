pub mod model;
pub mod section;
pub mod status;
pub mod validate;

pub use model::{ContentData, ContentPatch, ContentSection, CreateContent, PatchAction};
pub use section::Section;
pub use status::Status;
