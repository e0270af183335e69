pub mod range_selector;
pub mod template_resolver;

pub use range_selector::select_range;
pub use template_resolver::{resolve, RenderResult};
