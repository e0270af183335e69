pub mod logging;

#[cfg(test)]
pub(crate) mod test_support;

pub use logging::truncate_text;
