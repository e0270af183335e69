pub mod batch;
pub mod column;
pub mod loaders;
pub mod row;
pub mod template;

pub use batch::{
    BatchConfig, FailurePolicy, GenerationParams, OutputCell, RangeMode, RangeSpec,
    DEGRADED_MARKER, FULFILLMENT_FAILED_MARKER, MISSING_DATA_MARKER,
};
pub use column::ColumnLetter;
pub use loaders::{load_batch_file, parse_batch_config};
pub use row::{RowRange, RowRecord};
pub use template::Template;
