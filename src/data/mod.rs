pub mod csv;
pub mod dataset;

pub use csv::{builtin_iris_excerpt, load_csv, parse_csv};
pub use dataset::{Dataset, LabelEncoder, Sample};
