pub mod backup;
pub mod csv_parser;
pub mod csv_serializer;
pub mod import;
pub mod share;

pub use backup::{decode_backup, encode_backup};
pub use csv_parser::parse_csv;
pub use csv_serializer::serialize_csv;
pub use import::parse_json_records;
pub use share::{decode_share, encode_share};
