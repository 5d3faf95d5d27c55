mod columns;
mod fields;

pub use columns::ColumnNormalizer;
pub use fields::FieldNormalizer;

pub const PHONE_COLUMN: &str = "phone_number";
pub const EMAIL_COLUMN: &str = "email";
pub const NAME_COLUMN: &str = "name";
