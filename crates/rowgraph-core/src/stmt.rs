mod fingerprint;
pub use fingerprint::{Fingerprint, FingerprintBuilder};

mod load;
pub use load::Load;

mod row_bounds;
pub use row_bounds::RowBounds;

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;

mod value_record;
pub use value_record::ValueRecord;
