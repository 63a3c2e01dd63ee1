//! Categorical derivation: raw numeric/string fields → stable semantic
//! labels. The three sub-algorithms (file class, size bucket, OS family)
//! are independent and applied row-wise.

pub mod file_class;
pub mod os;
