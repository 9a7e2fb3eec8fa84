mod access_error;

pub use access_error::AccessError;
