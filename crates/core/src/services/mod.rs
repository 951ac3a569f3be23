mod paginator;

pub use paginator::*;
