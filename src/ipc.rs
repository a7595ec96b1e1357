pub mod channels;
pub mod shared;
