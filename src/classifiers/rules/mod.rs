mod zero_r;

pub use zero_r::ZeroR;
