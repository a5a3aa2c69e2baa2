mod ref_id;

pub use ref_id::*;

/// Number of local variable slots a value occupies
pub trait Width {
    fn width(&self) -> usize;
}
