#![forbid(unsafe_code)]

mod rendering;
mod shapes;

pub use rendering::{init_tracing, render_slices_to_png, render_vector_slice_to_png, SliceAxis};
pub use shapes::{ball, level_set_sphere, sprinkle_specks, swirl_field};
