//! container types for structured field data

mod scalar_3d;
mod tensor_3d;

pub use scalar_3d::Scalar3D;
pub use tensor_3d::Tensor3D;
