//! relnmt: relation-augmented recurrent NMT model
//!
//! Forward-computation graph of a bidirectional GRU encoder enriched with
//! multi-scale convolutional relation layers, plus an attention-based GRU
//! decoder with a max-out output projection. Training, data pipelines and
//! search drivers live outside this crate; they call `Nmt::init`,
//! `Nmt::forward` and `Decoder::step` with prepared tensors and masks.

pub mod backend;
pub mod error;
pub mod helpers;
pub mod model;
pub mod utils;

pub use error::{NmtError, Result};
pub use model::{
    Attention, Decoder, Encoder, ForwardMode, GruCell, Nmt, NmtConfig, PrevToken, RelationLayer,
    SeqInput, PAD,
};

/// Name of the active tensor backend
pub fn backend_name() -> &'static str {
    #[cfg(all(feature = "cuda", not(feature = "cpu"), not(feature = "gpu")))]
    {
        return "CUDA";
    }

    #[cfg(all(feature = "gpu", not(feature = "cuda"), not(feature = "cpu")))]
    {
        return "WGPU";
    }

    #[cfg(all(feature = "cpu", not(feature = "cuda"), not(feature = "gpu")))]
    {
        return "CPU (NdArray)";
    }

    // Fallback
    #[cfg(not(any(
        all(feature = "cuda", not(feature = "cpu"), not(feature = "gpu")),
        all(feature = "gpu", not(feature = "cuda"), not(feature = "cpu")),
        all(feature = "cpu", not(feature = "cuda"), not(feature = "gpu"))
    )))]
    {
        return "CPU (NdArray) [fallback]";
    }
}
