//! Common test utilities and helpers
//!
//! Shared helpers for integration tests.

use burn::backend::ndarray::{NdArray, NdArrayDevice};

pub type TestBackend = NdArray;

pub fn test_device() -> NdArrayDevice {
    NdArrayDevice::Cpu
}

/// Creates a minimal test model configuration for fast tests
pub fn test_model_config() -> relnmt::NmtConfig {
    relnmt::NmtConfig::new()
        .with_src_wemb_size(6)
        .with_trg_wemb_size(4)
        .with_enc_hid_size(6)
        .with_dec_hid_size(6)
        .with_align_size(5)
        .with_out_size(10)
        .with_relation_channels(4)
        .with_relation_kernels(vec![1, 3])
        .with_relation_stages(1)
        .with_max_out(true)
}

/// All-ones `(l, b)` mask
pub fn ones_mask(l: usize, b: usize) -> burn::tensor::Tensor<TestBackend, 2> {
    burn::tensor::Tensor::ones([l, b], &test_device())
}
