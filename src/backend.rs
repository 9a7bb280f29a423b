//! Backend Selector
//!
//! Selects the appropriate Burn backend based on feature flags.
//! Only one backend can be active at a time.

use burn::backend::Autodiff;

// ============ CUDA BACKEND ============
#[cfg(all(feature = "cuda", not(feature = "cpu"), not(feature = "gpu")))]
mod backend_impl {
    pub use burn::backend::cuda_jit::{Cuda, CudaDevice};
    pub type MyBackend = Cuda;

    pub fn get_device() -> CudaDevice {
        CudaDevice::new(0)
    }
}

// ============ WGPU BACKEND ============
#[cfg(all(feature = "gpu", not(feature = "cuda"), not(feature = "cpu")))]
mod backend_impl {
    pub use burn::backend::wgpu::{Wgpu, WgpuDevice};
    pub type MyBackend = Wgpu<f32, i32>;

    pub fn get_device() -> WgpuDevice {
        WgpuDevice::BestAvailable
    }
}

// ============ CPU (NDARRAY) BACKEND ============
#[cfg(all(feature = "cpu", not(feature = "cuda"), not(feature = "gpu")))]
mod backend_impl {
    pub use burn::backend::ndarray::{NdArray, NdArrayDevice};
    pub type MyBackend = NdArray;

    pub fn get_device() -> NdArrayDevice {
        NdArrayDevice::Cpu
    }
}

// ============ FALLBACK (NO FEATURE) ============
#[cfg(not(any(
    all(feature = "cuda", not(feature = "cpu"), not(feature = "gpu")),
    all(feature = "gpu", not(feature = "cuda"), not(feature = "cpu")),
    all(feature = "cpu", not(feature = "cuda"), not(feature = "gpu"))
)))]
mod backend_impl {
    pub use burn::backend::ndarray::{NdArray, NdArrayDevice};
    pub type MyBackend = NdArray;

    pub fn get_device() -> NdArrayDevice {
        NdArrayDevice::Cpu
    }
}

// ============ PUBLIC EXPORTS ============
pub use backend_impl::{get_device, MyBackend};

/// Backend with autodiff for external training drivers
pub type TrainBackend = Autodiff<MyBackend>;

#[cfg(test)]
mod tests {
    use super::*;
    use burn::tensor::Tensor;

    #[test]
    fn test_train_backend_is_usable() {
        let device = get_device();
        let t: Tensor<TrainBackend, 1> = Tensor::zeros([4], &device);
        assert_eq!(t.dims(), [4]);
    }
}
