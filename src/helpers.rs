//! Common Helper Functions
//!
//! Batch/mask construction for callers that hold plain token lists, plus a
//! softmax for external decode drivers.

use burn::tensor::{backend::Backend, Int, Tensor, TensorData};

use crate::error::{NmtError, Result};
use crate::model::{NmtConfig, PAD};

/// Returns model configuration based on size string
pub fn get_model_config(size: &str) -> NmtConfig {
    match size {
        "base" => NmtConfig::base(),
        "small" => NmtConfig::small(),
        _ => {
            println!("  Unknown size '{}', using base", size);
            NmtConfig::base()
        }
    }
}

/// Builds a `(L, B)` Int tensor from one token row per sequence, padding
/// shorter rows with `PAD` up to the longest.
pub fn batch_from_tokens<B: Backend>(
    rows: &[Vec<u32>],
    device: &B::Device,
) -> Result<Tensor<B, 2, Int>> {
    if rows.is_empty() {
        return Err(NmtError::EmptyBatch);
    }
    let b = rows.len();
    let l = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    if l == 0 {
        return Err(NmtError::EmptyBatch);
    }

    // Column-major: position-first layout
    let mut flat = vec![PAD as i32; l * b];
    for (col, row) in rows.iter().enumerate() {
        for (pos, &tok) in row.iter().enumerate() {
            flat[pos * b + col] = tok as i32;
        }
    }

    let data = TensorData::from(flat.as_slice());
    let tensor: Tensor<B, 1, Int> = Tensor::from_data(data, device);
    Ok(tensor.reshape([l, b]))
}

/// Builds a `(max_len, B)` {0,1} float mask from per-sequence lengths.
pub fn mask_from_lengths<B: Backend>(
    lengths: &[usize],
    max_len: usize,
    device: &B::Device,
) -> Result<Tensor<B, 2>> {
    if lengths.is_empty() {
        return Err(NmtError::EmptyBatch);
    }
    if let Some(&too_long) = lengths.iter().find(|&&n| n > max_len) {
        return Err(NmtError::ShapeMismatch {
            expected: format!("lengths <= {}", max_len),
            got: too_long.to_string(),
        });
    }

    let b = lengths.len();
    let mut flat = vec![0.0f32; max_len * b];
    for (col, &len) in lengths.iter().enumerate() {
        for pos in 0..len {
            flat[pos * b + col] = 1.0;
        }
    }

    let data = TensorData::from(flat.as_slice());
    let tensor: Tensor<B, 1> = Tensor::from_data(data, device);
    Ok(tensor.reshape([max_len, b]))
}

/// Computes softmax over logits
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exp: Vec<f32> = logits.iter().map(|x| (x - max).exp()).collect();
    let sum: f32 = exp.iter().sum();
    exp.iter().map(|x| x / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::ndarray::{NdArray, NdArrayDevice};

    type TB = NdArray;

    #[test]
    fn test_batch_from_tokens_pads_columns() {
        let device = NdArrayDevice::Cpu;
        let batch = batch_from_tokens::<TB>(&[vec![4, 5, 6], vec![7, 8]], &device).unwrap();

        assert_eq!(batch.dims(), [3, 2]);
        let flat = batch.to_data().to_vec::<i64>().unwrap();
        // (L, B) layout: [4 7 / 5 8 / 6 PAD]
        assert_eq!(flat, vec![4, 7, 5, 8, 6, PAD as i64]);
    }

    #[test]
    fn test_batch_from_tokens_rejects_empty() {
        let device = NdArrayDevice::Cpu;
        assert!(batch_from_tokens::<TB>(&[], &device).is_err());
    }

    #[test]
    fn test_mask_from_lengths() {
        let device = NdArrayDevice::Cpu;
        let mask = mask_from_lengths::<TB>(&[3, 2], 3, &device).unwrap();

        assert_eq!(mask.dims(), [3, 2]);
        let flat = mask.to_data().to_vec::<f32>().unwrap();
        assert_eq!(flat, vec![1.0, 1.0, 1.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_mask_rejects_overlong_sequence() {
        let device = NdArrayDevice::Cpu;
        assert!(mask_from_lengths::<TB>(&[5], 3, &device).is_err());
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }
}
