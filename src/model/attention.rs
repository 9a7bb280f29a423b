// src/model/attention.rs
//! Additive attention over encoder positions
//!
//! Scores are exponentiated directly and normalized by the column sum, with
//! no max-subtraction; large score magnitudes can overflow. Kept that way to
//! match the trained model's arithmetic.

use burn::{
    module::Module,
    nn::{Linear, LinearConfig},
    tensor::{backend::Backend, Tensor},
};

#[derive(Module, Debug)]
pub struct Attention<B: Backend> {
    sa: Linear<B>,
    a1: Linear<B>,
    align_size: usize,
}

impl<B: Backend> Attention<B> {
    pub fn new(dec_hid_size: usize, align_size: usize, device: &B::Device) -> Self {
        Self {
            sa: LinearConfig::new(dec_hid_size, align_size).init(device),
            a1: LinearConfig::new(align_size, 1).init(device),
            align_size,
        }
    }

    pub fn align_size(&self) -> usize {
        self.align_size
    }

    /// Aligns decoder state `s_tm1` `[B, dec_hid]` against all encoder
    /// positions. `uh` is the precomputed key tensor `(L, B, align)`.
    ///
    /// Returns `(weights (L, B), context [B, enc_hid])`. Weights in every
    /// column with at least one unmasked position sum to 1; an all-zero
    /// mask column is a caller contract violation (division by zero).
    pub fn forward(
        &self,
        s_tm1: Tensor<B, 2>,
        xs_h: &Tensor<B, 3>,
        uh: &Tensor<B, 3>,
        xs_mask: Option<&Tensor<B, 2>>,
    ) -> (Tensor<B, 2>, Tensor<B, 2>) {
        // (B, align) -> (1, B, align), broadcast-added to uh
        let scores = self
            .a1
            .forward((self.sa.forward(s_tm1).unsqueeze::<3>() + uh.clone()).tanh())
            .squeeze::<2>(2)
            .exp();

        let scores = match xs_mask {
            Some(m) => scores * m.clone(),
            None => scores,
        };

        // Column-normalized probabilities over positions
        let weights = scores.clone() / scores.sum_dim(0);

        // Weighted sum of encoder outputs -> (B, enc_hid)
        let context = (weights.clone().unsqueeze_dim::<3>(2) * xs_h.clone())
            .sum_dim(0)
            .squeeze::<2>(0);

        (weights, context)
    }
}
