// src/model/relation.rs
//! Relation layer: multi-scale convolution + all-pairs fusion
//!
//! Each position is re-embedded from two sources of context: parallel 1-D
//! convolutions with different kernel widths capture multi-scale local
//! structure, and an all-pairs MLP summed over the partner axis captures
//! global interaction between positions.

use burn::{
    module::Module,
    nn::{
        conv::{Conv2d, Conv2dConfig},
        Linear, LinearConfig, PaddingConfig2d,
    },
    tensor::{activation, backend::Backend, Tensor},
};

const LEAKY_SLOPE: f64 = 0.1;

#[derive(Module, Debug)]
pub struct RelationLayer<B: Backend> {
    convs: Vec<Conv2d<B>>,
    mlp: Vec<Linear<B>>,
    mlp_out: Vec<Linear<B>>,
    fused_size: usize,
}

impl<B: Backend> RelationLayer<B> {
    pub fn new(
        input_size: usize,
        output_size: usize,
        channels: usize,
        kernels: &[usize],
        device: &B::Device,
    ) -> Self {
        // Kernel spans the full embedding width; odd heights with
        // (k-1)/2 padding keep the sequence length unchanged.
        let convs = kernels
            .iter()
            .map(|&k| {
                Conv2dConfig::new([1, channels], [k, input_size])
                    .with_padding(PaddingConfig2d::Explicit((k - 1) / 2, 0))
                    .init(device)
            })
            .collect();

        let fused_size = kernels.len() * channels;

        let mlp = vec![
            LinearConfig::new(2 * fused_size, channels).init(device),
            LinearConfig::new(channels, channels).init(device),
            LinearConfig::new(channels, channels).init(device),
            LinearConfig::new(channels, channels).init(device),
        ];

        let mlp_out = vec![
            LinearConfig::new(channels, channels).init(device),
            LinearConfig::new(channels, output_size).init(device),
        ];

        Self {
            convs,
            mlp,
            mlp_out,
            fused_size,
        }
    }

    /// Input `(L, B, E)`, output `(L, B, output_size)`.
    ///
    /// The mask is accepted for interface symmetry with the recurrent
    /// stages but is NOT applied here; masking of padded positions stays
    /// the caller's responsibility. Known gap, kept as-is.
    pub fn forward(&self, x: Tensor<B, 3>, _xs_mask: Option<&Tensor<B, 2>>) -> Tensor<B, 3> {
        let [l, b, _e] = x.dims();

        // (L, B, E) -> (B, 1, L, E)
        let x = x.swap_dims(0, 1).unsqueeze_dim::<4>(1);

        // Each conv: (B, C, L, 1) -> (B, C, L)
        let feats: Vec<Tensor<B, 3>> = self
            .convs
            .iter()
            .map(|conv| activation::leaky_relu(conv.forward(x.clone()), LEAKY_SLOPE).squeeze::<3>(3))
            .collect();

        // (B, K*C, L) -> (L, B, K*C)
        let x = Tensor::cat(feats, 1).permute([2, 0, 1]);

        // All pairs (i, j): concat(features(j), features(i)) -> (L, L, B, 2*K*C)
        let expanded = x.unsqueeze_dim::<4>(0).expand([l, l, b, self.fused_size]);
        let mut y = Tensor::cat(vec![expanded.clone(), expanded.swap_dims(0, 1)], 3);

        for layer in &self.mlp {
            y = activation::leaky_relu(layer.forward(y), LEAKY_SLOPE);
        }

        // Collapse the partner axis -> (L, B, C)
        let mut y = y.sum_dim(0).squeeze::<3>(0);

        for layer in &self.mlp_out {
            y = activation::leaky_relu(layer.forward(y), LEAKY_SLOPE);
        }

        y
    }
}
