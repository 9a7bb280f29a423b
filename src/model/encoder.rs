// src/model/encoder.rs
//! Bidirectional GRU encoder with relation stages
//!
//! Pipeline: embed, forward GRU sweep, backward GRU sweep, then a
//! configurable number of relation stages. Every stage widens the running
//! feature list by one residual output and a down projection brings the
//! concatenation back to `enc_hid_size`, so all stages operate at a uniform
//! width.

use burn::{
    module::{Module, Param},
    nn::{Embedding, EmbeddingConfig, Linear, LinearConfig},
    tensor::{backend::Backend, Tensor},
};

use super::config::NmtConfig;
use super::gru::GruCell;
use super::relation::RelationLayer;
use super::{SeqInput, PAD};

#[derive(Module, Debug)]
pub struct Encoder<B: Backend> {
    src_lookup_table: Embedding<B>,
    forw_gru: GruCell<B>,
    back_gru: GruCell<B>,
    down_fwd: Linear<B>,
    down_bi: Linear<B>,
    relation_layers: Vec<RelationLayer<B>>,
    stage_downs: Vec<Linear<B>>,
    output_size: usize,
}

impl<B: Backend> Encoder<B> {
    pub fn new(config: &NmtConfig, src_vocab_size: usize, device: &B::Device) -> Self {
        let hid = config.enc_hid_size;

        let mut src_lookup_table =
            EmbeddingConfig::new(src_vocab_size, config.src_wemb_size).init(device);
        src_lookup_table.weight =
            zero_padding_row(src_lookup_table.weight, config.src_wemb_size, device);

        let relation_layers = (0..config.relation_stages)
            .map(|_| {
                RelationLayer::new(
                    hid,
                    hid,
                    config.relation_channels,
                    &config.relation_kernels,
                    device,
                )
            })
            .collect();

        // Stage i projects the concatenation of [embedding, forward,
        // backward, relation_0..=relation_i] back down to hid.
        let stage_downs = (0..config.relation_stages)
            .map(|i| LinearConfig::new((4 + i) * hid, hid).init(device))
            .collect();

        Self {
            src_lookup_table,
            forw_gru: GruCell::new(config.src_wemb_size, hid, device),
            back_gru: GruCell::new(hid, hid, device),
            down_fwd: LinearConfig::new(2 * hid, hid).init(device),
            down_bi: LinearConfig::new(3 * hid, hid).init(device),
            relation_layers,
            stage_downs,
            output_size: hid,
        }
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    /// Encodes `(L, B)` token indices (or an already-embedded `(L, B, E)`
    /// sequence) into `(L, B, enc_hid_size)` contextual representations.
    pub fn forward(
        &self,
        xs: SeqInput<B>,
        xs_mask: Option<&Tensor<B, 2>>,
        h0: Option<Tensor<B, 2>>,
    ) -> Tensor<B, 3> {
        let xs_e = xs.embed(&self.src_lookup_table);

        let out_fwd = self.sweep(&self.forw_gru, &xs_e, xs_mask, h0.clone(), false) + xs_e.clone();

        let in_bwd = self
            .down_fwd
            .forward(Tensor::cat(vec![xs_e.clone(), out_fwd.clone()], 2));
        let out_bwd = self.sweep(&self.back_gru, &in_bwd, xs_mask, h0, true) + in_bwd;

        let mut feats = vec![xs_e, out_fwd, out_bwd];
        let mut cur = self.down_bi.forward(Tensor::cat(feats.clone(), 2));

        for (relation, down) in self.relation_layers.iter().zip(self.stage_downs.iter()) {
            let out = relation.forward(cur.clone(), xs_mask) + cur;
            feats.push(out);
            cur = down.forward(Tensor::cat(feats.clone(), 2));
        }

        cur
    }

    /// Steps `gru` over the sequence, one position at a time, and stacks
    /// the per-position states. `reverse` walks right-to-left and restores
    /// original order afterwards.
    fn sweep(
        &self,
        gru: &GruCell<B>,
        xs: &Tensor<B, 3>,
        xs_mask: Option<&Tensor<B, 2>>,
        h0: Option<Tensor<B, 2>>,
        reverse: bool,
    ) -> Tensor<B, 3> {
        let [l, b, _] = xs.dims();
        let mut h =
            h0.unwrap_or_else(|| Tensor::zeros([b, gru.hidden_size()], &xs.device()));

        let order: Vec<usize> = if reverse {
            (0..l).rev().collect()
        } else {
            (0..l).collect()
        };

        let mut states = Vec::with_capacity(l);
        for k in order {
            let x_k = xs.clone().slice([k..k + 1, 0..b]).squeeze::<2>(0);
            let m_k = xs_mask.map(|m| m.clone().slice([k..k + 1, 0..b]).squeeze::<1>(0));
            h = gru.forward(x_k, m_k, h);
            states.push(h.clone());
        }

        if reverse {
            states.reverse();
        }
        Tensor::stack::<3>(states, 0)
    }
}

/// Pins the padding index to a zero embedding.
pub(super) fn zero_padding_row<B: Backend>(
    weight: Param<Tensor<B, 2>>,
    emb_size: usize,
    device: &B::Device,
) -> Param<Tensor<B, 2>> {
    let w = weight.val().slice_assign(
        [PAD..PAD + 1, 0..emb_size],
        Tensor::zeros([1, emb_size], device),
    );
    Param::from_tensor(w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::ndarray::{NdArray, NdArrayDevice};

    type TB = NdArray;

    #[test]
    fn test_sweep_freezes_state_past_padding() {
        let device = NdArrayDevice::Cpu;
        let config = NmtConfig::new()
            .with_src_wemb_size(6)
            .with_enc_hid_size(6)
            .with_relation_channels(4)
            .with_relation_kernels(vec![1, 3]);
        let encoder: Encoder<TB> = Encoder::new(&config, 10, &device);

        // (L=3, B=2, E=6), mask with a trailing padded step in column 0
        let xs: Tensor<TB, 3> = Tensor::random(
            [3, 2, 6],
            burn::tensor::Distribution::Uniform(-1.0, 1.0),
            &device,
        );
        let mask: Tensor<TB, 2> =
            Tensor::from_floats([[1.0, 1.0], [1.0, 1.0], [0.0, 1.0]], &device);

        let states = encoder.sweep(&encoder.forw_gru, &xs, Some(&mask), None, false);

        let last_valid = states.clone().slice([1..2, 0..1]).to_data();
        let padded = states.slice([2..3, 0..1]).to_data();
        assert_eq!(
            last_valid, padded,
            "masked step must leave the hidden state untouched"
        );
    }
}
