// src/model/decoder.rs
//! Attention-based GRU decoder with max-out output projection
//!
//! Each step refines the state in two stages: a GRU conditioned on the
//! previous target embedding, then attention against the encoder outputs,
//! then a second GRU conditioned on the attention context. `step` is the
//! primitive an external greedy/beam driver consumes; `forward` runs the
//! teacher-forced loop over a whole target sequence.

use burn::{
    module::Module,
    nn::{Embedding, EmbeddingConfig, Linear, LinearConfig},
    tensor::{backend::Backend, Int, Tensor},
};

use super::attention::Attention;
use super::config::NmtConfig;
use super::encoder::zero_padding_row;
use super::gru::GruCell;
use super::SeqInput;

/// Previous target token, as an external decode driver may hold it.
/// Resolved into an embedding once at the step boundary.
#[derive(Clone, Debug)]
pub enum PrevToken<B: Backend> {
    /// Single token id (greedy decoding, batch of one)
    Id(u32),
    /// One id per batch element (beam decoding)
    Ids(Vec<u32>),
    /// Already-embedded `[B, trg_wemb]` vector (teacher forcing)
    Embedded(Tensor<B, 2>),
}

#[derive(Module, Debug)]
pub struct Decoder<B: Backend> {
    trg_lookup_table: Embedding<B>,
    attention: Attention<B>,
    gru1: GruCell<B>,
    gru2: GruCell<B>,
    ls: Linear<B>,
    ly: Linear<B>,
    lc: Linear<B>,
    max_out: bool,
    out_size: usize,
}

impl<B: Backend> Decoder<B> {
    pub fn new(config: &NmtConfig, trg_vocab_size: usize, device: &B::Device) -> Self {
        let mut trg_lookup_table =
            EmbeddingConfig::new(trg_vocab_size, config.trg_wemb_size).init(device);
        trg_lookup_table.weight =
            zero_padding_row(trg_lookup_table.weight, config.trg_wemb_size, device);

        let osz = if config.max_out {
            2 * config.out_size
        } else {
            config.out_size
        };

        Self {
            trg_lookup_table,
            attention: Attention::new(config.dec_hid_size, config.align_size, device),
            gru1: GruCell::new(config.trg_wemb_size, config.dec_hid_size, device),
            gru2: GruCell::new(config.enc_hid_size, config.dec_hid_size, device),
            ls: LinearConfig::new(config.dec_hid_size, osz).init(device),
            ly: LinearConfig::new(config.trg_wemb_size, osz).init(device),
            lc: LinearConfig::new(config.enc_hid_size, osz).init(device),
            max_out: config.max_out,
            out_size: config.out_size,
        }
    }

    pub fn out_size(&self) -> usize {
        self.out_size
    }

    fn embed_prev(&self, y_tm1: PrevToken<B>, device: &B::Device) -> Tensor<B, 2> {
        let ids = match y_tm1 {
            PrevToken::Embedded(e) => return e,
            PrevToken::Id(id) => vec![id],
            PrevToken::Ids(ids) => ids,
        };
        let n = ids.len();
        let ids: Vec<i32> = ids.into_iter().map(|id| id as i32).collect();
        let indices: Tensor<B, 1, Int> = Tensor::from_ints(ids.as_slice(), device);
        self.trg_lookup_table
            .forward(indices.reshape([1, n]))
            .squeeze::<2>(0)
    }

    /// Advances one decoding step.
    ///
    /// Returns `(context, new state, token embedding used, attention weights)`.
    pub fn step(
        &self,
        s_tm1: Tensor<B, 2>,
        xs_h: &Tensor<B, 3>,
        uh: &Tensor<B, 3>,
        y_tm1: PrevToken<B>,
        xs_mask: Option<&Tensor<B, 2>>,
        y_mask: Option<Tensor<B, 1>>,
    ) -> (Tensor<B, 2>, Tensor<B, 2>, Tensor<B, 2>, Tensor<B, 2>) {
        let y_e = self.embed_prev(y_tm1, &s_tm1.device());

        let s_above = self.gru1.forward(y_e.clone(), y_mask.clone(), s_tm1);
        let (alpha, attend) = self.attention.forward(s_above.clone(), xs_h, uh, xs_mask);
        let s_t = self.gru2.forward(attend.clone(), y_mask, s_above);

        (attend, s_t, y_e, alpha)
    }

    /// Teacher-forced loop over a whole target sequence `(T, B)`.
    ///
    /// Strictly sequential: each step consumes the previous state. Returns
    /// `(T, B, out_size)` logits, zeroed at masked positions.
    pub fn forward(
        &self,
        s_tm1: Tensor<B, 2>,
        xs_h: &Tensor<B, 3>,
        uh: &Tensor<B, 3>,
        ys: SeqInput<B>,
        xs_mask: Option<&Tensor<B, 2>>,
        ys_mask: Option<&Tensor<B, 2>>,
    ) -> Tensor<B, 3> {
        let ys_e = ys.embed(&self.trg_lookup_table);
        let [t_len, b, _] = ys_e.dims();

        let mut s = s_tm1;
        let mut states = Vec::with_capacity(t_len);
        let mut contexts = Vec::with_capacity(t_len);
        for k in 0..t_len {
            let y_k = ys_e.clone().slice([k..k + 1, 0..b]).squeeze::<2>(0);
            let m_k = ys_mask.map(|m| m.clone().slice([k..k + 1, 0..b]).squeeze::<1>(0));
            let (attend, s_t, _, _) =
                self.step(s, xs_h, uh, PrevToken::Embedded(y_k), xs_mask, m_k);
            contexts.push(attend);
            states.push(s_t.clone());
            s = s_t;
        }

        let s = Tensor::stack::<3>(states, 0);
        let c = Tensor::stack::<3>(contexts, 0);

        let logit = self.step_out(s, ys_e, c);
        match ys_mask {
            Some(m) => logit * m.clone().unsqueeze_dim::<3>(2),
            None => logit,
        }
    }

    /// Output projection over stacked per-step tensors `(T, B, ·)`.
    pub fn step_out(&self, s: Tensor<B, 3>, y: Tensor<B, 3>, c: Tensor<B, 3>) -> Tensor<B, 3> {
        let logit = self.ls.forward(s) + self.ly.forward(y) + self.lc.forward(c);

        if self.max_out {
            max_out_pairs(logit)
        } else {
            logit.tanh()
        }
    }

    /// Single-step variant for external decode drivers, `[B, ·]` inputs.
    pub fn step_out_single(
        &self,
        s: Tensor<B, 2>,
        y: Tensor<B, 2>,
        c: Tensor<B, 2>,
    ) -> Tensor<B, 2> {
        self.step_out(s.unsqueeze::<3>(), y.unsqueeze::<3>(), c.unsqueeze::<3>())
            .squeeze::<2>(0)
    }
}

/// Max-out over adjacent pairs: `(.., 2*n)` -> `(.., n)` taking the
/// elementwise maximum of each pair.
fn max_out_pairs<B: Backend>(logit: Tensor<B, 3>) -> Tensor<B, 3> {
    let [t, b, d] = logit.dims();
    logit
        .reshape([t, b, d / 2, 2])
        .max_dim(3)
        .squeeze::<3>(3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::ndarray::{NdArray, NdArrayDevice};

    type TB = NdArray;

    #[test]
    fn test_max_out_takes_pairwise_maximum() {
        let device = NdArrayDevice::Cpu;
        let logit: Tensor<TB, 3> =
            Tensor::from_floats([[[1.0, 5.0, 3.0, 2.0], [-4.0, -1.0, 0.0, 7.0]]], &device);

        let out = max_out_pairs(logit);

        assert_eq!(out.dims(), [1, 2, 2]);
        let expected: Tensor<TB, 3> = Tensor::from_floats([[[5.0, 3.0], [-1.0, 7.0]]], &device);
        assert_eq!(out.to_data(), expected.to_data());
    }
}
