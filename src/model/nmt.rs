// src/model/nmt.rs
//! Top-level model: encoder + attention keys + decoder

use burn::{
    module::Module,
    nn::{Linear, LinearConfig},
    tensor::{backend::Backend, Int, Tensor},
};

use super::config::NmtConfig;
use super::decoder::Decoder;
use super::encoder::Encoder;
use super::SeqInput;

/// Whether a call prepares training inputs or inference inputs. Inference
/// moves tensors onto the model's device first; gradient tracking is a
/// property of the backend type (`Autodiff` wrapper), so no per-tensor flag
/// is needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForwardMode {
    Training,
    Inference,
}

#[derive(Module, Debug)]
pub struct Nmt<B: Backend> {
    pub encoder: Encoder<B>,
    pub decoder: Decoder<B>,
    s_init: Linear<B>,
    ha: Linear<B>,
}

impl<B: Backend> Nmt<B> {
    pub fn new(
        config: &NmtConfig,
        src_vocab_size: usize,
        trg_vocab_size: usize,
        device: &B::Device,
    ) -> Self {
        Self {
            encoder: Encoder::new(config, src_vocab_size, device),
            decoder: Decoder::new(config, trg_vocab_size, device),
            s_init: LinearConfig::new(config.enc_hid_size, config.dec_hid_size).init(device),
            ha: LinearConfig::new(config.enc_hid_size, config.align_size).init(device),
        }
    }

    fn device(&self) -> B::Device {
        self.s_init.weight.val().device()
    }

    /// Initial decoder state: tanh-projected mean pool of the encoder
    /// outputs, mask-renormalized when a mask is given.
    pub fn init_state(&self, xs_h: &Tensor<B, 3>, xs_mask: Option<&Tensor<B, 2>>) -> Tensor<B, 2> {
        let pooled = match xs_mask {
            Some(m) => {
                let summed = (xs_h.clone() * m.clone().unsqueeze_dim::<3>(2))
                    .sum_dim(0)
                    .squeeze::<2>(0);
                let count = m.clone().sum_dim(0).squeeze::<1>(0).unsqueeze_dim::<2>(1);
                summed / count
            }
            None => xs_h.clone().mean_dim(0).squeeze::<2>(0),
        };

        self.s_init.forward(pooled).tanh()
    }

    /// Encodes a source batch and prepares everything a decode loop needs:
    /// `(initial state, encoder outputs, attention keys)`.
    ///
    /// The key tensor is recomputed here on every call; it is only valid
    /// for the encoder outputs returned alongside it.
    pub fn init(
        &self,
        xs: Tensor<B, 2, Int>,
        xs_mask: Option<&Tensor<B, 2>>,
        mode: ForwardMode,
    ) -> (Tensor<B, 2>, Tensor<B, 3>, Tensor<B, 3>) {
        let xs = match mode {
            ForwardMode::Inference => xs.to_device(&self.device()),
            ForwardMode::Training => xs,
        };

        let xs_h = self.encoder.forward(SeqInput::Tokens(xs), xs_mask, None);
        let s0 = self.init_state(&xs_h, xs_mask);
        let uh = self.ha.forward(xs_h.clone());

        (s0, xs_h, uh)
    }

    /// End-to-end teacher-forced pass. `srcs` is `(L, B)`, `trgs` is
    /// `(T, B)`; the last target position only serves as a label, so the
    /// decoder consumes the first `T-1` and the result is
    /// `(T-1, B, out_size)` logits.
    pub fn forward(
        &self,
        srcs: Tensor<B, 2, Int>,
        trgs: Tensor<B, 2, Int>,
        srcs_mask: &Tensor<B, 2>,
        trgs_mask: &Tensor<B, 2>,
    ) -> Tensor<B, 3> {
        let (s0, xs_h, uh) = self.init(srcs, Some(srcs_mask), ForwardMode::Training);

        let [t, b] = trgs.dims();
        let ys = trgs.slice([0..t - 1, 0..b]);
        let ys_mask = trgs_mask.clone().slice([0..t - 1, 0..b]);

        self.decoder.forward(
            s0,
            &xs_h,
            &uh,
            SeqInput::Tokens(ys),
            Some(srcs_mask),
            Some(&ys_mask),
        )
    }
}
