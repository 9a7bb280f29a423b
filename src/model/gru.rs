// src/model/gru.rs
//! Masked single-step GRU cell
//!
//! Both encoder sweeps and both decoder stages step this cell one position
//! at a time, carrying the hidden state explicitly. The step mask freezes
//! padded positions: where the mask is 0 the previous state is returned
//! bit-for-bit, which is what keeps variable-length sequences packed into a
//! fixed-length batch correct.

use burn::{
    module::Module,
    nn::{Linear, LinearConfig},
    tensor::{activation, backend::Backend, Tensor},
};

#[derive(Module, Debug)]
pub struct GruCell<B: Backend> {
    xz: Linear<B>,
    xr: Linear<B>,
    xh: Linear<B>,
    hz: Linear<B>,
    hr: Linear<B>,
    hh: Linear<B>,
    hidden_size: usize,
}

impl<B: Backend> GruCell<B> {
    pub fn new(input_size: usize, hidden_size: usize, device: &B::Device) -> Self {
        let input = LinearConfig::new(input_size, hidden_size);
        let recurrent = LinearConfig::new(hidden_size, hidden_size).with_bias(false);

        Self {
            xz: input.clone().init(device),
            xr: input.clone().init(device),
            xh: input.init(device),
            hz: recurrent.clone().init(device),
            hr: recurrent.clone().init(device),
            hh: recurrent.init(device),
            hidden_size,
        }
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// One gated update: `x` is `[batch, input]`, `h` is `[batch, hidden]`,
    /// `mask` is `[batch]` with values in {0, 1}.
    pub fn forward(
        &self,
        x: Tensor<B, 2>,
        mask: Option<Tensor<B, 1>>,
        h: Tensor<B, 2>,
    ) -> Tensor<B, 2> {
        let z = activation::sigmoid(self.xz.forward(x.clone()) + self.hz.forward(h.clone()));
        let r = activation::sigmoid(self.xr.forward(x.clone()) + self.hr.forward(h.clone()));
        let candidate = (self.xh.forward(x) + self.hh.forward(r * h.clone())).tanh();
        let h_new = (z.ones_like() - z.clone()) * h.clone() + z * candidate;

        match mask {
            Some(m) => {
                let m = m.unsqueeze_dim::<2>(1);
                h_new * m.clone() + h * (m.ones_like() - m)
            }
            None => h_new,
        }
    }
}
