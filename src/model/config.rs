// src/model/config.rs
//! Model hyperparameters

use burn::config::Config;

use crate::error::NmtError;

#[derive(Config, Debug)]
pub struct NmtConfig {
    /// Source word-embedding size; residual adds require it to equal `enc_hid_size`
    #[config(default = "512")]
    pub src_wemb_size: usize,

    #[config(default = "512")]
    pub trg_wemb_size: usize,

    #[config(default = "512")]
    pub enc_hid_size: usize,

    #[config(default = "512")]
    pub dec_hid_size: usize,

    /// Alignment space for the additive attention scores
    #[config(default = "512")]
    pub align_size: usize,

    /// Logit width handed to the external softmax/loss stage
    #[config(default = "512")]
    pub out_size: usize,

    /// Output channels of each relation-layer convolution
    #[config(default = "80")]
    pub relation_channels: usize,

    /// Kernel widths of the parallel convolutions; must be odd for
    /// same-length padding
    #[config(default = "vec![1, 3, 5, 7]")]
    pub relation_kernels: Vec<usize>,

    /// Number of stacked relation stages in the encoder
    #[config(default = "1")]
    pub relation_stages: usize,

    /// Max-out output projection instead of tanh
    #[config(default = "true")]
    pub max_out: bool,
}

impl NmtConfig {
    /// Full-size configuration
    pub fn base() -> Self {
        Self {
            src_wemb_size: 512,
            trg_wemb_size: 512,
            enc_hid_size: 512,
            dec_hid_size: 512,
            align_size: 512,
            out_size: 512,
            relation_channels: 80,
            relation_kernels: vec![1, 3, 5, 7],
            relation_stages: 1,
            max_out: true,
        }
    }

    /// Reduced configuration for quick experiments
    pub fn small() -> Self {
        Self {
            src_wemb_size: 128,
            trg_wemb_size: 128,
            enc_hid_size: 128,
            dec_hid_size: 128,
            align_size: 128,
            out_size: 128,
            relation_channels: 32,
            relation_kernels: vec![1, 3, 5],
            relation_stages: 1,
            max_out: true,
        }
    }

    /// Checks the dimension contracts the model graph relies on
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.src_wemb_size != self.enc_hid_size {
            return Err(NmtError::ConfigError(format!(
                "src_wemb_size ({}) must equal enc_hid_size ({}) for the encoder residuals",
                self.src_wemb_size, self.enc_hid_size
            )));
        }
        if let Some(k) = self.relation_kernels.iter().find(|&&k| k % 2 == 0) {
            return Err(NmtError::ConfigError(format!(
                "relation kernel width {} is even; same-length padding needs odd widths",
                k
            )));
        }
        if self.relation_kernels.is_empty() {
            return Err(NmtError::ConfigError(
                "at least one relation kernel width is required".into(),
            ));
        }
        for (name, v) in [
            ("trg_wemb_size", self.trg_wemb_size),
            ("dec_hid_size", self.dec_hid_size),
            ("align_size", self.align_size),
            ("out_size", self.out_size),
            ("relation_channels", self.relation_channels),
        ] {
            if v == 0 {
                return Err(NmtError::ConfigError(format!("{} must be non-zero", name)));
            }
        }
        Ok(())
    }

    pub fn num_parameters(&self, src_vocab_size: usize, trg_vocab_size: usize) -> usize {
        let e = self.enc_hid_size;
        let d = self.dec_hid_size;
        let a = self.align_size;

        // Single-step GRU: gated input projections with bias, recurrent without
        let gru = |input: usize, hidden: usize| 3 * (input * hidden + hidden) + 3 * hidden * hidden;

        // Relation stage over width `e`
        let c = self.relation_channels;
        let k_total = self.relation_kernels.len();
        let convs: usize = self.relation_kernels.iter().map(|&k| c * k * e + c).sum();
        let fused = k_total * c;
        let mlp = (2 * fused * c + c) + 3 * (c * c + c);
        let mlp_out = (c * c + c) + (c * e + e);
        let relation = convs + mlp + mlp_out;

        // Encoder: embeddings, two GRU sweeps, down projections, relation stages
        let mut encoder = src_vocab_size * self.src_wemb_size
            + gru(self.src_wemb_size, e)
            + gru(e, e)
            + (2 * e * e + e)
            + (3 * e * e + e);
        for i in 0..self.relation_stages {
            encoder += relation + ((4 + i) * e * e + e);
        }

        let attention = (d * a + a) + (a + 1);

        let osz = if self.max_out { 2 * self.out_size } else { self.out_size };
        let decoder = trg_vocab_size * self.trg_wemb_size
            + gru(self.trg_wemb_size, d)
            + gru(e, d)
            + attention
            + (d * osz + osz)
            + (self.trg_wemb_size * osz + osz)
            + (e * osz + osz);

        // Top-level: initial-state projection and attention keys
        let wiring = (e * d + d) + (e * a + a);

        encoder + decoder + wiring
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_round_trip() {
        let config = NmtConfig::small();
        let path = std::env::temp_dir().join("relnmt_config_round_trip.json");

        config.save(&path).unwrap();
        let loaded = NmtConfig::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.enc_hid_size, config.enc_hid_size);
        assert_eq!(loaded.relation_kernels, config.relation_kernels);
        assert_eq!(loaded.max_out, config.max_out);
    }
}
