mod attention;
mod config;
mod decoder;
mod encoder;
mod gru;
mod nmt;
mod relation;

pub use attention::Attention;
pub use config::NmtConfig;
pub use decoder::{Decoder, PrevToken};
pub use encoder::Encoder;
pub use gru::GruCell;
pub use nmt::{ForwardMode, Nmt};
pub use relation::RelationLayer;

use burn::{
    nn::Embedding,
    tensor::{backend::Backend, Int, Tensor},
};

/// Reserved padding index in both vocabularies; its embedding row is pinned
/// to zero at construction.
pub const PAD: usize = 0;

/// A `(L, B)` sequence handed to the encoder or decoder either as token
/// indices or already embedded.
#[derive(Clone, Debug)]
pub enum SeqInput<B: Backend> {
    Tokens(Tensor<B, 2, Int>),
    Embedded(Tensor<B, 3>),
}

impl<B: Backend> SeqInput<B> {
    fn embed(self, lookup: &Embedding<B>) -> Tensor<B, 3> {
        match self {
            SeqInput::Tokens(tokens) => lookup.forward(tokens),
            SeqInput::Embedded(embedded) => embedded,
        }
    }
}

impl<B: Backend> From<Tensor<B, 2, Int>> for SeqInput<B> {
    fn from(tokens: Tensor<B, 2, Int>) -> Self {
        SeqInput::Tokens(tokens)
    }
}

impl<B: Backend> From<Tensor<B, 3>> for SeqInput<B> {
    fn from(embedded: Tensor<B, 3>) -> Self {
        SeqInput::Embedded(embedded)
    }
}
