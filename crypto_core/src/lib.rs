pub mod block;
pub mod channel;
pub mod label;
pub mod label_cipher;
pub mod rand_aes;

pub use crate::{block::Block, label::Label, label_cipher::LabelCipher, rand_aes::AesRng};

pub use channel::*;
