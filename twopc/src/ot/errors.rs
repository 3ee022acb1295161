use crate::mux::MuxError;

#[derive(Debug, thiserror::Error)]
pub enum OtError {
    #[error("ot io error")]
    IoError(#[from] std::io::Error),
    #[error("ot mux error")]
    MuxError(#[from] MuxError),
    #[error("homomorphic encryption error")]
    FheError(#[from] fhe::Error),
    #[error("polynomial arithmetic error")]
    MathError(#[from] fhe_math::Error),
    #[error("ot verification serialization error")]
    CodecError(#[from] bincode::Error),
    #[error("unsupported plaintext modulus bit length {0}, expected 17 or 33")]
    InvalidModulusBitlen(usize),
    #[error("invalid number of ot worker threads: {0}")]
    InvalidThreadCount(usize),
    #[error("ot key material missing, run keygen first")]
    MissingKey,
    #[error("decryption key missing, this party is the ot sender")]
    NotReceiver,
    #[error("ot worker thread panicked")]
    ThreadPanic,
}
