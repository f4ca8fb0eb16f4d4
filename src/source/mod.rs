//! Loading the spectrogram to annotate

pub mod image;
