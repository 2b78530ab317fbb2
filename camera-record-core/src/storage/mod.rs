pub mod aes_encryptor;
pub mod artifact_writer;
pub mod metadata;
