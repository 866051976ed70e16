pub mod storage_signer;

pub use storage_signer::StorageImageSigner;
