use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("segment store lock poisoned while storing {reference_id}")]
    LockPoisoned { reference_id: String },
}
