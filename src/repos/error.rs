/*
 * Responsibility
 * - What a repo failure means to the layers above
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("order store lock poisoned")]
    Poisoned,
}
