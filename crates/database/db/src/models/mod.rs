/// This module contains the metadata model.
pub mod metadata;
