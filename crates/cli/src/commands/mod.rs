//! Command implementations for the CLI

mod card_operations;

pub(crate) use card_operations::*;
