//! Helpers shared by the commands

pub(crate) mod reader;
