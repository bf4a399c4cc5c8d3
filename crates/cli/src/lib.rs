//! Cistercian fonts CLI library.

pub mod cli;
