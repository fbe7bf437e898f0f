//! Rule engine for Canfield Solitaire: piles, dealing, move validation,
//! the stock/waste draw cycle and win bookkeeping.
pub mod action;
pub mod board;
pub mod card;
pub mod deck;
pub mod error;
pub mod game;
pub mod pile;

pub use crate::error::{Error, Result};
