#![doc = include_str!("../README.md")]

extern crate bgmotif;

pub mod background;
pub mod error;
pub mod matrix;
