#![allow(dead_code)]

pub mod log_tree;
pub mod status_env;
