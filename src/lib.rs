//! # Recipe Features
//!
//! Interactive recipe helpers: an ingredient line parser, serving-size scaling with
//! fraction-friendly rendering, a "save for later" list, and a shopping list that
//! merges duplicate ingredients across recipes.
//!
//! Parsing, scaling and amount formatting are pure. The shopping list, the saved
//! recipes and the scale preferences persist through an injected
//! [`storage::KeyValueStore`].

pub mod amount;
pub mod config;
pub mod content_scanner;
pub mod controller;
pub mod errors;
pub mod ingredient_model;
pub mod ingredient_parser;
pub mod recipe_data;
pub mod saved_recipes;
pub mod scaling;
pub mod shopping_list;
pub mod storage;
pub mod unit_patterns;
