// src/lib.rs
//
// typovis: an animated typographic scene engine.
// User text is mapped onto one of ten procedural layouts (concentric
// rings, a spiral ribbon, character grids) and animated in real time.

pub mod animation;
pub mod config;
pub mod controllers;
pub mod models;
pub mod services;
pub mod views;
