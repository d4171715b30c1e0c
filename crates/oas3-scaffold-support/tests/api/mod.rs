//! AUTO-GENERATED CODE - DO NOT EDIT!
//!
//! Pet Store 1.0.0
//! Source: api.yaml
//! Generated by `oas3-scaffold`
//!
//! Pets served by the support crate integration tests.

pub mod handlers;
pub mod models;
