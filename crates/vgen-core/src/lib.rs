//! vgen Core Library
//!
//! This library provides the generation core of a multi-language client
//! library generator: it reads an annotated service model, builds a
//! language-neutral view of every API method and resolves the types each
//! view references to collision-free names with a sorted import list.

pub mod annotations;
pub mod api_config;
pub mod config;
pub mod error;
pub mod generate;
pub mod imports;
pub mod languages;
pub mod method_config;
pub mod model;
pub mod naming;
pub mod transformer;
pub mod types;
pub mod viewmodel;

pub use crate::{
    annotations::{AnnotationResolver, MethodFacts},
    api_config::ApiConfig,
    config::Config,
    error::{Error, Result},
    generate::{generate, generate_unit, generate_units, GeneratedUnit},
    languages::TargetLanguage,
    method_config::MethodConfig,
    model::Model,
};
