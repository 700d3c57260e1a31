//! Script engine front-end
//!
//! The host compiles a script once per query (validating its parameters),
//! then asks the compiled factory for one scorer per search leaf. The
//! bitmap is decoded for each leaf and dropped with it.

use std::{collections::HashMap, sync::Arc};

use log::{debug, info};

use crate::{
    error::ConfigurationError,
    scoring::{ScoringParams, SkipListScorer},
};

/// Engine serving `skiplist` scripts
#[derive(Debug, Default, Clone, Copy)]
pub struct SkipListEngine;

impl SkipListEngine {
    /// Script language name
    pub const TYPE: &'static str = "skiplist";

    /// The only script source this engine knows
    pub const ROARING: &'static str = "roaring";

    pub fn new() -> Self {
        SkipListEngine
    }

    fn check_source(source: &str) -> Result<(), ConfigurationError> {
        if source != Self::ROARING {
            return Err(ConfigurationError::UnknownScript(source.to_string()));
        }
        Ok(())
    }

    /// Compiles a script from string parameters
    pub fn compile(
        &self,
        source: &str,
        params: &HashMap<String, String>,
    ) -> Result<RoaringScriptFactory, ConfigurationError> {
        Self::check_source(source)?;
        Ok(RoaringScriptFactory::new(ScoringParams::from_map(params)?))
    }

    /// Compiles a script from JSON parameters
    pub fn compile_json(
        &self,
        source: &str,
        params: &serde_json::Value,
    ) -> Result<RoaringScriptFactory, ConfigurationError> {
        Self::check_source(source)?;
        Ok(RoaringScriptFactory::new(ScoringParams::from_json(params)?))
    }
}

/// A compiled `roaring` script
#[derive(Debug, Clone)]
pub struct RoaringScriptFactory {
    params: Arc<ScoringParams>,
}

impl RoaringScriptFactory {
    pub fn new(params: ScoringParams) -> Self {
        info!(
            "Compiled {} script on field [{}] ({} bytes of bitmap)",
            SkipListEngine::ROARING,
            params.field,
            params.payload.len()
        );
        Self {
            params: Arc::new(params),
        }
    }

    pub fn params(&self) -> &ScoringParams {
        &self.params
    }

    /// The original score is only passed through, never used to decide
    pub fn needs_score(&self) -> bool {
        false
    }

    /// Creates the scorer of a search leaf
    pub fn new_leaf(&self) -> SkipListScorer {
        let scorer = SkipListScorer::from_params(self.params.clone());
        debug!(
            "New leaf scorer over {} containers",
            scorer.bitmap().container_count()
        );
        scorer
    }
}
