//! Memoization of generated sequences.
//!
//! Repeated requests with unchanged generator parameters reuse the
//! previously generated rows instead of redrawing them. The cache only
//! saves work; a miss always regenerates an identical sequence.

use crate::{
    config::{GeneratorConfig, TrafficConfig},
    event::{OrderRecord, SessionRecord},
    generator::{generate_orders, GeneratorParams},
    traffic::generate_sessions,
};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
pub struct GeneratorCache {
    orders: HashMap<GeneratorParams, Arc<Vec<OrderRecord>>>,
    sessions: HashMap<GeneratorParams, Arc<Vec<SessionRecord>>>,
}

impl GeneratorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orders(&mut self, config: &GeneratorConfig, params: GeneratorParams) -> Arc<Vec<OrderRecord>> {
        if let Some(hit) = self.orders.get(&params) {
            log::debug!("order cache hit: {params:?}");
            return Arc::clone(hit);
        }
        log::debug!("order cache miss: {params:?}");
        let rows = Arc::new(generate_orders(config, &params));
        self.orders.insert(params, Arc::clone(&rows));
        rows
    }

    pub fn sessions(&mut self, config: &TrafficConfig, params: GeneratorParams) -> Arc<Vec<SessionRecord>> {
        if let Some(hit) = self.sessions.get(&params) {
            log::debug!("session cache hit: {params:?}");
            return Arc::clone(hit);
        }
        log::debug!("session cache miss: {params:?}");
        let rows = Arc::new(generate_sessions(config, &params));
        self.sessions.insert(params, Arc::clone(&rows));
        rows
    }

    pub fn len(&self) -> usize {
        self.orders.len() + self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.orders.clear();
        self.sessions.clear();
    }
}
