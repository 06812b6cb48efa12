// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard statistics for shop owners and consultants.
//!
//! The backend returns different counters per role, so known counters are
//! typed and everything else is kept in `extra`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    // ─── Marketplace ─────────────────────────────────────────────
    #[serde(default)]
    pub total_products: u32,
    #[serde(default)]
    pub total_orders: u32,
    #[serde(default)]
    pub pending_orders: u32,
    /// Sum of delivered order totals
    #[serde(default)]
    pub revenue: f64,

    // ─── Consultation ────────────────────────────────────────────
    #[serde(default)]
    pub total_articles: u32,
    #[serde(default)]
    pub total_consultations: u32,

    /// Counters not modelled above.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_counters_are_kept() {
        let stats: DashboardStats =
            serde_json::from_value(json!({"total_orders": 5, "flocks_registered": 2})).unwrap();
        assert_eq!(stats.total_orders, 5);
        assert_eq!(stats.total_products, 0);
        assert_eq!(stats.extra["flocks_registered"], 2);
    }
}
