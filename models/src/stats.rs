// models/src/stats.rs

use serde::{Deserialize, Serialize};

/// Headline counts for the administrator dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_patients: u64,
    pub active_alerts: u64,
    /// Every logged health record counts as one screening.
    pub total_screenings: u64,
    pub total_disease_cases: u64,
}

/// Case count for one cataloged disease.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseStat {
    pub name: String,
    pub count: u64,
}

/// Orders by count descending; equal counts fall back to name so output is stable.
pub fn sort_disease_stats(stats: &mut [DiseaseStat]) {
    stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
}
