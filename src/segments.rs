//! Static cluster metadata: the four behavioral segments and their display text

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of segments produced by the frozen K-Means model
pub const N_CLUSTERS: usize = 4;

const LABELS: [&str; N_CLUSTERS] = [
    "High-Value Multichannel Power Users (Highly Engaged)",
    "Low-Engagement Premium Spenders",
    "Mid-Value Swipe-Only Traditionalists",
    "High-Value In-Person Spenders",
];

const DESCRIPTIONS: [&str; N_CLUSTERS] = [
    "• Very recent and frequent activity
• Highest total spend but small average transactions
• Heavy chip + online usage, moderate swipe
• Broad merchant variety",
    "• Infrequent activity and longer recency
• Low overall spend but high average transaction value
• Almost no online usage, low merchant diversity
• Low engagement across all channels",
    "• Moderately recent activity
• Mid-level frequency and spend
• Swipe-focused behavior, zero chip use
• Occasional online usage (some users)",
    "• Active recently and frequently
• Strong total spend with moderate transaction sizes
• Heavy chip usage, almost no online
• Broad merchant variety and stable in-person behavior",
];

/// Identifier of one of the four customer segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum ClusterId {
    MultichannelPowerUsers,
    PremiumSpenders,
    SwipeTraditionalists,
    InPersonSpenders,
}

impl ClusterId {
    /// All segments in id order
    pub const ALL: [ClusterId; N_CLUSTERS] = [
        ClusterId::MultichannelPowerUsers,
        ClusterId::PremiumSpenders,
        ClusterId::SwipeTraditionalists,
        ClusterId::InPersonSpenders,
    ];

    /// Numeric id (row index into the cluster centers)
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        LABELS[self.index()]
    }

    pub fn description(self) -> &'static str {
        DESCRIPTIONS[self.index()]
    }
}

impl TryFrom<usize> for ClusterId {
    type Error = UnknownCluster;

    fn try_from(id: usize) -> Result<Self, Self::Error> {
        ClusterId::ALL.get(id).copied().ok_or(UnknownCluster(id))
    }
}

impl From<ClusterId> for usize {
    fn from(id: ClusterId) -> usize {
        id.index()
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Cluster id outside the closed range of known segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown cluster id {0} (expected 0..=3)")]
pub struct UnknownCluster(pub usize);
