//! Capability Directory
//!
//! Enumerates the tools currently exposed by the active page. With embedded
//! origins enabled every frame is queried; otherwise only the top-level
//! document is.
//!
//! ```text
//! frames() ──▶ [top, iframe#4, iframe#9]
//!                 │       │         │        (concurrent)
//!            list_tools list_tools list_tools
//!                 │       │         ✗ unreachable → no tools
//!                 └───────┴─────────┘
//!                         ▼
//!              dedup by (name, origin)
//! ```

use crate::ports::page_bridge::{FrameInfo, PageBridgePort};
use futures::future::join_all;
use pagepilot_domain::{OriginKey, Tool};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// One origin to query during discovery.
struct DiscoveryTarget {
    origin: OriginKey,
    trusted: bool,
    url: Option<String>,
}

impl From<FrameInfo> for DiscoveryTarget {
    fn from(frame: FrameInfo) -> Self {
        Self {
            origin: frame.origin,
            trusted: frame.is_top_level(),
            url: Some(frame.url),
        }
    }
}

/// Use case for discovering the page's current tool set.
pub struct CapabilityDirectory<B: PageBridgePort + 'static> {
    bridge: Arc<B>,
    allow_embedded_origins: bool,
}

impl<B: PageBridgePort + 'static> Clone for CapabilityDirectory<B> {
    fn clone(&self) -> Self {
        Self {
            bridge: self.bridge.clone(),
            allow_embedded_origins: self.allow_embedded_origins,
        }
    }
}

impl<B: PageBridgePort + 'static> CapabilityDirectory<B> {
    pub fn new(bridge: Arc<B>, allow_embedded_origins: bool) -> Self {
        Self {
            bridge,
            allow_embedded_origins,
        }
    }

    /// Discover every tool the page currently exposes.
    ///
    /// Never fails: an origin that cannot be queried contributes no tools, and
    /// an empty result means nothing on the page responded.
    pub async fn discover(&self) -> Vec<Tool> {
        let targets = self.targets().await;

        let queries = targets.iter().map(|target| async move {
            (target, self.bridge.list_tools(target.origin).await)
        });
        let replies = join_all(queries).await;

        let mut seen = HashSet::new();
        let mut tools = Vec::new();
        for (target, reply) in replies {
            let listing = match reply {
                Ok(listing) => listing,
                Err(e) => {
                    warn!("No tools from {}: {}", target.origin, e);
                    continue;
                }
            };
            debug!(
                "{} exposes {} tool(s)",
                target.origin,
                listing.tools.len()
            );

            let url = listing.url.or_else(|| target.url.clone());
            for descriptor in listing.tools {
                if !seen.insert((descriptor.name.clone(), target.origin)) {
                    continue;
                }
                tools.push(Tool::from_descriptor(
                    descriptor,
                    target.origin,
                    url.clone(),
                    target.trusted,
                ));
            }
        }
        tools
    }

    async fn targets(&self) -> Vec<DiscoveryTarget> {
        let top_level_only = || {
            vec![DiscoveryTarget {
                origin: OriginKey::TOP_LEVEL,
                trusted: true,
                url: None,
            }]
        };

        if !self.allow_embedded_origins {
            return top_level_only();
        }

        match self.bridge.frames().await {
            Ok(frames) if !frames.is_empty() => frames.into_iter().map(DiscoveryTarget::from).collect(),
            Ok(_) => top_level_only(),
            Err(e) => {
                warn!("Frame enumeration failed, querying top-level only: {}", e);
                top_level_only()
            }
        }
    }
}
